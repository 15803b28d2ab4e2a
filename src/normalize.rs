//! Record normalizer: upstream shapes in, canonical records out.
//!
//! The API describes the same car with two field sets (listing and detail) and
//! delivers reviews either embedded in the car or from their own endpoint.
//! Every variant maps to one canonical shape here. Keys outside the known
//! shapes are logged as a data-quality warning and dropped.
//!
//! Normalization is defined for the upstream shape only. Feeding a canonical
//! record back through it is out of contract: its English keys are unknown
//! keys and its ratings come out as NaN.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::NormalizeError;
use crate::metrics::utility::coerce_number;
use crate::models::{Car, RawCar, RawReview, RawUser, Review, ReviewAuthor, Role, User};

/// Status value the API uses for a car that is listed.
pub const ACTIVE_STATUS: &str = "ATIVO";

/// Where a batch of raw reviews came from.
#[derive(Debug, Clone)]
pub enum ReviewSource {
    /// Embedded in the car detail response.
    Embedded(Vec<RawReview>),
    /// Fetched from the car's evaluations endpoint.
    Separate(Vec<RawReview>),
}

impl ReviewSource {
    pub fn origin(&self) -> &'static str {
        match self {
            ReviewSource::Embedded(_) => "embedded",
            ReviewSource::Separate(_) => "separate",
        }
    }

    fn into_records(self) -> Vec<RawReview> {
        match self {
            ReviewSource::Embedded(records) | ReviewSource::Separate(records) => records,
        }
    }
}

/// Whether a car detail response already carries its reviews.
#[derive(Debug, Clone)]
pub enum EmbeddedReviews {
    Present(Vec<RawReview>),
    /// Missing, not a list, or an empty list: reviews must be fetched separately.
    Absent,
}

impl EmbeddedReviews {
    pub fn from_car(car: &RawCar) -> Self {
        let Some(Value::Array(items)) = &car.avaliacao else {
            return EmbeddedReviews::Absent;
        };
        if items.is_empty() {
            return EmbeddedReviews::Absent;
        }

        let records: Vec<RawReview> = items
            .iter()
            .filter_map(|item| match serde_json::from_value(item.clone()) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "Skipping embedded review that is not a review record");
                    None
                }
            })
            .collect();

        EmbeddedReviews::Present(records)
    }
}

/// Normalizes one raw review.
///
/// Ratings are copied as numbers without range checks; a missing or
/// non-numeric rating becomes NaN. A missing author sub-object leaves
/// `user` empty.
///
/// # Errors
///
/// Returns [`NormalizeError::MissingId`] when the record has no usable identifier.
pub fn normalize_review(raw: RawReview) -> Result<Review, NormalizeError> {
    let id = coerce_id(raw.id.as_ref()).ok_or(NormalizeError::MissingId { record: "review" })?;
    warn_unknown_keys("review", &id, &raw.extra);

    Ok(Review {
        rating_performance: coerce_number(raw.nota_desempenho.as_ref()),
        rating_comfort: coerce_number(raw.nota_conforto.as_ref()),
        rating_consumption: coerce_number(raw.nota_consumo.as_ref()),
        rating_design: coerce_number(raw.nota_design.as_ref()),
        rating_cost_benefit: coerce_number(raw.nota_custo_beneficio.as_ref()),
        comment: raw.comentario.unwrap_or_default(),
        car_id: coerce_id(raw.carro_id.as_ref()),
        user_id: coerce_id(raw.usuario_id.as_ref()),
        created_at: parse_timestamp(raw.criado_em.as_deref()),
        user: raw.usuario.map(|u| ReviewAuthor {
            id: coerce_id(u.id.as_ref()),
            name: u.nome,
            email: u.email,
        }),
        id,
    })
}

/// Normalizes a batch, dropping records without an identifier.
///
/// A fresh batch always replaces the previous collection; nothing is merged.
pub fn normalize_reviews(source: ReviewSource) -> Vec<Review> {
    let origin = source.origin();
    let records = source.into_records();
    let received = records.len();

    let reviews: Vec<Review> = records
        .into_iter()
        .filter_map(|raw| match normalize_review(raw) {
            Ok(review) => Some(review),
            Err(e) => {
                warn!(origin, error = %e, "Rejected review record");
                None
            }
        })
        .collect();

    debug!(origin, received, kept = reviews.len(), "Normalized reviews");
    reviews
}

/// Normalizes a car from either the listing or the detail shape.
///
/// `active` is true only when the status equals [`ACTIVE_STATUS`].
/// `average_rating` is left empty for the aggregator to fill.
pub fn normalize_car(raw: RawCar) -> Result<Car, NormalizeError> {
    let id = coerce_id(raw.id.as_ref()).ok_or(NormalizeError::MissingId { record: "car" })?;
    warn_unknown_keys("car", &id, &raw.extra);

    Ok(Car {
        brand: raw.marca.unwrap_or_default(),
        model: raw.modelo.unwrap_or_default(),
        year: coerce_year(raw.ano.as_ref()),
        image_url: raw.imagem.filter(|s| !s.is_empty()),
        active: is_active_status(raw.status.as_ref()),
        created_at: parse_timestamp(raw.criado_em.as_deref()),
        category: raw.categoria,
        engine_type: raw.tipo_motorizacao,
        average_rating: None,
        id,
    })
}

/// Normalizes the user half of a login response.
pub fn normalize_user(raw: RawUser) -> Result<User, NormalizeError> {
    let id = coerce_id(raw.id.as_ref()).ok_or(NormalizeError::MissingId { record: "user" })?;
    let role = match raw.perfil.as_deref() {
        Some("ADMIN") => Role::Admin,
        _ => Role::User,
    };

    Ok(User {
        id,
        name: raw.nome.unwrap_or_default(),
        email: raw.email.unwrap_or_default(),
        role,
    })
}

pub fn is_active_status(status: Option<&Value>) -> bool {
    matches!(status, Some(Value::String(s)) if s == ACTIVE_STATUS)
}

/// Identifiers arrive as strings or numbers; empty strings do not count.
fn coerce_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_year(value: Option<&Value>) -> Option<i32> {
    let year = coerce_number(value);
    if year.is_finite() && year > 0.0 {
        Some(year as i32)
    } else {
        None
    }
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?;
    match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            debug!(value, error = %e, "Unparsable timestamp");
            None
        }
    }
}

fn warn_unknown_keys(record: &'static str, id: &str, extra: &Map<String, Value>) {
    if extra.is_empty() {
        return;
    }
    let fields: Vec<&str> = extra.keys().map(String::as_str).collect();
    warn!(record, id, ?fields, "Record carries fields outside the known upstream shapes");
}
