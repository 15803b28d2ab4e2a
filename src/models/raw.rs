//! Records as the REST API sends them.
//!
//! Field names are the API's localized ones. Anything whose type the API does
//! not keep stable (identifiers, ratings, year, status) stays untyped JSON until
//! the normalizer coerces it.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::warn;

/// Keeps an explicit `null` distinguishable from a missing key.
///
/// Missing keys fall back to `None` through `#[serde(default)]`; a present key,
/// `null` included, always lands in `Some`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// One review, either embedded in a car (`avaliacao`) or listed on its own.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReview {
    #[serde(default)]
    pub id: Option<Value>,

    #[serde(rename = "notaDesempenho", default, deserialize_with = "present")]
    pub nota_desempenho: Option<Value>,
    #[serde(rename = "notaConforto", default, deserialize_with = "present")]
    pub nota_conforto: Option<Value>,
    #[serde(rename = "notaConsumo", default, deserialize_with = "present")]
    pub nota_consumo: Option<Value>,
    #[serde(rename = "notaDesign", default, deserialize_with = "present")]
    pub nota_design: Option<Value>,
    #[serde(rename = "notaCustoBeneficio", default, deserialize_with = "present")]
    pub nota_custo_beneficio: Option<Value>,

    #[serde(default)]
    pub comentario: Option<String>,
    #[serde(rename = "usuarioId", default)]
    pub usuario_id: Option<Value>,
    #[serde(rename = "carroId", default)]
    pub carro_id: Option<Value>,
    #[serde(rename = "criadoEm", default)]
    pub criado_em: Option<String>,
    #[serde(default)]
    pub usuario: Option<RawUser>,

    /// Keys that belong to neither known review shape.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Author sub-object nested in a review, and the user half of a login response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub perfil: Option<String>,
}

/// A car from the listing endpoint or the detail endpoint.
///
/// The listing shape stops at `criadoEm`; the detail shape adds category,
/// engine type and possibly the embedded reviews.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCar {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub marca: Option<String>,
    #[serde(default)]
    pub modelo: Option<String>,
    #[serde(default)]
    pub ano: Option<Value>,
    #[serde(default)]
    pub imagem: Option<String>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(rename = "criadoEm", default)]
    pub criado_em: Option<String>,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(rename = "tipoMotorizacao", default)]
    pub tipo_motorizacao: Option<String>,
    /// Embedded reviews. Kept untyped: the API sometimes sends something other
    /// than a list here, which counts as "no embedded reviews".
    #[serde(default)]
    pub avaliacao: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /cars/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct CarDetailEnvelope {
    pub car: RawCar,
}

/// `GET /cars/{id}/evaluations`
///
/// An object without `evaluations`, or with keys besides it, is an unknown
/// shape. It still deserializes so the page can render, but
/// [`EvaluationsEnvelope::into_reviews`] reports it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluationsEnvelope {
    #[serde(default)]
    pub evaluations: Option<Vec<RawReview>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EvaluationsEnvelope {
    pub fn is_recognized(&self) -> bool {
        self.evaluations.is_some() && self.extra.is_empty()
    }

    /// The reviews, none if the `evaluations` key is missing. Logs a warning
    /// for an unknown shape.
    pub fn into_reviews(self) -> Vec<RawReview> {
        if !self.is_recognized() {
            warn_unknown_envelope("evaluations", self.evaluations.is_some(), &self.extra);
        }
        self.evaluations.unwrap_or_default()
    }
}

/// `{ "cars": [...] }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WrappedCarList {
    #[serde(default)]
    pub cars: Option<Vec<RawCar>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /cars`, which has been seen both wrapped in `{ "cars": [...] }` and bare.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CarListEnvelope {
    Bare(Vec<RawCar>),
    Wrapped(WrappedCarList),
}

impl CarListEnvelope {
    pub fn is_recognized(&self) -> bool {
        match self {
            CarListEnvelope::Bare(_) => true,
            CarListEnvelope::Wrapped(list) => list.cars.is_some() && list.extra.is_empty(),
        }
    }

    /// The cars, none if a wrapped list has no `cars` key. Logs a warning for
    /// an unknown shape.
    pub fn into_cars(self) -> Vec<RawCar> {
        if !self.is_recognized() {
            if let CarListEnvelope::Wrapped(list) = &self {
                warn_unknown_envelope("cars", list.cars.is_some(), &list.extra);
            }
        }
        match self {
            CarListEnvelope::Wrapped(list) => list.cars.unwrap_or_default(),
            CarListEnvelope::Bare(cars) => cars,
        }
    }
}

fn warn_unknown_envelope(expected: &'static str, found: bool, extra: &Map<String, Value>) {
    let fields: Vec<&str> = extra.keys().map(String::as_str).collect();
    warn!(expected, found, ?fields, "Response envelope does not match any known shape");
}

/// Any document that carries reviews: a car detail response, an evaluations
/// response, or a bare list of review records.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReviewDocument {
    // Tried first: a one-element list would otherwise pass as a car envelope.
    Bare(Vec<RawReview>),
    CarDetail(CarDetailEnvelope),
    Evaluations(EvaluationsEnvelope),
}

/// `POST /sessions`
#[derive(Debug, Clone, Deserialize)]
pub struct RawAuthResponse {
    pub token: String,
    pub user: RawUser,
}
