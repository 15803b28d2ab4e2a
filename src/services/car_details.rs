//! The car detail page's fetch, normalize and aggregate cycle.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::metrics::car_metrics;
use crate::models::{Car, CarMetrics, Review, ReviewDocument};
use crate::normalize::{EmbeddedReviews, ReviewSource, normalize_car, normalize_reviews};
use crate::services::reviews_api::{AccountApi, ReviewsApi};
use crate::session::Session;
use crate::submission::ReviewSubmission;

/// Everything the detail page renders for one car.
#[derive(Debug, Clone, PartialEq)]
pub struct CarDetails {
    pub car: Car,
    pub reviews: Vec<Review>,
    pub metrics: CarMetrics,
}

impl CarDetails {
    /// Aggregates `reviews` and copies the overall metric onto the car's badge.
    pub fn new(mut car: Car, reviews: Vec<Review>) -> Self {
        let metrics = car_metrics(&reviews);
        car.average_rating = Some(metrics.overall().value());
        Self { car, reviews, metrics }
    }

    /// Drops a review and recomputes the metrics. Returns whether it was present.
    pub fn remove_review(&mut self, review_id: &str) -> bool {
        let before = self.reviews.len();
        self.reviews.retain(|r| r.id != review_id);
        if self.reviews.len() == before {
            return false;
        }
        self.metrics = car_metrics(&self.reviews);
        self.car.average_rating = Some(self.metrics.overall().value());
        true
    }
}

/// Loads a car and its reviews and aggregates them.
///
/// Reviews embedded in the car response are used when present; otherwise they
/// are fetched from the evaluations endpoint. If that second fetch fails the
/// page still renders with no reviews. A failure fetching the car itself is
/// returned to the caller.
#[tracing::instrument(skip(api))]
pub async fn load_car_details<A>(api: &A, car_id: &str) -> Result<CarDetails>
where
    A: ReviewsApi + ?Sized,
{
    let raw_car = api.get_car(car_id).await?;
    let embedded = EmbeddedReviews::from_car(&raw_car);
    let car = normalize_car(raw_car)?;

    let source = match embedded {
        EmbeddedReviews::Present(records) => {
            debug!(count = records.len(), "Reviews embedded in car response");
            ReviewSource::Embedded(records)
        }
        EmbeddedReviews::Absent => match api.list_car_reviews(car_id).await {
            Ok(records) => ReviewSource::Separate(records),
            Err(e) => {
                warn!(error = %e, "Could not fetch reviews separately");
                ReviewSource::Separate(Vec::new())
            }
        },
    };

    let reviews = normalize_reviews(source);
    let details = CarDetails::new(car, reviews);

    info!(
        total_reviews = details.metrics.total_reviews(),
        overall = details.metrics.overall().value(),
        "Car details loaded"
    );
    Ok(details)
}

/// Turns any review-carrying document into a review source.
///
/// A car detail document contributes its embedded reviews, or none. An object
/// of unknown shape contributes none and is logged.
pub fn reviews_from_document(document: ReviewDocument) -> ReviewSource {
    match document {
        ReviewDocument::CarDetail(envelope) => match EmbeddedReviews::from_car(&envelope.car) {
            EmbeddedReviews::Present(records) => ReviewSource::Embedded(records),
            EmbeddedReviews::Absent => ReviewSource::Embedded(Vec::new()),
        },
        ReviewDocument::Evaluations(envelope) => ReviewSource::Separate(envelope.into_reviews()),
        ReviewDocument::Bare(records) => ReviewSource::Separate(records),
    }
}

/// Validates and sends a review for `car_id`.
#[tracing::instrument(skip(api, session, submission))]
pub async fn submit_review<A>(
    api: &A,
    session: &Session,
    car_id: &str,
    submission: &ReviewSubmission,
) -> Result<()>
where
    A: AccountApi + ?Sized,
{
    let payload = submission.validate()?;
    api.submit_review(session, car_id, &payload).await?;
    info!("Review submitted");
    Ok(())
}

/// Deletes one of the viewer's own reviews and updates `details` in place.
///
/// Only the author may delete; anyone else gets [`ApiError::Forbidden`]
/// without a request being sent.
#[tracing::instrument(skip(api, session, details))]
pub async fn delete_review<A>(
    api: &A,
    session: &Session,
    details: &mut CarDetails,
    review_id: &str,
) -> Result<()>
where
    A: AccountApi + ?Sized,
{
    let Some(review) = details.reviews.iter().find(|r| r.id == review_id) else {
        return Err(ApiError::NotFound {
            resource: format!("review {review_id}"),
        }
        .into());
    };
    if !session.is_author(review) {
        return Err(ApiError::Forbidden.into());
    }

    api.delete_review(session, review_id).await?;
    details.remove_review(review_id);
    info!(remaining = details.reviews.len(), "Review deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Role};
    use crate::services::fake::{FakeApi, session};
    use serde_json::{Value, json};

    fn raw_review(id: &str, user: &str, ratings: [i64; 5]) -> Value {
        json!({
            "id": id,
            "notaDesempenho": ratings[0],
            "notaConforto": ratings[1],
            "notaConsumo": ratings[2],
            "notaDesign": ratings[3],
            "notaCustoBeneficio": ratings[4],
            "comentario": "Comentário de teste",
            "usuarioId": user,
            "carroId": "c1",
            "criadoEm": "2025-02-01T10:00:00Z",
            "usuario": { "id": user, "nome": "Ana", "email": "ana@example.com" }
        })
    }

    fn car(embedded: Value) -> Value {
        json!({
            "id": "c1", "marca": "Fiat", "modelo": "Pulse", "ano": 2024,
            "imagem": "https://img/pulse.png", "status": "ATIVO",
            "categoria": "SUV", "tipoMotorizacao": "Turbo",
            "avaliacao": embedded
        })
    }

    #[tokio::test]
    async fn test_embedded_reviews_skip_second_fetch() {
        let api = FakeApi {
            car: Some(car(json!([raw_review("r1", "u1", [5, 4, 3, 2, 1])]))),
            evaluations: Some(vec![raw_review("r9", "u9", [1, 1, 1, 1, 1])]),
            ..Default::default()
        };

        let details = load_car_details(&api, "c1").await.unwrap();

        assert_eq!(api.calls(), vec!["get_car c1"]);
        assert_eq!(details.reviews.len(), 1);
        assert_eq!(details.metrics.overall().value(), 3.0);
        assert_eq!(details.car.average_rating, Some(3.0));
        assert_eq!(details.car.engine_type.as_deref(), Some("Turbo"));
    }

    #[tokio::test]
    async fn test_empty_embedded_list_falls_back() {
        let api = FakeApi {
            car: Some(car(json!([]))),
            evaluations: Some(vec![
                raw_review("r1", "u1", [5, 5, 5, 5, 5]),
                raw_review("r2", "u2", [1, 1, 1, 1, 1]),
            ]),
            ..Default::default()
        };

        let details = load_car_details(&api, "c1").await.unwrap();

        assert_eq!(api.calls(), vec!["get_car c1", "list_car_reviews c1"]);
        assert_eq!(details.metrics.total_reviews(), 2);
        assert!(details.metrics.categories().iter().all(|m| m.value() == 3.0));
    }

    #[tokio::test]
    async fn test_failed_fallback_renders_empty() {
        let api = FakeApi {
            car: Some(car(Value::Null)),
            evaluations: None,
            ..Default::default()
        };

        let details = load_car_details(&api, "c1").await.unwrap();

        assert!(details.reviews.is_empty());
        assert_eq!(details.metrics.overall().value(), 0.0);
        assert_eq!(details.metrics.category(Category::Comfort).value(), 0.0);
    }

    #[tokio::test]
    async fn test_missing_car_is_an_error() {
        let api = FakeApi::default();
        assert!(load_car_details(&api, "nope").await.is_err());
    }

    #[tokio::test]
    async fn test_author_deletes_own_review() {
        let api = FakeApi {
            car: Some(car(json!([
                raw_review("r1", "u1", [5, 5, 5, 5, 5]),
                raw_review("r2", "u2", [1, 1, 1, 1, 1]),
            ]))),
            ..Default::default()
        };
        let mut details = load_car_details(&api, "c1").await.unwrap();
        let viewer = session("u2", Role::User);

        delete_review(&api, &viewer, &mut details, "r2").await.unwrap();

        assert!(api.calls().contains(&"delete_review r2".to_string()));
        assert_eq!(details.reviews.len(), 1);
        assert_eq!(details.metrics.overall().value(), 5.0);
        assert_eq!(details.car.average_rating, Some(5.0));
    }

    #[tokio::test]
    async fn test_non_author_cannot_delete() {
        let api = FakeApi {
            car: Some(car(json!([raw_review("r1", "u1", [4, 4, 4, 4, 4])]))),
            ..Default::default()
        };
        let mut details = load_car_details(&api, "c1").await.unwrap();
        let viewer = session("u2", Role::Admin);

        let err = delete_review(&api, &viewer, &mut details, "r1").await.unwrap_err();

        assert_eq!(err.downcast_ref::<ApiError>(), Some(&ApiError::Forbidden));
        assert!(!api.calls().iter().any(|c| c.starts_with("delete_review")));
        assert_eq!(details.reviews.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_submission_not_sent() {
        let api = FakeApi::default();
        let viewer = session("u1", Role::User);
        let unset = ReviewSubmission {
            ratings: [5, 0, 5, 5, 5],
            comment: "Gostei bastante do carro".into(),
        };

        assert!(submit_review(&api, &viewer, "c1", &unset).await.is_err());
        assert!(api.calls().is_empty());

        let ready = ReviewSubmission {
            ratings: [5, 4, 5, 5, 5],
            ..unset
        };
        submit_review(&api, &viewer, "c1", &ready).await.unwrap();
        assert_eq!(api.calls(), vec!["submit_review c1"]);
    }

    #[test]
    fn test_document_sources() {
        let doc: ReviewDocument =
            serde_json::from_value(json!({ "car": car(Value::Null) })).unwrap();
        assert!(matches!(reviews_from_document(doc), ReviewSource::Embedded(r) if r.is_empty()));

        let review = raw_review("r1", "u1", [3, 3, 3, 3, 3]);
        let doc: ReviewDocument =
            serde_json::from_value(json!({ "evaluations": [review] })).unwrap();
        assert!(matches!(reviews_from_document(doc), ReviewSource::Separate(r) if r.len() == 1));
    }

    #[test]
    fn test_unknown_document_shape_yields_no_reviews() {
        let review = raw_review("r1", "u1", [5, 5, 5, 5, 5]);
        let doc: ReviewDocument =
            serde_json::from_value(json!({ "avaliacoes": [review] })).unwrap();

        let reviews = normalize_reviews(reviews_from_document(doc));

        assert!(reviews.is_empty());
    }
}
