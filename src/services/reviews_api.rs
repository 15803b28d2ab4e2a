//! Traits for talking to the marketplace REST API.
//!
//! The read side returns raw upstream records; normalizing them is the
//! caller's job. Write operations take the [`Session`] whose credential they
//! act under.

use anyhow::Result;

use crate::models::{AuthResponse, RawCar, RawReview};
use crate::session::Session;
use crate::submission::{CarDraft, Credentials, Registration, ReviewPayload};

/// Public, read-only endpoints.
#[async_trait::async_trait]
pub trait ReviewsApi: Send + Sync {
    /// `GET /cars`: every car, active or not, in the listing shape.
    async fn list_cars(&self) -> Result<Vec<RawCar>>;

    /// `GET /cars/{id}`: one car in the detail shape, reviews possibly embedded.
    async fn get_car(&self, car_id: &str) -> Result<RawCar>;

    /// `GET /cars/{id}/evaluations`: the car's reviews on their own.
    async fn list_car_reviews(&self, car_id: &str) -> Result<Vec<RawReview>>;
}

/// Account endpoints and the viewer's own reviews.
#[async_trait::async_trait]
pub trait AccountApi: Send + Sync {
    /// `POST /sessions`
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse>;

    /// `POST /auth/register`
    async fn register(&self, registration: &Registration) -> Result<()>;

    /// `POST /cars/{id}/evaluations`
    async fn submit_review(
        &self,
        session: &Session,
        car_id: &str,
        review: &ReviewPayload,
    ) -> Result<()>;

    /// `DELETE /evaluations/{id}`
    async fn delete_review(&self, session: &Session, review_id: &str) -> Result<()>;
}

/// Catalog management, administrators only.
#[async_trait::async_trait]
pub trait CatalogAdminApi: Send + Sync {
    /// `POST /cars` when `car_id` is `None`, `PUT /cars/{id}` otherwise.
    async fn save_car(
        &self,
        session: &Session,
        car_id: Option<&str>,
        draft: &CarDraft,
    ) -> Result<()>;

    /// `DELETE /cars/{id}`
    async fn delete_car(&self, session: &Session, car_id: &str) -> Result<()>;

    /// `PATCH /cars/{id}` with `{ "active": bool }`
    async fn set_car_active(&self, session: &Session, car_id: &str, active: bool) -> Result<()>;
}
