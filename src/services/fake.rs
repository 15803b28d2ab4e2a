//! In-memory API used by the service tests.

use std::sync::Mutex;

use anyhow::{Result, anyhow};
use serde_json::Value;

use crate::models::{AuthResponse, RawCar, RawReview, Role, User};
use crate::services::reviews_api::{AccountApi, CatalogAdminApi, ReviewsApi};
use crate::session::Session;
use crate::submission::{CarDraft, Credentials, Registration, ReviewPayload};

#[derive(Default)]
pub(crate) struct FakeApi {
    pub cars: Vec<Value>,
    pub car: Option<Value>,
    /// `None` makes the evaluations endpoint fail.
    pub evaluations: Option<Vec<Value>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

pub(crate) fn session(user_id: &str, role: Role) -> Session {
    Session::new(
        "token".to_string(),
        User {
            id: user_id.to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role,
        },
    )
}

#[async_trait::async_trait]
impl ReviewsApi for FakeApi {
    async fn list_cars(&self) -> Result<Vec<RawCar>> {
        self.record("list_cars".into());
        Ok(self
            .cars
            .iter()
            .map(|c| serde_json::from_value::<RawCar>(c.clone()))
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn get_car(&self, car_id: &str) -> Result<RawCar> {
        self.record(format!("get_car {car_id}"));
        let car = self.car.clone().ok_or_else(|| anyhow!("car {car_id} not found"))?;
        Ok(serde_json::from_value(car)?)
    }

    async fn list_car_reviews(&self, car_id: &str) -> Result<Vec<RawReview>> {
        self.record(format!("list_car_reviews {car_id}"));
        let evaluations = self
            .evaluations
            .clone()
            .ok_or_else(|| anyhow!("evaluations endpoint unavailable"))?;
        Ok(evaluations
            .into_iter()
            .map(serde_json::from_value::<RawReview>)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

#[async_trait::async_trait]
impl AccountApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        self.record(format!("login {}", credentials.email));
        Ok(AuthResponse {
            token: "token".into(),
            user: session("u1", Role::User).user().clone(),
        })
    }

    async fn register(&self, registration: &Registration) -> Result<()> {
        self.record(format!("register {}", registration.email));
        Ok(())
    }

    async fn submit_review(
        &self,
        _session: &Session,
        car_id: &str,
        _review: &ReviewPayload,
    ) -> Result<()> {
        self.record(format!("submit_review {car_id}"));
        Ok(())
    }

    async fn delete_review(&self, _session: &Session, review_id: &str) -> Result<()> {
        self.record(format!("delete_review {review_id}"));
        Ok(())
    }
}

#[async_trait::async_trait]
impl CatalogAdminApi for FakeApi {
    async fn save_car(
        &self,
        _session: &Session,
        car_id: Option<&str>,
        draft: &CarDraft,
    ) -> Result<()> {
        self.record(format!("save_car {} {}", car_id.unwrap_or("new"), draft.model));
        Ok(())
    }

    async fn delete_car(&self, _session: &Session, car_id: &str) -> Result<()> {
        self.record(format!("delete_car {car_id}"));
        Ok(())
    }

    async fn set_car_active(&self, _session: &Session, car_id: &str, active: bool) -> Result<()> {
        self.record(format!("set_car_active {car_id} {active}"));
        Ok(())
    }
}
