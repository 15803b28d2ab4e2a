use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Request, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::fetch::{HttpClient, json_request};
use crate::models::{
    AuthResponse, CarDetailEnvelope, CarListEnvelope, EvaluationsEnvelope, RawAuthResponse, RawCar,
    RawReview,
};
use crate::normalize::normalize_user;
use crate::services::reviews_api::{AccountApi, CatalogAdminApi, ReviewsApi};
use crate::session::Session;
use crate::submission::{CarDraft, Credentials, Registration, ReviewPayload};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";

/// Client for the marketplace REST API.
///
/// Public endpoints go through `http` as is; write operations wrap it with the
/// caller's session credential for the duration of one request.
pub struct OpiniautoClient<C> {
    base_url: Url,
    http: C,
}

impl<C: HttpClient> OpiniautoClient<C> {
    pub fn new(base_url: &str, http: C) -> Result<Self> {
        let base_url = base_url
            .parse()
            .with_context(|| format!("Invalid API base URL '{base_url}'"))?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base URL '{}' cannot take a path", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, session: Option<&Session>, req: Request) -> Result<Response> {
        let method = req.method().clone();
        let url = req.url().clone();

        let response = match session {
            Some(session) => session.authorize(&self.http)?.execute(req).await,
            None => self.http.execute(req).await,
        }
        .with_context(|| format!("Failed to send {method} {url}"))?;

        debug!(%method, %url, status = response.status().as_u16(), "API response received");
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, resource: &str) -> Result<T> {
        let response = self.send(None, Request::new(Method::GET, url)).await?;
        let response = check_status(response, resource).await?;
        parse_body(response, resource).await
    }
}

/// Maps non-success statuses onto [`ApiError`].
async fn check_status(response: Response, resource: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let err = match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => ApiError::Forbidden,
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => ApiError::NotFound {
            resource: resource.to_string(),
        },
        _ => ApiError::Status {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        },
    };
    Err(err.into())
}

async fn parse_body<T: DeserializeOwned>(response: Response, resource: &str) -> Result<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| {
        let body_str = String::from_utf8_lossy(&body);
        error!(error = %e, body = %body_str, resource, "Failed to parse API response");
        anyhow!("Failed to parse {resource} response: {e}")
    })
}

fn car_form(draft: &CarDraft) -> Result<Form> {
    let mut form = Form::new()
        .text("brand", draft.brand.clone())
        .text("model", draft.model.clone())
        .text("year", draft.year.clone());
    if let Some(image) = &draft.image {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)?;
        form = form.part("image", part);
    }
    Ok(form)
}

#[async_trait]
impl<C: HttpClient> ReviewsApi for OpiniautoClient<C> {
    async fn list_cars(&self) -> Result<Vec<RawCar>> {
        let envelope: CarListEnvelope = self.get_json(self.endpoint(&["cars"])?, "car list").await?;
        Ok(envelope.into_cars())
    }

    async fn get_car(&self, car_id: &str) -> Result<RawCar> {
        let envelope: CarDetailEnvelope = self
            .get_json(self.endpoint(&["cars", car_id])?, &format!("car {car_id}"))
            .await?;
        Ok(envelope.car)
    }

    async fn list_car_reviews(&self, car_id: &str) -> Result<Vec<RawReview>> {
        let envelope: EvaluationsEnvelope = self
            .get_json(
                self.endpoint(&["cars", car_id, "evaluations"])?,
                &format!("reviews of car {car_id}"),
            )
            .await?;
        Ok(envelope.into_reviews())
    }
}

#[async_trait]
impl<C: HttpClient> AccountApi for OpiniautoClient<C> {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let req = json_request(Method::POST, self.endpoint(&["sessions"])?, credentials)?;
        let response = check_status(self.send(None, req).await?, "session").await?;
        let raw: RawAuthResponse = parse_body(response, "session").await?;

        Ok(AuthResponse {
            token: raw.token,
            user: normalize_user(raw.user)?,
        })
    }

    async fn register(&self, registration: &Registration) -> Result<()> {
        let req = json_request(Method::POST, self.endpoint(&["auth", "register"])?, registration)?;
        check_status(self.send(None, req).await?, "registration").await?;
        Ok(())
    }

    async fn submit_review(
        &self,
        session: &Session,
        car_id: &str,
        review: &ReviewPayload,
    ) -> Result<()> {
        let url = self.endpoint(&["cars", car_id, "evaluations"])?;
        let response = self
            .send(Some(session), json_request(Method::POST, url, review)?)
            .await?;
        if response.status() == StatusCode::CONFLICT {
            return Err(ApiError::AlreadyReviewed.into());
        }
        check_status(response, &format!("car {car_id}")).await?;
        Ok(())
    }

    async fn delete_review(&self, session: &Session, review_id: &str) -> Result<()> {
        let url = self.endpoint(&["evaluations", review_id])?;
        let response = self.send(Some(session), Request::new(Method::DELETE, url)).await?;
        check_status(response, &format!("review {review_id}")).await?;
        Ok(())
    }
}

#[async_trait]
impl<C: HttpClient> CatalogAdminApi for OpiniautoClient<C> {
    async fn save_car(
        &self,
        session: &Session,
        car_id: Option<&str>,
        draft: &CarDraft,
    ) -> Result<()> {
        let (method, url) = match car_id {
            Some(id) => (Method::PUT, self.endpoint(&["cars", id])?),
            None => (Method::POST, self.endpoint(&["cars"])?),
        };
        // Multipart bodies can only be assembled through a RequestBuilder.
        let req = reqwest::Client::new()
            .request(method, url)
            .multipart(car_form(draft)?)
            .build()?;

        let response = self.send(Some(session), req).await?;
        check_status(response, &format!("car {}", car_id.unwrap_or("new"))).await?;
        Ok(())
    }

    async fn delete_car(&self, session: &Session, car_id: &str) -> Result<()> {
        let url = self.endpoint(&["cars", car_id])?;
        let response = self.send(Some(session), Request::new(Method::DELETE, url)).await?;
        check_status(response, &format!("car {car_id}")).await?;
        Ok(())
    }

    async fn set_car_active(&self, session: &Session, car_id: &str, active: bool) -> Result<()> {
        let url = self.endpoint(&["cars", car_id])?;
        let req = json_request(Method::PATCH, url, &json!({ "active": active }))?;
        let response = self.send(Some(session), req).await?;
        check_status(response, &format!("car {car_id}")).await?;
        Ok(())
    }
}
