use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue, InvalidHeaderValue};

/// An [`HttpClient`] wrapper that injects a credential as an HTTP header.
///
/// The header is validated when the wrapper is built, so `execute` never has
/// to deal with a malformed credential.
pub struct ApiKey<C> {
    inner: C,
    header_name: HeaderName,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn bearer(inner: C, token: &str) -> Result<Self, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
        value.set_sensitive(true);
        Ok(Self {
            inner,
            header_name: AUTHORIZATION,
            value,
        })
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.value.clone());
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records the headers of the last request and answers 204.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Option<reqwest::header::HeaderMap>>,
    }

    #[async_trait]
    impl HttpClient for Recorder {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            *self.seen.lock().unwrap() = Some(req.headers().clone());
            let resp = http::Response::builder().status(204).body(Vec::new()).unwrap();
            Ok(reqwest::Response::from(resp))
        }
    }

    #[tokio::test]
    async fn test_bearer_header_injected() {
        let client = ApiKey::bearer(Recorder::default(), "abc123").unwrap();
        let req = reqwest::Request::new(
            reqwest::Method::GET,
            "http://localhost:3333/cars".parse().unwrap(),
        );

        client.execute(req).await.unwrap();

        let headers = client.inner().seen.lock().unwrap().clone().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc123");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[test]
    fn test_invalid_token_rejected() {
        assert!(ApiKey::bearer(Recorder::default(), "bad\ntoken").is_err());
    }
}
