use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes one request. Decorators such as [`crate::fetch::auth::ApiKey`]
/// wrap an inner client and adjust the request on the way through.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for &C {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        (**self).execute(req).await
    }
}
