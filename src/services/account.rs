//! Sign-in and sign-up. Both run the client-side checks before any request.

use anyhow::Result;
use tracing::{info, warn};

use crate::services::reviews_api::AccountApi;
use crate::session::Session;
use crate::submission::{Credentials, Registration};

/// Validates `credentials`, logs in and starts a [`Session`].
#[tracing::instrument(skip_all, fields(email = %credentials.email))]
pub async fn sign_in<A>(api: &A, credentials: &Credentials) -> Result<Session>
where
    A: AccountApi + ?Sized,
{
    if let Err(e) = credentials.validate() {
        warn!(error = %e, "Credentials rejected before login");
        return Err(e.into());
    }
    Ok(Session::from(api.login(credentials).await?))
}

/// Validates `registration` and creates the account. Does not sign in.
#[tracing::instrument(skip_all, fields(email = %registration.email))]
pub async fn register<A>(api: &A, registration: &Registration) -> Result<()>
where
    A: AccountApi + ?Sized,
{
    registration.validate()?;
    api.register(registration).await?;
    info!("Account registered");
    Ok(())
}
