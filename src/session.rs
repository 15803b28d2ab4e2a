//! The signed-in viewer.
//!
//! A [`Session`] is created from a successful login and dropped on logout.
//! Anything that needs the viewer's identity or credential takes it by
//! reference; there is no ambient current-user state.

use reqwest::header::InvalidHeaderValue;
use tracing::info;

use crate::error::ApiError;
use crate::fetch::auth::ApiKey;
use crate::models::{AuthResponse, Review, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    user: User,
}

impl Session {
    pub fn new(token: String, user: User) -> Self {
        info!(user_id = %user.id, role = ?user.role, "Session started");
        Self { token, user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Whether the viewer wrote `review`, which gates its delete action.
    pub fn is_author(&self, review: &Review) -> bool {
        review.user_id.as_deref() == Some(self.user.id.as_str())
    }

    /// Gate for catalog management.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.user.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }

    /// Wraps `inner` so every request carries this session's bearer token.
    pub fn authorize<C>(&self, inner: C) -> Result<ApiKey<C>, InvalidHeaderValue> {
        ApiKey::bearer(inner, &self.token)
    }

    /// Ends the session, consuming it.
    pub fn logout(self) {
        info!(user_id = %self.user.id, "Session ended");
    }
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        Session::new(auth.token, auth.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role,
        }
    }

    fn review_by(user_id: Option<&str>) -> Review {
        Review {
            id: "r1".to_string(),
            car_id: Some("c1".to_string()),
            user_id: user_id.map(str::to_string),
            rating_performance: 4.0,
            rating_comfort: 4.0,
            rating_consumption: 4.0,
            rating_design: 4.0,
            rating_cost_benefit: 4.0,
            comment: "Bom carro no geral".to_string(),
            created_at: None,
            user: None,
        }
    }

    #[test]
    fn test_is_author() {
        let session = Session::new("t".into(), user("u1", Role::User));

        assert!(session.is_author(&review_by(Some("u1"))));
        assert!(!session.is_author(&review_by(Some("u2"))));
        assert!(!session.is_author(&review_by(None)));
    }

    #[test]
    fn test_require_admin() {
        let admin = Session::new("t".into(), user("u1", Role::Admin));
        let plain = Session::new("t".into(), user("u2", Role::User));

        assert_eq!(admin.require_admin(), Ok(()));
        assert_eq!(plain.require_admin(), Err(ApiError::Forbidden));
    }

    #[test]
    fn test_from_auth_response() {
        let session = Session::from(AuthResponse {
            token: "jwt".into(),
            user: user("u1", Role::User),
        });

        assert_eq!(session.token(), "jwt");
        assert_eq!(session.user().id, "u1");
        session.logout();
    }
}
