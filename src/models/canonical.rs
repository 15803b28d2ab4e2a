//! The internal record shapes every display surface consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::metrics::Category;

/// A review after normalization.
///
/// Ratings are `f64` so a malformed upstream value survives as NaN instead of
/// failing the whole collection; the aggregator treats NaN as a zero
/// contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub car_id: Option<String>,
    pub user_id: Option<String>,
    pub rating_performance: f64,
    pub rating_comfort: f64,
    pub rating_consumption: f64,
    pub rating_design: f64,
    pub rating_cost_benefit: f64,
    pub comment: String,
    pub created_at: Option<DateTime<Utc>>,
    pub user: Option<ReviewAuthor>,
}

impl Review {
    /// The review's value for one category.
    pub fn rating(&self, category: Category) -> f64 {
        match category {
            Category::Performance => self.rating_performance,
            Category::Comfort => self.rating_comfort,
            Category::Consumption => self.rating_consumption,
            Category::Design => self.rating_design,
            Category::CostBenefit => self.rating_cost_benefit,
        }
    }

    /// All five ratings in display order.
    pub fn ratings(&self) -> [f64; 5] {
        Category::ALL.map(|c| self.rating(c))
    }

    /// Name shown next to the review, falling back to a generic label.
    pub fn author_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or("Usuário")
    }
}

/// Denormalized author of a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub image_url: Option<String>,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub engine_type: Option<String>,
    /// Overall metric for the summary badge, once reviews were aggregated.
    pub average_rating: Option<f64>,
}

impl Car {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Successful login: bearer token plus the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
