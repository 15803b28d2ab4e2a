//! Metric aggregation over canonical reviews.
//!
//! This module turns a review collection into the five per-category averages
//! and the overall average every display surface renders, plus the helpers
//! that turn those numbers into stars and bar widths.

pub mod aggregate;
pub mod stars;
pub mod utility;

pub use aggregate::{car_metrics, category_average, overall_average, review_average};
pub use stars::{StarBreakdown, bar_fraction, format_rating};
