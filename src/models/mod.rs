//! Record shapes on both sides of the normalizer.
//!
//! [`raw`] mirrors what the REST API sends, with its localized field names.
//! [`canonical`] is what every display surface consumes. [`metrics`] holds
//! the aggregator's output.

pub mod canonical;
pub mod metrics;
pub mod raw;

pub use canonical::{AuthResponse, Car, Review, ReviewAuthor, Role, User};
pub use metrics::{CarMetrics, Category, CategoryMetric, OverallMetric};
pub use raw::{
    CarDetailEnvelope, CarListEnvelope, EvaluationsEnvelope, RawAuthResponse, RawCar, RawReview,
    RawUser, ReviewDocument, WrappedCarList,
};
