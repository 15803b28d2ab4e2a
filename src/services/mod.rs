//! Page-level flows built on the REST API traits.
//!
//! [`reviews_api`] defines the seams; [`car_details`], [`catalog`] and
//! [`account`] run the validate, fetch, normalize and aggregate cycles on top
//! of them.

pub mod account;
pub mod car_details;
pub mod catalog;
pub mod reviews_api;

#[cfg(test)]
pub(crate) mod fake;

pub use account::{register, sign_in};
pub use car_details::{
    CarDetails, delete_review, load_car_details, reviews_from_document, submit_review,
};
pub use catalog::{
    delete_car, list_active_cars, list_all_cars, save_car, search_cars, toggle_car_active,
};
pub use reviews_api::{AccountApi, CatalogAdminApi, ReviewsApi};
