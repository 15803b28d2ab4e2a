pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod output;
pub mod services;
pub mod session;
pub mod submission;
