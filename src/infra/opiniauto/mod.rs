//! REST API client for the marketplace backend.

mod client;

pub use client::{DEFAULT_BASE_URL, OpiniautoClient};
