//! Typed errors for the cases callers branch on.
//!
//! Service and infra layers return `anyhow::Result`; these enums travel inside
//! it and can be recovered with `downcast_ref`.

use thiserror::Error;

/// A raw record that cannot become a canonical record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("{record} record has no identifier")]
    MissingId { record: &'static str },
}

/// A review or car draft that is not ready to be sent upstream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("rating for {category} is not set")]
    RatingUnset { category: &'static str },

    #[error("rating for {category} must be between 1 and 5, got {value}")]
    RatingOutOfRange { category: &'static str, value: u8 },

    #[error("comment must have at least {min} characters")]
    CommentTooShort { min: usize },

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("year must have at least 4 characters")]
    InvalidYear,

    #[error("an image is required to create a car")]
    ImageRequired,

    #[error("name must have at least {min} characters")]
    NameTooShort { min: usize },

    #[error("invalid email")]
    InvalidEmail,

    #[error("password must have at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Non-success responses from the REST API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("not authenticated or session expired")]
    Unauthorized,

    #[error("operation requires an administrator session")]
    Forbidden,

    #[error("{resource} not found or invalid id")]
    NotFound { resource: String },

    #[error("this user already reviewed the car")]
    AlreadyReviewed,

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },
}
