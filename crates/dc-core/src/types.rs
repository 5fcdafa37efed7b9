//! Validation errors shared across core types.

use thiserror::Error;

/// Validation errors for core types.
///
/// Raised before any storage call; a value that fails validation never
/// reaches the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A date argument was not a calendar date.
    #[error("invalid date: {value}, expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// A timestamp argument was neither a calendar date nor RFC 3339.
    #[error("invalid timestamp: {value}, expected YYYY-MM-DD or RFC 3339")]
    InvalidTimestamp { value: String },

    /// An email address without a local part and domain.
    #[error("invalid email address: {value}")]
    InvalidEmail { value: String },
}
