//! Input validation helpers shared by the club and member handlers.
//!
//! All checks run before any registry mutation, so a rejected request
//! never leaves a partial write behind.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ApiError;

// Loose syntactic check: something@something.tld, no whitespace
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid"));

/// Validate that a required string field is non-empty (ignoring whitespace).
pub fn validate_required_text(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Validate the denormalized member counter is non-negative.
pub fn validate_member_count(value: i64) -> Result<(), ApiError> {
    if value < 0 {
        return Err(ApiError::validation(format!(
            "members must be non-negative, got {value}"
        )));
    }
    Ok(())
}

/// Validate an email address is syntactically plausible.
pub fn validate_email(value: &str) -> Result<(), ApiError> {
    if !EMAIL_RE.is_match(value) {
        return Err(ApiError::validation(format!(
            "email is not a valid address: {value}"
        )));
    }
    Ok(())
}
