//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (retry bound >= 1, timeouts > 0)
//! - Check the ignore header is a legal header name
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - The coordinator runs the same reauth checks when built in code

use reqwest::header::HeaderName;
use thiserror::Error;

use crate::config::schema::{ClientConfig, ReauthConfig};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("reauth.retry_bound must be at least 1")]
    ZeroRetryBound,

    #[error("reauth.ignore_header {0:?} is not a valid header name")]
    InvalidIgnoreHeader(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a full configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = validate_reauth(&config.reauth);

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the reauthentication section on its own.
pub fn validate_reauth(config: &ReauthConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if config.retry_bound == 0 {
        errors.push(ValidationError::ZeroRetryBound);
    }
    if let Err(e) = ignore_header_name(&config.ignore_header) {
        errors.push(e);
    }
    errors
}

/// Parse the configured ignore header into a `HeaderName`.
pub fn ignore_header_name(raw: &str) -> Result<HeaderName, ValidationError> {
    HeaderName::from_bytes(raw.as_bytes())
        .map_err(|_| ValidationError::InvalidIgnoreHeader(raw.to_string()))
}
