//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts, body limits, bind address)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the config
//! - Runs before a config is accepted into the engine

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::EngineConfig;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("bind address '{0}' is not a valid socket address")]
    InvalidAddress(String),

    #[error("max_request_body must be greater than zero")]
    ZeroMaxRequestBody,

    #[error("write_timeout_ms must be greater than zero")]
    ZeroWriteTimeout,
}

/// Check an [`EngineConfig`] for semantic mistakes, collecting every
/// failure.
pub fn validate_config(config: &EngineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress(config.address.clone()));
    }
    if config.max_request_body == 0 {
        errors.push(ValidationError::ZeroMaxRequestBody);
    }
    if config.write_timeout_ms == 0 {
        errors.push(ValidationError::ZeroWriteTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
