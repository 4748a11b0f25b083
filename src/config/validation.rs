//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("identity.anon_id is required")]
    MissingAnonId,
    #[error("identity.anon_name is required")]
    MissingAnonName,
    #[error("identity.client_id_prefix is required")]
    MissingClientIdPrefix,
    #[error("identity.anon_id '{0}' collides with generated client ids")]
    AnonIdCollides(String),
    #[error("chat.transport_capacity must be at least 1")]
    ZeroTransportCapacity,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let identity = &config.identity;

    if identity.anon_id.is_empty() {
        errors.push(ValidationError::MissingAnonId);
    }
    if identity.anon_name.is_empty() {
        errors.push(ValidationError::MissingAnonName);
    }
    if identity.client_id_prefix.is_empty() {
        errors.push(ValidationError::MissingClientIdPrefix);
    }

    // Generated ids are prefix + decimal counter; the placeholder must never be one of them.
    if !identity.client_id_prefix.is_empty()
        && let Some(rest) = identity.anon_id.strip_prefix(&identity.client_id_prefix)
        && !rest.is_empty()
        && rest.bytes().all(|b| b.is_ascii_digit())
    {
        errors.push(ValidationError::AnonIdCollides(identity.anon_id.clone()));
    }

    if config.chat.transport_capacity == 0 {
        errors.push(ValidationError::ZeroTransportCapacity);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
