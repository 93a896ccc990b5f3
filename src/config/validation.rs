//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ports valid, paths well formed)
//! - Protect the log-line contract (marker must not contain a comma)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: ChainConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::ChainConfig;

/// One semantic problem found in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener port must be nonzero")]
    ZeroPort,

    #[error("endpoint path '{0}' must start with '/'")]
    BadEndpointPath(String),

    #[error("base url '{0}' is not a valid URL: {1}")]
    BadBaseUrl(String, url::ParseError),

    #[error("trace marker must not be empty")]
    EmptyMarker,

    #[error("trace marker must not contain a comma")]
    CommaInMarker,

    #[error("log path must not be empty")]
    EmptyLogPath,

    #[error("producer and test log paths must differ")]
    SameLogPaths,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ChainConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    for path in [
        &config.endpoints.first,
        &config.endpoints.second,
        &config.endpoints.third,
    ] {
        if !path.starts_with('/') {
            errors.push(ValidationError::BadEndpointPath(path.clone()));
        }
    }

    for base in [&config.endpoints.base_url, &config.endpoints.user_api_base]
        .into_iter()
        .flatten()
    {
        if let Err(e) = Url::parse(base) {
            errors.push(ValidationError::BadBaseUrl(base.clone(), e));
        }
    }

    if config.trace.marker.is_empty() {
        errors.push(ValidationError::EmptyMarker);
    } else if config.trace.marker.contains(',') {
        // A comma in the marker would shift the trace id out of the
        // second field and break the harness parser.
        errors.push(ValidationError::CommaInMarker);
    }

    if config.logs.producer_path.is_empty() || config.logs.test_path.is_empty() {
        errors.push(ValidationError::EmptyLogPath);
    } else if config.logs.producer_path == config.logs.test_path {
        errors.push(ValidationError::SameLogPaths);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
