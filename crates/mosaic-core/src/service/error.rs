//! # Mosaic Core Service Errors
//!
//! Errors raised by the service registry and dependency bundles. Missing
//! services are normally reported as `None` by lookups; these variants exist
//! for callers that decide an absence is fatal.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Service '{name}' is not registered")]
    NotFound { name: String },

    #[error("Service '{name}' is registered but is not a {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("Required services are missing from the registry: {missing:?}")]
    MissingRequiredServices { missing: Vec<String> },
}
