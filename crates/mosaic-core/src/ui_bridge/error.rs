//! # Mosaic Core UI Bridge Errors
//!
//! Errors raised by UI surfaces and notifiers. Surfaces are the DOM-like
//! collaborator components render into, so most failures here concern
//! missing elements or listener bookkeeping.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiBridgeError {
    #[error("Element '{0}' not found on the UI surface")]
    ElementNotFound(String),

    #[error("Failed to attach '{event}' listener to element '{element}': {reason}")]
    ListenerAttachFailed {
        element: String,
        event: String,
        reason: String,
    },

    #[error("Failed to acquire lock for '{entity}' during operation '{operation}'")]
    LockError {
        entity: String,
        operation: String,
    },

    #[error("UI Bridge internal error: {0}")]
    InternalError(String),
}
