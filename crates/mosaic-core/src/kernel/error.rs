//! # Mosaic Core Kernel Errors
//!
//! Defines the top-level error type of the framework.
//!
//! Every subsystem owns its own typed error enum ([`ServiceError`],
//! [`ComponentError`], [`UiBridgeError`], [`StageSystemError`],
//! [`StorageSystemError`]). [`Error`] folds them together so that bootstrap
//! code can propagate any of them with `?`.
use std::result::Result as StdResult;

use crate::component::error::ComponentError;
use crate::service::error::ServiceError;
use crate::stage_manager::error::StageSystemError;
use crate::storage::error::StorageSystemError;
use crate::ui_bridge::error::UiBridgeError;
use thiserror::Error as ThisError;

/// Custom error type for the Mosaic framework
#[derive(Debug, ThisError)]
pub enum Error {
    /// Service registry or dependency bundle error
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Component lifecycle or directory error
    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    /// Specific, typed stage system error
    #[error("Stage system error: {0}")]
    StageSystem(#[from] StageSystemError),

    /// Specific, typed storage system error
    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    /// UI Bridge system error
    #[error("UI Bridge system error: {0}")]
    UiBridge(#[from] UiBridgeError),

    /// Error occurring during a specific kernel lifecycle phase.
    #[error("Kernel lifecycle error during {phase:?}: {message}")]
    KernelLifecycleError {
        phase: KernelLifecyclePhase,
        component_name: Option<String>,
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Represents a specific phase in the kernel's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum KernelLifecyclePhase {
    #[error("RunPreCheck")]
    RunPreCheck,
    #[error("Bootstrap")]
    Bootstrap,
    #[error("Navigation")]
    Navigation,
    #[error("Interaction")]
    Interaction,
    #[error("Shutdown")]
    Shutdown,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    /// Walks nested stage and lifecycle wrappers down to the error a stage
    /// originally returned.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::StageSystem(StageSystemError::StageExecutionFailed { source, .. }) => {
                source.root_cause()
            }
            Error::KernelLifecycleError { source: Some(inner), .. } => inner.root_cause(),
            other => other,
        }
    }

    /// Whether this error is a configuration error, i.e. a required service
    /// did not resolve during bootstrap.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self.root_cause(),
            Error::Service(ServiceError::MissingRequiredServices { .. })
        )
    }
}
