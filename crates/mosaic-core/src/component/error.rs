//! # Mosaic Core Component Errors
//!
//! Errors raised while driving a component through its lifecycle. A missing
//! mount point during initialization is not an error (it is reported as an
//! [`InitOutcome`](crate::component::InitOutcome)); these variants cover
//! misuse of the lifecycle and failures of the hooks themselves.
use thiserror::Error;

use crate::component::LifecyclePhase;
use crate::kernel::error::Error as KernelError;
use crate::ui_bridge::UiBridgeError;

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("Component '{component}' is not registered")]
    NotFound { component: String },

    #[error("Mount point '{mount_point}' for component '{component}' is not on the UI surface")]
    MountPointNotFound { component: String, mount_point: String },

    #[error("Component '{component}' cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        component: String,
        from: LifecyclePhase,
        to: LifecyclePhase,
    },

    #[error("State of component '{component}' cannot be updated while {phase:?}")]
    StateLocked { component: String, phase: LifecyclePhase },

    #[error("Component '{component}' failed to render: {source}")]
    RenderFailed {
        component: String,
        #[source]
        source: UiBridgeError,
    },

    #[error("Hook '{hook}' of component '{component}' failed: {source}")]
    HookFailed {
        component: String,
        hook: &'static str,
        #[source]
        source: Box<KernelError>,
    },
}
