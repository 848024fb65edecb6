//! # Mosaic Core Kernel
//!
//! The `kernel` module owns the application context and drives startup.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Application Bootstrapping**: [`Application`](bootstrap::Application) runs the
//!   fixed bootstrap pipeline across the service registry and the component
//!   directory, and afterwards exposes the access surface (service lookup,
//!   component list, readiness).
//! - **Core Constants**: default element ids, store keys and messages live in
//!   the `constants` submodule.
//! - **Error Handling**: the framework-wide [`Error`](error::Error) and its
//!   `Result` alias live in the `error` submodule.
pub mod bootstrap;
pub mod constants;
pub mod error;

pub use bootstrap::{Application, BootstrapPhase};
pub use error::{Error, Result};
