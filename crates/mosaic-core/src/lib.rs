//! # Mosaic Core
//!
//! A small client application framework: a service registry, stateful UI
//! components with lifecycle hooks and change detection, and a bootstrap
//! pipeline that wires both together at startup.
pub mod component;
pub mod event;
pub mod kernel;
pub mod loader;
pub mod service;
pub mod stage_manager;
pub mod storage;
pub mod ui_bridge;

pub use component::{Component, ComponentDirectory, ComponentInstance, LifecyclePhase, StatePatch, View};
pub use event::{Event, EventDispatcher, EventResult, SystemEvent};
pub use kernel::error::Error as KernelError;
pub use kernel::{Application, BootstrapPhase};
pub use loader::AsyncLoader;
pub use service::{DependencyBundle, Service, ServiceKey, ServiceRegistry};
pub use storage::{AppConfig, KeyValueStore};
pub use ui_bridge::{Markup, MemorySurface, Notifier, UiEvent, UiSurface};

#[cfg(test)]
mod tests;
