//! # Mosaic Core Events
//!
//! Framework-level notifications: bootstrap progress, stage results and
//! component attachment. Surface events (clicks and the like) are
//! [`UiEvent`](crate::ui_bridge::UiEvent)s and never travel through here.
pub mod dispatcher;
pub mod types;

use std::any::Any;
use std::fmt;

/// Result of event processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was processed and propagation should continue
    Continue,
    /// Event was processed and propagation should stop
    Stop,
}

/// Core event trait
pub trait Event: Any + fmt::Debug + Send + Sync {
    /// Get the name of this event
    fn name(&self) -> &'static str;

    /// Cast to Any for downcasting
    fn as_any(&self) -> &dyn Any;
}

/// Boxed synchronous handler for events with a given name
pub type EventHandler = Box<dyn Fn(&dyn Event) -> EventResult + Send + Sync>;

pub use dispatcher::EventDispatcher;
pub use types::{StageEvent, SystemEvent};
