//! # Mosaic Core Components
//!
//! A component owns one mount point on the UI surface, keeps a state record
//! and re-renders its whole markup whenever an update changes that state.
//!
//! Concrete screens implement [`Component`]; the framework wraps each one in
//! a [`ComponentInstance`] that drives the lifecycle hooks in order and is the
//! only path through which state changes. The [`ComponentDirectory`] holds
//! named constructors and initializes all of them in one pass.
pub mod directory;
pub mod error;
pub mod instance;
pub mod lifecycle;
pub mod state;

use std::fmt::Debug;

use async_trait::async_trait;

use crate::kernel::error::Result;
use crate::service::DependencyBundle;
use crate::ui_bridge::{ListenerId, Markup, UiBridgeError, UiEvent, UiSurface};

pub use directory::{ComponentConstructor, ComponentDirectory, InitReport};
pub use error::ComponentError;
pub use instance::ComponentInstance;
pub use lifecycle::{InitOutcome, LifecyclePhase};
pub use state::{Changes, ComponentState, StateChange, StatePatch};

/// Core trait that every UI component implements.
///
/// Only `mount_point` and `render` are required. Hooks default to no-ops.
#[async_trait]
pub trait Component: Send + Sync + Debug {
    /// Id of the surface element this component renders into
    fn mount_point(&self) -> &str;

    /// Whether the mount point may legitimately be missing at startup
    /// because it only appears after navigating to the component's screen.
    fn is_deferrable(&self) -> bool {
        false
    }

    /// Runs once before the first render. The returned patch becomes the
    /// initial state.
    async fn on_init(&mut self, _services: &DependencyBundle) -> Result<StatePatch> {
        Ok(StatePatch::new())
    }

    /// Produce markup for `state`. Must be pure: same state, same markup.
    fn render(&self, state: &ComponentState) -> Markup;

    /// Runs once, right after the first render attached markup.
    fn on_after_view_init(&mut self, _view: &mut View<'_>) -> Result<()> {
        Ok(())
    }

    /// Runs after a state update changed at least one key, before re-render.
    fn on_changes(&mut self, _changes: &Changes) {}

    /// Turn a surface event into a state update
    fn handle_event(&mut self, _event: &UiEvent, _state: &ComponentState) -> Option<StatePatch> {
        None
    }

    /// Runs once on teardown. Release every listener acquired in the view hooks.
    fn on_destroy(&mut self, _view: &mut View<'_>) {}
}

/// Surface access scoped to one component's mount point, handed to view hooks.
pub struct View<'a> {
    surface: &'a mut dyn UiSurface,
    mount_point: &'a str,
}

impl<'a> View<'a> {
    pub fn new(surface: &'a mut dyn UiSurface, mount_point: &'a str) -> Self {
        Self { surface, mount_point }
    }

    pub fn mount_point(&self) -> &str {
        self.mount_point
    }

    /// Check whether an element exists
    pub fn resolve(&self, id: &str) -> bool {
        self.surface.resolve(id)
    }

    /// Listen for `event` on the mount point
    pub fn listen(&mut self, event: &str) -> std::result::Result<ListenerId, UiBridgeError> {
        self.surface.add_listener(self.mount_point, event)
    }

    /// Listen for `event` on another element rendered by this component
    pub fn listen_on(&mut self, id: &str, event: &str) -> std::result::Result<ListenerId, UiBridgeError> {
        self.surface.add_listener(id, event)
    }

    pub fn unlisten(&mut self, listener: ListenerId) -> bool {
        self.surface.remove_listener(listener)
    }
}

// Test module declaration
#[cfg(test)]
mod tests;
