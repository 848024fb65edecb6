use std::any::Any;

use crate::event::Event;

/// Events raised by the bootstrap sequence and the application shell
#[derive(Debug, Clone, PartialEq)]
pub enum SystemEvent {
    /// Bootstrap was requested
    BootstrapStart,
    /// A bootstrap stage is about to run
    StageBegin { stage_id: String },
    /// A bootstrap stage finished
    StageComplete { stage_id: String, success: bool },
    /// Bootstrap reached READY; carries the active component names
    BootstrapComplete { components: Vec<String> },
    /// A critical stage failed
    BootstrapFailed { reason: String },
    /// A deferred component found its mount point and attached
    ComponentAttached { component: String },
    /// The theme preference changed
    ThemeChanged { theme: String },
    /// Components were torn down
    Shutdown,
}

impl Event for SystemEvent {
    fn name(&self) -> &'static str {
        match self {
            SystemEvent::BootstrapStart => "bootstrap.start",
            SystemEvent::StageBegin { .. } => "stage.begin",
            SystemEvent::StageComplete { .. } => "stage.complete",
            SystemEvent::BootstrapComplete { .. } => "bootstrap.complete",
            SystemEvent::BootstrapFailed { .. } => "bootstrap.failed",
            SystemEvent::ComponentAttached { .. } => "component.attached",
            SystemEvent::ThemeChanged { .. } => "theme.changed",
            SystemEvent::Shutdown => "application.shutdown",
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Diagnostics a stage reports without failing
#[derive(Debug, Clone, PartialEq)]
pub enum StageEvent {
    /// Progress note, e.g. how many loaders settled
    Progress { stage_id: String, message: String },
    /// A best-effort step failed and was skipped
    Warning { stage_id: String, message: String },
}

impl Event for StageEvent {
    fn name(&self) -> &'static str {
        match self {
            StageEvent::Progress { .. } => "stage.progress",
            StageEvent::Warning { .. } => "stage.warning",
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
