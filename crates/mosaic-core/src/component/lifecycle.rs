/// Lifecycle phase of a component instance.
///
/// ```text
/// Uninitialized -> Initializing -> Rendering -> Ready -> Active
/// Active -> Rendering -> Active            (state update)
/// Initializing -> InitializedDataOnly      (mount point not there yet)
/// InitializedDataOnly -> Rendering         (mount point appeared)
/// Active | InitializedDataOnly -> Destroyed
/// ```
/// `Failed` and `Destroyed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    Uninitialized,
    Initializing,
    Rendering,
    Ready,
    Active,
    /// Data warmed by `on_init`, render deferred until the mount point exists
    InitializedDataOnly,
    Failed,
    Destroyed,
}

impl LifecyclePhase {
    pub fn can_transition_to(self, next: LifecyclePhase) -> bool {
        use LifecyclePhase::*;
        matches!(
            (self, next),
            (Uninitialized, Initializing)
                | (Uninitialized, Failed)
                | (Initializing, Rendering)
                | (Initializing, InitializedDataOnly)
                | (Initializing, Failed)
                | (Rendering, Ready)
                | (Rendering, Active)
                | (Rendering, Failed)
                | (Ready, Active)
                | (Ready, Failed)
                | (Active, Rendering)
                | (Active, Destroyed)
                | (InitializedDataOnly, Rendering)
                | (InitializedDataOnly, Destroyed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, LifecyclePhase::Failed | LifecyclePhase::Destroyed)
    }

    /// Whether the component's markup is attached to the surface
    pub fn is_attached(self) -> bool {
        matches!(
            self,
            LifecyclePhase::Rendering | LifecyclePhase::Ready | LifecyclePhase::Active
        )
    }
}

/// Result of running a component's initialization sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// Rendered, view hooks ran, ready for updates
    Active,
    /// `on_init` ran but the mount point does not exist yet
    DataOnly,
    /// Initialization failed; the component is excluded from the active set
    Failed(String),
}
