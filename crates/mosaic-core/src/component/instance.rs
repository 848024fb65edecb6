use std::fmt;
use std::sync::Arc;

use crate::component::{
    Component, ComponentError, ComponentState, InitOutcome, LifecyclePhase, StatePatch, View,
};
use crate::service::{DependencyBundle, Service};
use crate::ui_bridge::{Markup, UiEvent, UiSurface};

/// A constructed component together with the state the framework tracks
/// for it: lifecycle phase, state record, injected services and last markup.
pub struct ComponentInstance {
    name: String,
    component: Box<dyn Component>,
    bundle: Arc<DependencyBundle>,
    state: ComponentState,
    phase: LifecyclePhase,
    markup: Option<Markup>,
    render_count: usize,
}

impl fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("name", &self.name)
            .field("mount_point", &self.component.mount_point())
            .field("phase", &self.phase)
            .field("state_keys", &self.state.len())
            .field("render_count", &self.render_count)
            .finish()
    }
}

impl ComponentInstance {
    pub fn new(name: impl Into<String>, component: Box<dyn Component>, bundle: Arc<DependencyBundle>) -> Self {
        Self {
            name: name.into(),
            component,
            bundle,
            state: ComponentState::new(),
            phase: LifecyclePhase::Uninitialized,
            markup: None,
            render_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mount_point(&self) -> &str {
        self.component.mount_point()
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn state(&self) -> &ComponentState {
        &self.state
    }

    /// Markup produced by the most recent render
    pub fn markup(&self) -> Option<&Markup> {
        self.markup.as_ref()
    }

    pub fn render_count(&self) -> usize {
        self.render_count
    }

    pub fn bundle(&self) -> &Arc<DependencyBundle> {
        &self.bundle
    }

    /// Look up a service in this component's own bundle.
    pub fn service(&self, name: &str) -> Option<Arc<dyn Service>> {
        self.bundle.get(name)
    }

    pub fn service_as<T: Service>(&self, name: &str) -> Option<Arc<T>> {
        self.bundle.get_concrete::<T>(name)
    }

    fn transition(&mut self, next: LifecyclePhase) -> Result<(), ComponentError> {
        if !self.phase.can_transition_to(next) {
            return Err(ComponentError::InvalidTransition {
                component: self.name.clone(),
                from: self.phase,
                to: next,
            });
        }
        log::trace!("Component '{}': {:?} -> {:?}", self.name, self.phase, next);
        self.phase = next;
        Ok(())
    }

    fn fail(&mut self, reason: String) -> InitOutcome {
        self.phase = LifecyclePhase::Failed;
        log::warn!("Component '{}' failed to initialize: {}", self.name, reason);
        InitOutcome::Failed(reason)
    }

    /// Run the full initialization sequence.
    ///
    /// A missing mount point is an outcome, not an error: non-deferrable
    /// components end up `Failed`, deferrable ones run `on_init` and end up
    /// `InitializedDataOnly`. `Err` is only returned when the instance was
    /// already initialized.
    pub async fn initialize(&mut self, surface: &mut dyn UiSurface) -> Result<InitOutcome, ComponentError> {
        if self.phase != LifecyclePhase::Uninitialized {
            return Err(ComponentError::InvalidTransition {
                component: self.name.clone(),
                from: self.phase,
                to: LifecyclePhase::Initializing,
            });
        }

        let mount_point = self.mount_point().to_string();
        let attachable = surface.resolve(&mount_point);
        if !attachable && !self.component.is_deferrable() {
            return Ok(self.fail(format!("mount point '{}' not found", mount_point)));
        }

        self.transition(LifecyclePhase::Initializing)?;
        if let Err(e) = self.run_on_init().await {
            return Ok(self.fail(e.to_string()));
        }

        if !attachable {
            self.transition(LifecyclePhase::InitializedDataOnly)?;
            log::info!(
                "Component '{}' initialized data only; mount point '{}' not present yet",
                self.name,
                mount_point
            );
            return Ok(InitOutcome::DataOnly);
        }

        match self.attach_view(surface) {
            Ok(()) => Ok(InitOutcome::Active),
            Err(e) => Ok(self.fail(e.to_string())),
        }
    }

    /// Complete a deferred initialization once the mount point exists.
    pub fn attach(&mut self, surface: &mut dyn UiSurface) -> Result<(), ComponentError> {
        if self.phase != LifecyclePhase::InitializedDataOnly {
            return Err(ComponentError::InvalidTransition {
                component: self.name.clone(),
                from: self.phase,
                to: LifecyclePhase::Rendering,
            });
        }
        if !surface.resolve(self.mount_point()) {
            return Err(ComponentError::MountPointNotFound {
                component: self.name.clone(),
                mount_point: self.mount_point().to_string(),
            });
        }
        if let Err(e) = self.attach_view(surface) {
            self.fail(e.to_string());
            return Err(e);
        }
        log::info!("Deferred component '{}' attached", self.name);
        Ok(())
    }

    async fn run_on_init(&mut self) -> Result<(), ComponentError> {
        let bundle = Arc::clone(&self.bundle);
        let patch = self
            .component
            .on_init(&bundle)
            .await
            .map_err(|e| ComponentError::HookFailed {
                component: self.name.clone(),
                hook: "on_init",
                source: Box::new(e),
            })?;
        // Initial data seeds the state; on_changes only fires for later updates.
        let changes = self.state.diff(&patch);
        self.state.apply(&changes);
        Ok(())
    }

    /// Rendering -> Ready -> Active, running on_after_view_init in between.
    fn attach_view(&mut self, surface: &mut dyn UiSurface) -> Result<(), ComponentError> {
        self.transition(LifecyclePhase::Rendering)?;
        self.render_into(surface)?;
        self.transition(LifecyclePhase::Ready)?;

        let mount_point = self.mount_point().to_string();
        let mut view = View::new(surface, &mount_point);
        self.component
            .on_after_view_init(&mut view)
            .map_err(|e| ComponentError::HookFailed {
                component: self.name.clone(),
                hook: "on_after_view_init",
                source: Box::new(e),
            })?;
        self.transition(LifecyclePhase::Active)
    }

    fn render_into(&mut self, surface: &mut dyn UiSurface) -> Result<(), ComponentError> {
        let markup = self.component.render(&self.state);
        surface
            .replace_markup(self.component.mount_point(), &markup)
            .map_err(|source| ComponentError::RenderFailed {
                component: self.name.clone(),
                source,
            })?;
        self.markup = Some(markup);
        self.render_count += 1;
        Ok(())
    }

    /// Merge `patch` into the state.
    ///
    /// Keys whose value is unchanged are ignored. If nothing changed this is a
    /// no-op and returns `Ok(false)`. Otherwise every changed key is applied,
    /// `on_changes` runs once with old and new values, then the component
    /// re-renders. A deferred component takes the update but renders only when
    /// attached. If the re-render fails the component moves to `Failed` and
    /// stays there; the applied state is kept.
    pub fn set_state(&mut self, patch: StatePatch, surface: &mut dyn UiSurface) -> Result<bool, ComponentError> {
        if !matches!(self.phase, LifecyclePhase::Active | LifecyclePhase::InitializedDataOnly) {
            return Err(ComponentError::StateLocked {
                component: self.name.clone(),
                phase: self.phase,
            });
        }

        let changes = self.state.diff(&patch);
        if changes.is_empty() {
            log::trace!("Component '{}': state update without changes", self.name);
            return Ok(false);
        }

        self.state.apply(&changes);
        self.component.on_changes(&changes);

        if self.phase == LifecyclePhase::InitializedDataOnly {
            return Ok(true);
        }

        self.transition(LifecyclePhase::Rendering)?;
        if let Err(e) = self.render_into(surface) {
            // State and on_changes already saw the update; the view can no longer follow it.
            self.transition(LifecyclePhase::Failed)?;
            log::error!("Component '{}' failed to re-render: {}", self.name, e);
            return Err(e);
        }
        self.transition(LifecyclePhase::Active)?;
        Ok(true)
    }

    /// Let the component react to a surface event. Returns whether state changed.
    pub fn handle_event(&mut self, event: &UiEvent, surface: &mut dyn UiSurface) -> Result<bool, ComponentError> {
        if self.phase != LifecyclePhase::Active {
            return Err(ComponentError::StateLocked {
                component: self.name.clone(),
                phase: self.phase,
            });
        }
        match self.component.handle_event(event, &self.state) {
            Some(patch) => self.set_state(patch, surface),
            None => Ok(false),
        }
    }

    /// Destroy the component, running `on_destroy` first.
    pub fn teardown(&mut self, surface: &mut dyn UiSurface) -> Result<(), ComponentError> {
        if !self.phase.can_transition_to(LifecyclePhase::Destroyed) {
            return Err(ComponentError::InvalidTransition {
                component: self.name.clone(),
                from: self.phase,
                to: LifecyclePhase::Destroyed,
            });
        }
        let mount_point = self.mount_point().to_string();
        let mut view = View::new(surface, &mount_point);
        self.component.on_destroy(&mut view);
        self.transition(LifecyclePhase::Destroyed)?;
        log::debug!("Component '{}' destroyed", self.name);
        Ok(())
    }
}
