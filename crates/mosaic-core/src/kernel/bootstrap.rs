use std::fmt;
use std::sync::Arc;

use crate::component::{
    Component, ComponentDirectory, ComponentInstance, LifecyclePhase, StatePatch,
};
use crate::event::{EventDispatcher, SystemEvent};
use crate::kernel::constants::{self, CLICK_EVENT};
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::loader::AsyncLoader;
use crate::service::{
    DependencyBundle, Service, ServiceFactory, ServiceKey, ServiceRegistry, ThemeService,
};
use crate::stage_manager::{StageContext, StagePipeline};
use crate::storage::AppConfig;
use crate::ui_bridge::{ListenerId, LogNotifier, Markup, Notifier, UiEvent, UiSurface};

/// Where the application is in its one-shot startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BootstrapPhase {
    #[default]
    NotStarted,
    Bootstrapping,
    Ready,
    Failed,
}

impl fmt::Display for BootstrapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BootstrapPhase::NotStarted => "not started",
            BootstrapPhase::Bootstrapping => "bootstrapping",
            BootstrapPhase::Ready => "ready",
            BootstrapPhase::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// The application context: owns the service registry, the component
/// directory and the UI surface, and runs the bootstrap pipeline over them.
///
/// The process entry point constructs exactly one and passes it by
/// reference. Service lookup works as soon as bootstrap has started, not
/// only once it is ready.
pub struct Application<S: UiSurface> {
    config: AppConfig,
    phase: BootstrapPhase,
    registry: ServiceRegistry,
    installers: Vec<(ServiceKey, ServiceFactory)>,
    directory: ComponentDirectory,
    loaders: Vec<Box<dyn AsyncLoader>>,
    surface: S,
    notifier: Arc<dyn Notifier>,
    events: EventDispatcher,
    bundle: Option<Arc<DependencyBundle>>,
    active: Vec<ComponentInstance>,
    deferred: Vec<ComponentInstance>,
    failed: Vec<String>,
    theme_listener: Option<ListenerId>,
}

impl<S: UiSurface> fmt::Debug for Application<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("phase", &self.phase)
            .field("services", &self.registry.names())
            .field("components", &self.directory.names())
            .field("active", &self.component_names())
            .field("deferred", &self.deferred_names())
            .field("failed", &self.failed)
            .finish()
    }
}

impl<S: UiSurface> Application<S> {
    /// Creates an application over `surface`, notifying through the log.
    pub fn new(config: AppConfig, surface: S) -> Self {
        log::info!("Initializing {} v{}", constants::APP_NAME, constants::APP_VERSION);
        Self {
            config,
            phase: BootstrapPhase::NotStarted,
            registry: ServiceRegistry::new(),
            installers: Vec::new(),
            directory: ComponentDirectory::new(),
            loaders: Vec::new(),
            surface,
            notifier: Arc::new(LogNotifier),
            events: EventDispatcher::new(),
            bundle: None,
            active: Vec::new(),
            deferred: Vec::new(),
            failed: Vec::new(),
            theme_listener: None,
        }
    }

    /// Replace the notification collaborator
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    // ----- registration, before bootstrap -----

    /// Add a service installer. Installers run during the first bootstrap
    /// stage, in the order they were added.
    pub fn add_service<T, F>(&mut self, key: impl Into<ServiceKey>, factory: F)
    where
        T: Service,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let factory: ServiceFactory = Box::new(move || Arc::new(factory()) as Arc<dyn Service>);
        self.installers.push((key.into(), factory));
    }

    /// Register a component constructor under `name`
    pub fn add_component<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(Arc<DependencyBundle>) -> Box<dyn Component> + Send + Sync + 'static,
    {
        self.directory.register(name, constructor);
    }

    /// Add a loader for the external loading stage
    pub fn add_loader(&mut self, loader: impl AsyncLoader + 'static) {
        self.loaders.push(Box::new(loader));
    }

    /// The event dispatcher, e.g. to subscribe to `bootstrap.complete`
    pub fn events_mut(&mut self) -> &mut EventDispatcher {
        &mut self.events
    }

    // ----- bootstrap -----

    /// Run the bootstrap pipeline once.
    ///
    /// A failure in the service, theme or component stage aborts the run,
    /// leaves the application `Failed`, notifies the user and replaces the
    /// loading indicator with the fallback message. Calling this a second
    /// time is an error.
    pub async fn bootstrap(&mut self) -> Result<()> {
        if self.phase != BootstrapPhase::NotStarted {
            return Err(Error::KernelLifecycleError {
                phase: KernelLifecyclePhase::RunPreCheck,
                component_name: None,
                message: format!("Application already bootstrapped (phase: {})", self.phase),
                source: None,
            });
        }

        self.phase = BootstrapPhase::Bootstrapping;
        self.events.dispatch(&SystemEvent::BootstrapStart);

        let pipeline = StagePipeline::bootstrap();
        let mut context = StageContext::new(
            &self.config,
            &mut self.registry,
            &self.installers,
            &self.directory,
            &self.loaders,
            &mut self.surface,
            &mut self.events,
            &*self.notifier,
            &mut self.phase,
        );
        let result = pipeline.execute(&mut context).await;
        let outputs = context.into_outputs();

        self.bundle = outputs.bundle;
        self.theme_listener = outputs.theme_listener;
        if let Some(report) = outputs.report {
            self.active = report.initialized;
            self.deferred = report.deferred;
            self.failed = report.failed;
        }

        match result {
            Ok(results) => {
                for (stage_id, outcome) in results.iter().filter(|(_, r)| !r.is_success()) {
                    log::warn!("Bootstrap stage '{}': {}", stage_id, outcome);
                }
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, error: Error) -> Error {
        self.phase = BootstrapPhase::Failed;
        let reason = error.root_cause().to_string();
        log::error!("Bootstrap failed: {}", error);

        self.notifier
            .error(&format!("{} failed to start: {}", constants::APP_NAME, reason));
        let fallback = Markup::new(self.config.fallback_message.clone());
        if let Err(e) = self.surface.replace_markup(&self.config.loading_element, &fallback) {
            log::warn!("Fallback message could not be shown: {}", e);
        }
        self.events.dispatch(&SystemEvent::BootstrapFailed {
            reason: reason.clone(),
        });

        Error::KernelLifecycleError {
            phase: KernelLifecyclePhase::Bootstrap,
            component_name: None,
            message: reason,
            source: Some(Box::new(error)),
        }
    }

    // ----- access surface -----

    pub fn phase(&self) -> BootstrapPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == BootstrapPhase::Ready
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Look up a registered service by name
    pub fn service(&self, name: &str) -> Option<Arc<dyn Service>> {
        self.registry.get(name)
    }

    /// Look up a registered service by name and concrete type
    pub fn service_as<T: Service>(&self, name: &str) -> Option<Arc<T>> {
        self.registry.get_concrete::<T>(name)
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// The bundle shared with every component, once components were initialized
    pub fn bundle(&self) -> Option<&Arc<DependencyBundle>> {
        self.bundle.as_ref()
    }

    /// Active components, in registration order
    pub fn component_names(&self) -> Vec<String> {
        self.active.iter().map(|c| c.name().to_string()).collect()
    }

    /// Components waiting for their screen
    pub fn deferred_names(&self) -> Vec<String> {
        self.deferred.iter().map(|c| c.name().to_string()).collect()
    }

    /// Components whose initialization failed
    pub fn failed_components(&self) -> &[String] {
        &self.failed
    }

    /// An active or deferred component by name
    pub fn component(&self, name: &str) -> Option<&ComponentInstance> {
        self.active
            .iter()
            .chain(self.deferred.iter())
            .find(|c| c.name() == name)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    // ----- navigation and interaction -----

    /// Attach a deferred component once its screen is on the surface.
    ///
    /// On failure the component stays deferred and can be shown again later.
    pub fn show_screen(&mut self, name: &str) -> Result<()> {
        let index = self
            .deferred
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| Error::KernelLifecycleError {
                phase: KernelLifecyclePhase::Navigation,
                component_name: Some(name.to_string()),
                message: "no deferred component with this name".to_string(),
                source: None,
            })?;

        let instance = &mut self.deferred[index];
        if let Err(e) = instance.attach(&mut self.surface) {
            let message = e.to_string();
            if instance.phase() == LifecyclePhase::Failed {
                self.failed.push(self.deferred.remove(index).name().to_string());
            }
            return Err(Error::KernelLifecycleError {
                phase: KernelLifecyclePhase::Navigation,
                component_name: Some(name.to_string()),
                message,
                source: Some(Box::new(e.into())),
            });
        }

        let instance = self.deferred.remove(index);
        self.active.push(instance);
        self.events.dispatch(&SystemEvent::ComponentAttached {
            component: name.to_string(),
        });
        Ok(())
    }

    /// Update a component's state. Returns whether anything changed.
    pub fn set_component_state(&mut self, name: &str, patch: StatePatch) -> Result<bool> {
        let instance = self
            .active
            .iter_mut()
            .chain(self.deferred.iter_mut())
            .find(|c| c.name() == name)
            .ok_or_else(|| Error::KernelLifecycleError {
                phase: KernelLifecyclePhase::Interaction,
                component_name: Some(name.to_string()),
                message: "component is not active".to_string(),
                source: None,
            })?;
        let outcome = instance.set_state(patch, &mut self.surface);
        self.retire_failed();
        Ok(outcome?)
    }

    /// Route a surface event to whoever listens on its target.
    ///
    /// A click on the wired theme toggle flips the theme. Any other event goes
    /// to the active component owning the target mount point. Returns whether
    /// the event changed anything.
    pub fn dispatch_ui_event(&mut self, event: &UiEvent) -> Result<bool> {
        if self.theme_listener.is_some()
            && event.kind == CLICK_EVENT
            && event.target == self.config.theme_toggle_element
        {
            let theme = self
                .registry
                .get_concrete::<ThemeService>(ServiceKey::THEME.as_str())
                .ok_or_else(|| Error::KernelLifecycleError {
                    phase: KernelLifecyclePhase::Interaction,
                    component_name: None,
                    message: "theme toggle wired without a theme service".to_string(),
                    source: None,
                })?;
            let next = theme.toggle()?;
            self.events.dispatch(&SystemEvent::ThemeChanged {
                theme: next.to_string(),
            });
            return Ok(true);
        }

        let Some(instance) = self
            .active
            .iter_mut()
            .find(|c| c.mount_point() == event.target)
        else {
            log::debug!("No active component owns '{}'; {} event dropped", event.target, event.kind);
            return Ok(false);
        };
        let outcome = instance.handle_event(event, &mut self.surface);
        self.retire_failed();
        Ok(outcome?)
    }

    /// Destroy one active component
    pub fn teardown(&mut self, name: &str) -> Result<()> {
        let index = self
            .active
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| Error::KernelLifecycleError {
                phase: KernelLifecyclePhase::Shutdown,
                component_name: Some(name.to_string()),
                message: "component is not active".to_string(),
                source: None,
            })?;
        let mut instance = self.active.remove(index);
        instance.teardown(&mut self.surface)?;
        Ok(())
    }

    /// Destroy every active and deferred component and release the theme toggle.
    /// Move active components that failed while re-rendering to the failed list
    fn retire_failed(&mut self) {
        let (failed, active): (Vec<_>, Vec<_>) = self
            .active
            .drain(..)
            .partition(|c| c.phase() == LifecyclePhase::Failed);
        self.active = active;
        for instance in failed {
            log::warn!("Component '{}' is out of service", instance.name());
            self.failed.push(instance.name().to_string());
        }
    }

    pub fn shutdown(&mut self) -> Result<()> {
        log::info!("Shutting down components...");
        let mut first_error = None;

        let instances: Vec<ComponentInstance> =
            self.active.drain(..).rev().chain(self.deferred.drain(..)).collect();
        for mut instance in instances {
            if let Err(e) = instance.teardown(&mut self.surface) {
                log::error!("Error tearing down component {}: {}", instance.name(), e);
                first_error.get_or_insert(Error::KernelLifecycleError {
                    phase: KernelLifecyclePhase::Shutdown,
                    component_name: Some(instance.name().to_string()),
                    message: "Component failed to tear down".to_string(),
                    source: Some(Box::new(e.into())),
                });
            }
        }

        if let Some(listener) = self.theme_listener.take() {
            self.surface.remove_listener(listener);
        }
        self.events.dispatch(&SystemEvent::Shutdown);
        log::info!("Component shutdown complete.");

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
