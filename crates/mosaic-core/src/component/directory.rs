use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::component::{Component, ComponentInstance, InitOutcome};
use crate::service::DependencyBundle;
use crate::ui_bridge::UiSurface;

/// Builds a component from the shared dependency bundle
pub type ComponentConstructor = Box<dyn Fn(Arc<DependencyBundle>) -> Box<dyn Component> + Send + Sync>;

/// Outcome of [`ComponentDirectory::initialize_all`]
#[derive(Debug, Default)]
pub struct InitReport {
    /// Components that reached `Active`, in registration order
    pub initialized: Vec<ComponentInstance>,
    /// Components whose data was warmed but whose mount point is not there yet
    pub deferred: Vec<ComponentInstance>,
    /// Names of components that failed to initialize
    pub failed: Vec<String>,
}

impl InitReport {
    pub fn initialized_names(&self) -> Vec<String> {
        self.initialized.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn deferred_names(&self) -> Vec<String> {
        self.deferred.iter().map(|c| c.name().to_string()).collect()
    }
}

/// Name-keyed store of component constructors.
///
/// Registration order is kept and drives initialization order. Registering
/// a name twice replaces the constructor but keeps the original position.
#[derive(Default)]
pub struct ComponentDirectory {
    order: Vec<String>,
    constructors: HashMap<String, ComponentConstructor>,
}

impl fmt::Debug for ComponentDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDirectory")
            .field("components", &self.order)
            .finish()
    }
}

impl ComponentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under `name`
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(Arc<DependencyBundle>) -> Box<dyn Component> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.constructors.insert(name.clone(), Box::new(constructor)).is_some() {
            log::debug!("Component '{}' re-registered; constructor replaced", name);
        } else {
            self.order.push(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names in registration order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Construct the component registered under `name`. `None` if unknown.
    pub fn create(&self, name: &str, bundle: &Arc<DependencyBundle>) -> Option<ComponentInstance> {
        let constructor = self.constructors.get(name)?;
        let component = constructor(Arc::clone(bundle));
        Some(ComponentInstance::new(name, component, Arc::clone(bundle)))
    }

    /// Create and initialize every registered component, in registration order.
    ///
    /// A failing component is recorded in the report and never stops the
    /// remaining ones from initializing.
    pub async fn initialize_all(&self, bundle: &Arc<DependencyBundle>, surface: &mut dyn UiSurface) -> InitReport {
        let mut report = InitReport::default();

        for name in &self.order {
            let Some(mut instance) = self.create(name, bundle) else {
                continue;
            };
            log::info!("Initializing component: {}", name);
            match instance.initialize(surface).await {
                Ok(InitOutcome::Active) => report.initialized.push(instance),
                Ok(InitOutcome::DataOnly) => report.deferred.push(instance),
                Ok(InitOutcome::Failed(reason)) => {
                    log::warn!("Component '{}' excluded: {}", name, reason);
                    report.failed.push(name.clone());
                }
                Err(e) => {
                    log::error!("Component '{}' could not be initialized: {}", name, e);
                    report.failed.push(name.clone());
                }
            }
        }

        log::info!(
            "Component initialization complete: {} active, {} deferred, {} failed",
            report.initialized.len(),
            report.deferred.len(),
            report.failed.len()
        );
        report
    }
}
