use std::sync::Arc;

use crate::component::{ComponentDirectory, InitReport};
use crate::event::{Event, EventDispatcher, EventResult};
use crate::kernel::bootstrap::BootstrapPhase;
use crate::loader::AsyncLoader;
use crate::service::{DependencyBundle, ServiceFactory, ServiceKey, ServiceRegistry};
use crate::storage::AppConfig;
use crate::ui_bridge::{ListenerId, Notifier, UiSurface};

/// Everything a bootstrap stage may touch.
///
/// The context borrows the application's parts for the duration of one
/// pipeline run. Stages hand results to later stages (and back to the
/// application) through the output slots.
pub struct StageContext<'a> {
    pub config: &'a AppConfig,
    pub registry: &'a mut ServiceRegistry,
    pub installers: &'a [(ServiceKey, ServiceFactory)],
    pub directory: &'a ComponentDirectory,
    pub loaders: &'a [Box<dyn AsyncLoader>],
    pub surface: &'a mut dyn UiSurface,
    pub events: &'a mut EventDispatcher,
    pub notifier: &'a dyn Notifier,
    pub phase: &'a mut BootstrapPhase,
    outputs: StageOutputs,
}

/// Values produced by stages and kept by the application afterwards
#[derive(Debug, Default)]
pub struct StageOutputs {
    pub bundle: Option<Arc<DependencyBundle>>,
    pub report: Option<InitReport>,
    pub theme_listener: Option<ListenerId>,
}

impl<'a> StageContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &'a AppConfig,
        registry: &'a mut ServiceRegistry,
        installers: &'a [(ServiceKey, ServiceFactory)],
        directory: &'a ComponentDirectory,
        loaders: &'a [Box<dyn AsyncLoader>],
        surface: &'a mut dyn UiSurface,
        events: &'a mut EventDispatcher,
        notifier: &'a dyn Notifier,
        phase: &'a mut BootstrapPhase,
    ) -> Self {
        Self {
            config,
            registry,
            installers,
            directory,
            loaders,
            surface,
            events,
            notifier,
            phase,
            outputs: StageOutputs::default(),
        }
    }

    /// Publish an event to the application's dispatcher
    pub fn dispatch(&self, event: &dyn Event) -> EventResult {
        self.events.dispatch(event)
    }

    pub fn outputs(&self) -> &StageOutputs {
        &self.outputs
    }

    pub fn outputs_mut(&mut self) -> &mut StageOutputs {
        &mut self.outputs
    }

    /// End the run and release the borrowed parts, keeping the outputs
    pub fn into_outputs(self) -> StageOutputs {
        self.outputs
    }
}
