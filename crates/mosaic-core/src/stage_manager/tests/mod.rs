mod pipeline_tests;

use crate::component::ComponentDirectory;
use crate::event::EventDispatcher;
use crate::kernel::bootstrap::BootstrapPhase;
use crate::loader::AsyncLoader;
use crate::service::{ServiceFactory, ServiceKey, ServiceRegistry};
use crate::stage_manager::StageContext;
use crate::storage::AppConfig;
use crate::ui_bridge::{MemoryNotifier, MemorySurface};

/// Owns everything a [`StageContext`] borrows
#[derive(Default)]
pub(crate) struct Harness {
    pub config: AppConfig,
    pub registry: ServiceRegistry,
    pub installers: Vec<(ServiceKey, ServiceFactory)>,
    pub directory: ComponentDirectory,
    pub loaders: Vec<Box<dyn AsyncLoader>>,
    pub surface: MemorySurface,
    pub events: EventDispatcher,
    pub notifier: MemoryNotifier,
    pub phase: BootstrapPhase,
}

impl Harness {
    pub fn context(&mut self) -> StageContext<'_> {
        StageContext::new(
            &self.config,
            &mut self.registry,
            &self.installers,
            &self.directory,
            &self.loaders,
            &mut self.surface,
            &mut self.events,
            &self.notifier,
            &mut self.phase,
        )
    }
}
