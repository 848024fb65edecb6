use std::sync::Arc;

use async_trait::async_trait;

use crate::component::InitReport;
use crate::event::{StageEvent, SystemEvent};
use crate::kernel::bootstrap::BootstrapPhase;
use crate::kernel::constants::{APP_NAME, CLICK_EVENT};
use crate::kernel::error::Result;
use crate::loader::settle_all;
use crate::service::{ServiceError, ServiceKey, ServiceRegistry, ThemeService};
use crate::stage_manager::error::StageSystemError;
use crate::stage_manager::{Stage, StageContext};
use crate::ui_bridge::Notifier;

/// Stage 1: run the service installers, then verify the required services.
#[derive(Debug)]
pub struct InitializeServicesStage;

impl InitializeServicesStage {
    pub const ID: &'static str = "core::initialize_services";
}

#[async_trait]
impl Stage for InitializeServicesStage {
    fn id(&self) -> &str { Self::ID }
    fn name(&self) -> &str { "Initialize Services" }
    fn description(&self) -> &str { "Registers every service and checks that the required ones resolve." }

    async fn execute(&self, context: &mut StageContext<'_>) -> Result<()> {
        let installers = context.installers;
        for (key, install) in installers {
            context.registry.register(key.clone(), install());
        }

        let missing = context.registry.missing(&context.config.required_services);
        if !missing.is_empty() {
            log::error!("Required services missing: {:?}", missing);
            return Err(ServiceError::MissingRequiredServices { missing }.into());
        }

        log::info!(
            "{} services registered; {} required services resolved",
            context.registry.len(),
            context.config.required_services.len()
        );
        Ok(())
    }
}

/// Stage 2: restore the theme and wire the toggle control when it exists.
#[derive(Debug)]
pub struct ThemeSetupStage;

impl ThemeSetupStage {
    pub const ID: &'static str = "core::theme_setup";
}

#[async_trait]
impl Stage for ThemeSetupStage {
    fn id(&self) -> &str { Self::ID }
    fn name(&self) -> &str { "Theme Setup" }
    fn description(&self) -> &str { "Applies the saved theme and wires the theme toggle." }

    async fn execute(&self, context: &mut StageContext<'_>) -> Result<()> {
        let Some(theme) = context.registry.get_concrete::<ThemeService>(ServiceKey::THEME.as_str()) else {
            log::warn!("No theme service registered under '{}'; theme setup skipped", ServiceKey::THEME);
            return Ok(());
        };
        log::info!("Theme restored: {}", theme.current());

        let config = context.config;
        let toggle = config.theme_toggle_element.as_str();
        if !context.surface.resolve(toggle) {
            log::debug!("Theme toggle '{}' not on the surface; nothing to wire", toggle);
            return Ok(());
        }
        let listener = context.surface.add_listener(toggle, CLICK_EVENT)?;
        context.outputs_mut().theme_listener = Some(listener);
        log::debug!("Theme toggle '{}' wired", toggle);
        Ok(())
    }
}

/// Stage 3: build the dependency bundle and initialize every component.
#[derive(Debug)]
pub struct InitializeComponentsStage;

impl InitializeComponentsStage {
    pub const ID: &'static str = "core::initialize_components";
}

#[async_trait]
impl Stage for InitializeComponentsStage {
    fn id(&self) -> &str { Self::ID }
    fn name(&self) -> &str { "Initialize Components" }
    fn description(&self) -> &str { "Creates and initializes all registered components with a shared bundle." }

    async fn execute(&self, context: &mut StageContext<'_>) -> Result<()> {
        let config = context.config;
        let directory = context.directory;
        let ui_services = &config.ui_services;
        let bundle = if ui_services.is_empty() {
            context.registry.snapshot()
        } else {
            context.registry.bundle(ui_services)
        };
        let bundle = Arc::new(bundle);
        log::debug!("Dependency bundle: {:?}", bundle.names());

        let report = directory.initialize_all(&bundle, &mut *context.surface).await;
        if !report.deferred.is_empty() {
            log::info!("Deferred until their screen is shown: {:?}", report.deferred_names());
        }

        let outputs = context.outputs_mut();
        outputs.bundle = Some(bundle);
        outputs.report = Some(report);
        Ok(())
    }
}

/// Stage 4: run the external loaders. Best-effort.
#[derive(Debug)]
pub struct ExternalLoadersStage;

impl ExternalLoadersStage {
    pub const ID: &'static str = "core::external_loaders";
}

#[async_trait]
impl Stage for ExternalLoadersStage {
    fn id(&self) -> &str { Self::ID }
    fn name(&self) -> &str { "External Loaders" }
    fn description(&self) -> &str { "Runs asynchronous data loaders; failures are only logged." }

    fn is_critical(&self) -> bool {
        false
    }

    async fn execute(&self, context: &mut StageContext<'_>) -> Result<()> {
        let loaders = context.loaders;
        if loaders.is_empty() {
            log::debug!("No external loaders registered");
            return Ok(());
        }

        let registry: &ServiceRegistry = context.registry;
        let settled = settle_all(
            loaders
                .iter()
                .map(|loader| (loader.name().to_string(), loader.load(registry))),
        )
        .await;

        let message = format!("{} of {} loaders settled", settled.len(), loaders.len());
        log::info!("{}", message);
        if settled.len() < loaders.len() {
            context.notifier.warning(&format!("Some data could not be loaded ({})", message));
            context.dispatch(&StageEvent::Warning {
                stage_id: Self::ID.to_string(),
                message: message.clone(),
            });
        }
        context.dispatch(&StageEvent::Progress {
            stage_id: Self::ID.to_string(),
            message,
        });
        Ok(())
    }
}

/// Stage 5: hide the loading indicator, flip to READY and announce it.
#[derive(Debug)]
pub struct CompletionStage;

impl CompletionStage {
    pub const ID: &'static str = "core::completion";
}

#[async_trait]
impl Stage for CompletionStage {
    fn id(&self) -> &str { Self::ID }
    fn name(&self) -> &str { "Completion" }
    fn description(&self) -> &str { "Hides the loading indicator and publishes the active components." }

    async fn execute(&self, context: &mut StageContext<'_>) -> Result<()> {
        let components = context
            .outputs()
            .report
            .as_ref()
            .map(InitReport::initialized_names)
            .ok_or(StageSystemError::MissingStageOutput {
                stage_id: Self::ID.to_string(),
                key: "report",
            })?;

        let config = context.config;
        let loading = config.loading_element.as_str();
        if let Err(e) = context.surface.hide(loading) {
            log::warn!("Loading indicator could not be hidden: {}", e);
        }

        *context.phase = BootstrapPhase::Ready;
        log::info!("{} ready; active components: {:?}", APP_NAME, components);
        context.dispatch(&SystemEvent::BootstrapComplete { components });
        Ok(())
    }
}
