use crate::event::{StageEvent, SystemEvent};
use crate::kernel::error::Result;
use crate::stage_manager::core_stages::{
    CompletionStage, ExternalLoadersStage, InitializeComponentsStage, InitializeServicesStage,
    ThemeSetupStage,
};
use crate::stage_manager::error::StageSystemError;
use crate::stage_manager::{Stage, StageContext, StageResult};

/// Represents a static definition of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineDefinition {
    /// The unique identifier name for the pipeline.
    pub name: &'static str,
    /// An ordered slice of stage IDs included in this pipeline.
    pub stages: &'static [&'static str],
    /// An optional description of the pipeline's purpose.
    pub description: Option<&'static str>,
}

/// The fixed startup sequence
pub const BOOTSTRAP_PIPELINE: PipelineDefinition = PipelineDefinition {
    name: "core::bootstrap",
    stages: &[
        InitializeServicesStage::ID,
        ThemeSetupStage::ID,
        InitializeComponentsStage::ID,
        ExternalLoadersStage::ID,
        CompletionStage::ID,
    ],
    description: Some("Services, theme, components, external loaders, completion"),
};

/// Ordered list of stages run one after another
pub struct StagePipeline {
    name: String,
    description: String,
    stages: Vec<Box<dyn Stage>>,
}

impl std::fmt::Debug for StagePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagePipeline")
            .field("name", &self.name)
            .field("stages", &self.stage_ids())
            .finish()
    }
}

impl StagePipeline {
    pub(crate) fn with_stages(name: &str, description: &str, stages: Vec<Box<dyn Stage>>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            stages,
        }
    }

    /// The bootstrap pipeline in its fixed order
    pub fn bootstrap() -> Self {
        Self::with_stages(
            BOOTSTRAP_PIPELINE.name,
            BOOTSTRAP_PIPELINE.description.unwrap_or_default(),
            vec![
                Box::new(InitializeServicesStage),
                Box::new(ThemeSetupStage),
                Box::new(InitializeComponentsStage),
                Box::new(ExternalLoadersStage),
                Box::new(CompletionStage),
            ],
        )
    }

    /// Run every stage in order.
    ///
    /// A failing critical stage stops the run and its error is returned
    /// wrapped in [`StageSystemError::StageExecutionFailed`]. A failing
    /// non-critical stage is recorded as [`StageResult::Failure`] and the
    /// run continues.
    pub async fn execute(&self, context: &mut StageContext<'_>) -> Result<Vec<(String, StageResult)>> {
        log::info!("Executing pipeline: {} ({})", self.name, self.description);
        let mut results = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let stage_id = stage.id().to_string();
            log::info!("Stage '{}': {}", stage_id, stage.name());
            context.dispatch(&SystemEvent::StageBegin {
                stage_id: stage_id.clone(),
            });

            let outcome = stage.execute(context).await;
            context.dispatch(&SystemEvent::StageComplete {
                stage_id: stage_id.clone(),
                success: outcome.is_ok(),
            });

            match outcome {
                Ok(()) => results.push((stage_id, StageResult::Success)),
                Err(e) if stage.is_critical() => {
                    log::error!("Critical stage '{}' failed: {}", stage_id, e);
                    return Err(StageSystemError::StageExecutionFailed {
                        stage_id,
                        source: Box::new(e),
                    }
                    .into());
                }
                Err(e) => {
                    log::warn!("Stage '{}' failed; continuing: {}", stage_id, e);
                    context.dispatch(&StageEvent::Warning {
                        stage_id: stage_id.clone(),
                        message: e.to_string(),
                    });
                    results.push((stage_id, StageResult::Failure(e.to_string())));
                }
            }
        }

        Ok(results)
    }

    /// Stage IDs in execution order
    pub fn stage_ids(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.id()).collect()
    }

}
