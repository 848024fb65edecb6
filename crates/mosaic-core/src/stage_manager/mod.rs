pub mod context;
pub mod core_stages;
pub mod error;
pub mod pipeline;

use std::fmt;

use async_trait::async_trait;

use crate::kernel::error::Result;

/// Core trait that all bootstrap stages implement
#[async_trait]
pub trait Stage: Send + Sync {
    /// The unique identifier of the stage
    fn id(&self) -> &str;

    /// The human-readable name of the stage
    fn name(&self) -> &str;

    /// The description of what this stage does
    fn description(&self) -> &str;

    /// Whether a failure of this stage aborts the pipeline.
    /// Non-critical failures are logged and the pipeline moves on.
    fn is_critical(&self) -> bool {
        true
    }

    /// Execute the stage with the given context
    async fn execute(&self, context: &mut context::StageContext<'_>) -> Result<()>;
}

/// Result of a stage execution
#[derive(Clone, Debug, PartialEq)]
pub enum StageResult {
    /// Stage executed successfully
    Success,
    /// Stage failed with error
    Failure(String),
}

impl StageResult {
    pub fn is_success(&self) -> bool {
        matches!(self, StageResult::Success)
    }
}

impl fmt::Display for StageResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageResult::Success => write!(f, "Success"),
            StageResult::Failure(msg) => write!(f, "Failure: {}", msg),
        }
    }
}

pub use context::StageContext;
pub use pipeline::{PipelineDefinition, StagePipeline, BOOTSTRAP_PIPELINE};

#[cfg(test)]
mod tests;
