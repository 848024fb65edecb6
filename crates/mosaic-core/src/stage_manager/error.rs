//! # Mosaic Core Stage Errors
//!
//! Errors raised while running the bootstrap pipeline. A critical stage
//! failure is wrapped in [`StageSystemError::StageExecutionFailed`] so the
//! caller knows which stage aborted; the original error stays reachable
//! through `source`.
use thiserror::Error;

use crate::kernel::error::Error as KernelError;

#[derive(Debug, Error)]
pub enum StageSystemError {
    #[error("Stage '{stage_id}' failed: {source}")]
    StageExecutionFailed {
        stage_id: String,
        #[source]
        source: Box<KernelError>,
    },

    #[error("Stage '{stage_id}' needs '{key}', which an earlier stage did not provide")]
    MissingStageOutput { stage_id: String, key: &'static str },
}
