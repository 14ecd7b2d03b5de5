use super::state::{InvalidTransition, RunState, Stage};
use crate::core::io::export::ExportError;
use crate::core::io::input::ParseError;
use crate::core::models::features::SchemaError;
use crate::core::scoring::ModelError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The molecule batch is empty")]
    EmptyBatch,

    #[error("Record {index} is malformed: {reason}")]
    MalformedRecord { index: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Failed to prepare the descriptor workspace: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("Failed to launch descriptor tool '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Descriptor tool failed: {reason}{}", format_stderr(.stderr))]
    ProcessFailed { reason: String, stderr: String },

    #[error("Descriptor tool did not finish within {}s and was terminated", .after.as_secs_f64())]
    Timeout { after: Duration },

    #[error("Descriptor calculation was cancelled")]
    Cancelled,

    #[error("Descriptor output '{path}' is unreadable: {reason}")]
    OutputUnreadable { path: String, reason: String },

    #[error("Descriptor tool returned {found} row(s) for {expected} molecule(s)")]
    RowCountMismatch { expected: usize, found: usize },
}

fn format_stderr(stderr: &str) -> String {
    if stderr.trim().is_empty() {
        String::new()
    } else {
        format!("\n--- tool stderr ---\n{}", stderr.trim_end())
    }
}

/// The classified failure of a pipeline run.
///
/// Every variant is fatal to the run that produced it; no stage retries or substitutes
/// partial results.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Descriptor calculation failed: {0}")]
    Tool(#[from] ToolError),

    #[error("Feature selection failed: {0}")]
    Schema(#[from] SchemaError),

    #[error("Prediction failed: {0}")]
    Model(#[from] ModelError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Run cancelled after stage '{after}'")]
    Cancelled { after: Stage },

    #[error("Stage order violated: {0}")]
    StageOrder(#[from] InvalidTransition),
}

impl PipelineError {
    /// The last stage the run completed before this error halted it.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Parse(_) => Stage::Idle,
            PipelineError::Validation(_) => Stage::Parsed,
            PipelineError::Tool(_) => Stage::Validated,
            PipelineError::Schema(_) => Stage::DescriptorsComputed,
            PipelineError::Model(_) => Stage::SubsetSelected,
            PipelineError::Export(_) => Stage::Scored,
            PipelineError::Cancelled { after } => *after,
            PipelineError::StageOrder(e) => match &e.from {
                RunState::Active(stage) | RunState::Failed { stage, .. } => *stage,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_failed_message_includes_stderr_tail() {
        let err = ToolError::ProcessFailed {
            reason: "exit status 1".to_string(),
            stderr: "java.lang.OutOfMemoryError\n".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Descriptor tool failed: exit status 1"));
        assert!(msg.contains("java.lang.OutOfMemoryError"));
    }

    #[test]
    fn process_failed_message_omits_empty_stderr() {
        let err = ToolError::ProcessFailed {
            reason: "exit status 2".to_string(),
            stderr: "  \n".to_string(),
        };
        assert_eq!(err.to_string(), "Descriptor tool failed: exit status 2");
    }

    #[test]
    fn stage_reflects_the_failing_step() {
        assert_eq!(PipelineError::from(ParseError::Empty).stage(), Stage::Idle);
        assert_eq!(
            PipelineError::from(SchemaError::MissingColumn("X".to_string())).stage(),
            Stage::DescriptorsComputed
        );
        assert_eq!(
            PipelineError::Cancelled {
                after: Stage::Validated
            }
            .stage(),
            Stage::Validated
        );
    }

    #[test]
    fn stage_order_error_reports_where_the_run_stood() {
        let mut tracker = crate::engine::state::RunTracker::new();
        tracker.advance(Stage::Parsed).unwrap();
        let err = PipelineError::from(tracker.advance(Stage::Scored).unwrap_err());
        assert_eq!(err.stage(), Stage::Parsed);
        assert!(err.to_string().contains("'scored'"));
    }
}
