use crate::core::io::export::{EncodedPayload, ExportConfig, export};
use crate::core::io::input::parse;
use crate::core::models::descriptors::DescriptorMatrix;
use crate::core::models::features::{FeatureSchema, FeatureSubset};
use crate::core::models::molecule::MoleculeBatch;
use crate::core::models::prediction::PredictionResult;
use crate::core::scoring::ModelLoader;
use crate::engine::cancel::CancellationToken;
use crate::engine::config::PipelineConfig;
use crate::engine::descriptors::{DescriptorCalculator, PadelDescriptorTool};
use crate::engine::error::PipelineError;
use crate::engine::predict::PredictionEngine;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::select::select_subset;
use crate::engine::state::{RunState, RunTracker, Stage};
use crate::engine::validate::validate;
use tracing::{debug, info, instrument, warn};

/// Everything a single run reads but never modifies.
pub struct PipelineContext<'a> {
    pub calculator: &'a dyn DescriptorCalculator,
    pub schema: &'a FeatureSchema,
    pub engine: &'a PredictionEngine,
    pub export: &'a ExportConfig,
}

/// The loaded resources of a deployment: the descriptor tool, the feature schema and
/// the model, built once and shared by every run.
pub struct Pipeline {
    calculator: Box<dyn DescriptorCalculator>,
    schema: FeatureSchema,
    engine: PredictionEngine,
    export: ExportConfig,
}

impl Pipeline {
    pub fn new(
        calculator: Box<dyn DescriptorCalculator>,
        schema: FeatureSchema,
        engine: PredictionEngine,
        export: ExportConfig,
    ) -> Self {
        Self {
            calculator,
            schema,
            engine,
            export,
        }
    }

    /// Loads the schema and model named by `config` and wires them to a
    /// [`PadelDescriptorTool`].
    pub fn from_config(config: &PipelineConfig, loader: &dyn ModelLoader) -> Result<Self, PipelineError> {
        let schema = FeatureSchema::from_csv_path(&config.schema_path)?;
        info!(
            path = %config.schema_path.display(),
            columns = schema.len(),
            "Loaded feature schema"
        );
        let engine = PredictionEngine::load(loader, &config.model_path)?;
        if let Some(expected) = engine.model().n_features() {
            if expected != schema.len() {
                warn!(
                    "Model expects {} features but the schema lists {}; every run will fail at scoring",
                    expected,
                    schema.len()
                );
            }
        }
        Ok(Self::new(
            Box::new(PadelDescriptorTool::new(config.tool.clone())),
            schema,
            engine,
            config.export.clone(),
        ))
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn context(&self) -> PipelineContext<'_> {
        PipelineContext {
            calculator: self.calculator.as_ref(),
            schema: &self.schema,
            engine: &self.engine,
            export: &self.export,
        }
    }

    pub fn run(
        &self,
        raw_text: &str,
        reporter: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<PredictionReport, PipelineError> {
        run(raw_text, &self.context(), reporter, cancel)
    }
}

/// The artifacts of a successful run, kept for inspection and optional dumping.
#[derive(Debug, Clone)]
pub struct PredictionReport {
    pub batch: MoleculeBatch,
    pub descriptors: DescriptorMatrix,
    pub subset: FeatureSubset,
    pub result: PredictionResult,
    pub payload: EncodedPayload,
    pub state: RunState,
}

#[instrument(skip_all, name = "prediction_workflow")]
pub fn run(
    raw_text: &str,
    context: &PipelineContext,
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<PredictionReport, PipelineError> {
    let mut tracker = RunTracker::new();
    match execute(raw_text, context, reporter, cancel, &mut tracker) {
        Ok(report) => {
            info!(
                "Prediction complete for {} molecule(s).",
                report.result.len()
            );
            Ok(report)
        }
        Err(e) => {
            tracker.fail(e.to_string());
            warn!(stage = %tracker.stage(), "Prediction run failed: {}", e);
            Err(e)
        }
    }
}

fn execute(
    raw_text: &str,
    context: &PipelineContext,
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
    tracker: &mut RunTracker,
) -> Result<PredictionReport, PipelineError> {
    // === Stage 1: Parse and validate ===
    let batch = reporter.phase("Parsing input", || -> Result<_, PipelineError> {
        let batch = parse(raw_text)?;
        enter(tracker, Stage::Parsed)?;
        validate(&batch)?;
        enter(tracker, Stage::Validated)?;
        Ok(batch)
    })?;
    reporter.report(Progress::Message(format!(
        "Read {} molecule(s)",
        batch.len()
    )));
    check_cancelled(cancel, tracker)?;

    // === Stage 2: Descriptor calculation ===
    let descriptors = reporter.phase("Computing descriptors", || {
        context.calculator.compute_descriptors(&batch, cancel)
    })?;
    enter(tracker, Stage::DescriptorsComputed)?;
    debug!(shape = ?descriptors.shape(), "Descriptor matrix");
    check_cancelled(cancel, tracker)?;

    // === Stage 3: Feature selection ===
    let subset = reporter.phase("Selecting features", || {
        select_subset(&descriptors, context.schema)
    })?;
    enter(tracker, Stage::SubsetSelected)?;
    debug!(shape = ?subset.shape(), "Feature subset");
    check_cancelled(cancel, tracker)?;

    // === Stage 4: Scoring ===
    let result = reporter.phase("Scoring", || context.engine.predict(&batch, &subset))?;
    enter(tracker, Stage::Scored)?;
    check_cancelled(cancel, tracker)?;

    // === Stage 5: Export ===
    let payload = reporter.phase("Exporting", || export(&result, context.export))?;
    enter(tracker, Stage::Exported)?;

    Ok(PredictionReport {
        batch,
        descriptors,
        subset,
        result,
        payload,
        state: tracker.state().clone(),
    })
}

fn enter(tracker: &mut RunTracker, stage: Stage) -> Result<(), PipelineError> {
    tracker.advance(stage)?;
    info!(stage = %stage, "Stage reached");
    Ok(())
}

fn check_cancelled(cancel: &CancellationToken, tracker: &RunTracker) -> Result<(), PipelineError> {
    if cancel.is_cancelled() {
        return Err(PipelineError::Cancelled {
            after: tracker.stage(),
        });
    }
    Ok(())
}
