use crate::cli::PredictArgs;
use crate::config::{AppConfig, build_config};
use crate::data::DataManager;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use bioact::core::io::descriptors::{write_descriptor_csv, write_subset_csv};
use bioact::core::io::export::ExportConfig;
use bioact::core::models::prediction::PredictionResult;
use bioact::core::scoring::loader::JsonModelLoader;
use bioact::engine::cancel::CancellationToken;
use bioact::engine::progress::ProgressReporter;
use bioact::workflows::predict::{Pipeline, PredictionReport};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn run(args: PredictArgs) -> Result<()> {
    info!("Initializing data manager...");
    let data_manager = DataManager::new()?;

    info!("Merging configuration from file and CLI arguments...");
    let app_config = build_config(&args, &data_manager)?;

    info!("Loading model and descriptor list...");
    let pipeline = Arc::new(Pipeline::from_config(
        &app_config.core_config,
        &JsonModelLoader,
    )?);

    let cancel = CancellationToken::new();
    let interrupt_watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling the current run.");
                cancel.cancel();
            }
        })
    };

    let result = predict_all(&app_config, pipeline, &cancel).await;
    interrupt_watcher.abort();
    result
}

async fn predict_all(
    app_config: &AppConfig,
    pipeline: Arc<Pipeline>,
    cancel: &CancellationToken,
) -> Result<()> {
    let total = app_config.inputs.len();
    let progress_handler = CliProgressHandler::new();

    for (i, input) in app_config.inputs.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(CliError::Interrupted);
        }

        info!("Reading molecules from {:?}", input);
        let raw_text = std::fs::read_to_string(input).map_err(|e| CliError::FileParsing {
            path: input.clone(),
            source: e.into(),
        })?;

        if total > 1 {
            println!("[{}/{}] {}", i + 1, total, input.display());
        }

        let task_pipeline = pipeline.clone();
        let task_cancel = cancel.clone();
        let callback = progress_handler.get_callback();
        let outcome = tokio::task::spawn_blocking(move || {
            let reporter = ProgressReporter::with_callback(callback);
            task_pipeline.run(&raw_text, &reporter, &task_cancel)
        })
        .await
        .map_err(|e| CliError::Other(anyhow::anyhow!("Prediction task failed: {}", e)))?;

        let report = match outcome {
            Ok(report) => report,
            Err(_) if cancel.is_cancelled() => {
                progress_handler.abandon();
                return Err(CliError::Interrupted);
            }
            Err(e) => {
                progress_handler.abandon();
                return Err(CliError::FileParsing {
                    path: input.clone(),
                    source: e.into(),
                });
            }
        };

        write_outputs(app_config, &report, i + 1, total)?;
    }

    Ok(())
}

fn write_outputs(
    app_config: &AppConfig,
    report: &PredictionReport,
    index: usize,
    total: usize,
) -> Result<()> {
    let export = &app_config.core_config.export;
    print!("{}", render_table(&report.result, export));

    let output_path = numbered_path(&app_config.output_template, index, total);
    create_parent_dir(&output_path)?;
    std::fs::write(&output_path, report.payload.as_bytes())?;
    info!(
        "Wrote {} prediction(s) to {:?}",
        report.result.len(),
        &output_path
    );
    println!(
        "✓ {} prediction(s) written to: {}",
        report.result.len(),
        output_path.display()
    );

    let name_column = &app_config.core_config.tool.name_column;
    if let Some(template) = &app_config.descriptors_out {
        let path = numbered_path(template, index, total);
        write_table(&path, |file| {
            write_descriptor_csv(&report.descriptors, name_column, file)
        })?;
        println!("  Descriptors written to: {}", path.display());
    }
    if let Some(template) = &app_config.subset_out {
        let path = numbered_path(template, index, total);
        write_table(&path, |file| write_subset_csv(&report.subset, name_column, file))?;
        println!("  Model features written to: {}", path.display());
    }

    if app_config.print_link {
        println!("{}", report.payload.html_link());
    }
    Ok(())
}

fn write_table(
    path: &Path,
    write: impl FnOnce(BufWriter<File>) -> std::result::Result<(), csv::Error>,
) -> Result<()> {
    create_parent_dir(path)?;
    let file = File::create(path)?;
    write(BufWriter::new(file)).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Returns `template` unchanged for a single input, otherwise inserts `_<index>` before
/// the extension (`prediction.csv` becomes `prediction_2.csv`).
fn numbered_path(template: &Path, index: usize, total: usize) -> PathBuf {
    if total <= 1 {
        return template.to_path_buf();
    }
    let stem = template
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let file_name = match template.extension() {
        Some(ext) => format!("{}_{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}_{}", stem, index),
    };
    template.with_file_name(file_name)
}

fn render_table(result: &PredictionResult, export: &ExportConfig) -> String {
    let width = result
        .iter()
        .map(|p| p.name.chars().count())
        .chain(std::iter::once(export.name_column.chars().count()))
        .max()
        .unwrap_or(0);

    let mut out = format!(
        "{:<width$}  {}\n",
        export.name_column,
        export.score_column,
        width = width
    );
    for prediction in result {
        out.push_str(&format!(
            "{:<width$}  {:.4}\n",
            prediction.name,
            prediction.score,
            width = width
        ));
    }
    out
}
