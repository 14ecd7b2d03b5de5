use super::cancel::CancellationToken;
use super::config::DescriptorToolConfig;
use super::error::ToolError;
use crate::core::io::descriptors::read_descriptor_csv;
use crate::core::io::smi::write_smi_to_path;
use crate::core::models::descriptors::DescriptorMatrix;
use crate::core::models::molecule::MoleculeBatch;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

const WORKSPACE_PREFIX: &str = "bioact-";
const INPUT_DIR: &str = "input";
const INPUT_FILE: &str = "molecule.smi";
const OUTPUT_FILE: &str = "descriptors_output.csv";
const STDOUT_LOG: &str = "tool.stdout.log";
const STDERR_LOG: &str = "tool.stderr.log";
const POLL_INTERVAL: Duration = Duration::from_millis(100);
const STDERR_TAIL_BYTES: usize = 4096;

/// Computes a descriptor matrix for a batch of molecules.
///
/// Implementations must return one row per molecule, in batch order. Callers pair rows
/// with molecules by position, so an implementation that cannot establish the order of
/// its rows must fail rather than guess.
pub trait DescriptorCalculator: Send + Sync {
    fn compute_descriptors(
        &self,
        batch: &MoleculeBatch,
        cancel: &CancellationToken,
    ) -> Result<DescriptorMatrix, ToolError>;
}

/// Runs PaDEL-Descriptor (or any tool honoring its command-line contract) as a child
/// process inside a scoped per-run workspace.
#[derive(Debug, Clone)]
pub struct PadelDescriptorTool {
    config: DescriptorToolConfig,
}

impl PadelDescriptorTool {
    pub fn new(config: DescriptorToolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DescriptorToolConfig {
        &self.config
    }

    fn create_workspace(&self) -> Result<TempDir, ToolError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        let workspace = match &self.config.work_root {
            Some(root) => {
                fs::create_dir_all(root).map_err(ToolError::Workspace)?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .map_err(ToolError::Workspace)?;
        fs::create_dir(workspace.path().join(INPUT_DIR)).map_err(ToolError::Workspace)?;
        Ok(workspace)
    }

    fn build_command(&self, input_dir: &Path, output_path: &Path, workspace: &Path) -> Result<Command, ToolError> {
        let stdout = File::create(workspace.join(STDOUT_LOG)).map_err(ToolError::Workspace)?;
        let stderr = File::create(workspace.join(STDERR_LOG)).map_err(ToolError::Workspace)?;

        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.launcher_args)
            .args(self.config.tool_flags())
            .arg("-descriptortypes")
            .arg(&self.config.descriptor_types_path)
            .arg("-dir")
            .arg(input_dir)
            .arg("-file")
            .arg(output_path)
            .current_dir(workspace)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));
        Ok(command)
    }

    fn spawn(&self, mut command: Command) -> Result<Child, ToolError> {
        debug!(command = ?command, "Launching descriptor tool");
        command.spawn().map_err(|e| ToolError::Spawn {
            program: self.config.program.to_string_lossy().to_string(),
            source: e,
        })
    }

    /// Waits for the child in short slices so cancellation and the deadline are
    /// observed promptly. A child that is abandoned is killed and reaped.
    fn wait(&self, child: &mut Child, cancel: &CancellationToken) -> Result<ExitStatus, ToolError> {
        let started = Instant::now();
        loop {
            if cancel.is_cancelled() {
                terminate(child);
                return Err(ToolError::Cancelled);
            }

            let slice = match self.config.timeout {
                Some(limit) => {
                    let elapsed = started.elapsed();
                    if elapsed >= limit {
                        terminate(child);
                        return Err(ToolError::Timeout { after: limit });
                    }
                    POLL_INTERVAL.min(limit - elapsed)
                }
                None => POLL_INTERVAL,
            };

            match child.wait_timeout(slice) {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => continue,
                Err(e) => {
                    terminate(child);
                    return Err(ToolError::ProcessFailed {
                        reason: format!("failed to wait on the descriptor tool: {}", e),
                        stderr: String::new(),
                    });
                }
            }
        }
    }

    fn run(
        &self,
        batch: &MoleculeBatch,
        cancel: &CancellationToken,
        workspace: &Path,
        input_path: &Path,
    ) -> Result<DescriptorMatrix, ToolError> {
        write_smi_to_path(batch, input_path).map_err(|e| ToolError::Workspace(e.into()))?;
        debug!(path = %input_path.display(), molecules = batch.len(), "Wrote descriptor tool input");

        if cancel.is_cancelled() {
            return Err(ToolError::Cancelled);
        }

        let input_dir = workspace.join(INPUT_DIR);
        let output_path = workspace.join(OUTPUT_FILE);
        let command = self.build_command(&input_dir, &output_path, workspace)?;
        let mut child = self.spawn(command)?;
        let status = self.wait(&mut child, cancel)?;
        remove_input(input_path);

        if !status.success() {
            return Err(ToolError::ProcessFailed {
                reason: describe_status(status),
                stderr: read_stderr_tail(&workspace.join(STDERR_LOG)),
            });
        }
        if !output_path.is_file() {
            return Err(ToolError::ProcessFailed {
                reason: format!(
                    "exited successfully but wrote no output file at '{}'",
                    output_path.display()
                ),
                stderr: read_stderr_tail(&workspace.join(STDERR_LOG)),
            });
        }

        let matrix = read_output(&output_path, &self.config.name_column)?;
        if matrix.n_rows() != batch.len() {
            return Err(ToolError::RowCountMismatch {
                expected: batch.len(),
                found: matrix.n_rows(),
            });
        }
        align_to_batch(matrix, batch).map_err(|reason| ToolError::OutputUnreadable {
            path: output_path.to_string_lossy().to_string(),
            reason,
        })
    }
}

impl DescriptorCalculator for PadelDescriptorTool {
    fn compute_descriptors(
        &self,
        batch: &MoleculeBatch,
        cancel: &CancellationToken,
    ) -> Result<DescriptorMatrix, ToolError> {
        let workspace = self.create_workspace()?;
        let input_path = workspace.path().join(INPUT_DIR).join(INPUT_FILE);

        let result = self.run(batch, cancel, workspace.path(), &input_path);
        remove_input(&input_path);

        if self.config.keep_intermediates {
            let kept: PathBuf = workspace.keep();
            info!(path = %kept.display(), "Keeping descriptor workspace");
        } else if let Err(e) = workspace.close() {
            warn!("Failed to remove descriptor workspace: {}", e);
        }

        let matrix = result?;
        debug!(
            rows = matrix.n_rows(),
            columns = matrix.n_columns(),
            "Descriptor matrix computed"
        );
        Ok(matrix)
    }
}

fn terminate(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!("Kill on descriptor tool returned: {}", e);
    }
    if let Err(e) = child.wait() {
        warn!("Failed to reap descriptor tool process: {}", e);
    }
}

fn remove_input(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed descriptor tool input"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), "Failed to remove descriptor tool input: {}", e),
    }
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exited with status {}", code),
        None => format!("terminated abnormally ({})", status),
    }
}

fn read_stderr_tail(path: &Path) -> String {
    let Ok(bytes) = fs::read(path) else {
        return String::new();
    };
    let start = bytes.len().saturating_sub(STDERR_TAIL_BYTES);
    String::from_utf8_lossy(&bytes[start..]).into_owned()
}

fn read_output(path: &Path, name_column: &str) -> Result<DescriptorMatrix, ToolError> {
    let unreadable = |reason: String| ToolError::OutputUnreadable {
        path: path.to_string_lossy().to_string(),
        reason,
    };
    let file = File::open(path).map_err(|e| unreadable(e.to_string()))?;
    read_descriptor_csv(BufReader::new(file), name_column).map_err(|e| unreadable(e.to_string()))
}

/// Puts rows back into batch order when the tool's identifiers are exactly the batch
/// names in some order. Identifiers that repeat or differ from the batch names leave
/// the row order unprovable, which is an error unless they already match position for
/// position.
fn align_to_batch(matrix: DescriptorMatrix, batch: &MoleculeBatch) -> Result<DescriptorMatrix, String> {
    if matrix.row_names().iter().map(String::as_str).eq(batch.names()) {
        return Ok(matrix);
    }
    let order = batch_order(&matrix, batch)?;
    debug!("Realigning descriptor rows to batch order");
    Ok(matrix.reordered(&order))
}

fn batch_order(matrix: &DescriptorMatrix, batch: &MoleculeBatch) -> Result<Vec<usize>, String> {
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(matrix.n_rows());
    for (idx, name) in matrix.row_names().iter().enumerate() {
        if positions.insert(name.as_str(), idx).is_some() {
            return Err(format!(
                "row identifier '{}' appears more than once and rows are not in input order",
                name
            ));
        }
    }
    batch
        .names()
        .map(|name| {
            positions.remove(name).ok_or_else(|| {
                format!(
                    "no row is identified as molecule '{}'; cannot match rows to molecules",
                    name
                )
            })
        })
        .collect()
}
