use crate::core::io::descriptors::DEFAULT_NAME_COLUMN;
use crate::core::io::export::ExportConfig;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PROGRAM: &str = "java";
pub const DEFAULT_HEAP: &str = "2G";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// How the external descriptor tool is launched.
///
/// The command line is `program launcher_args... <tool flags> -descriptortypes <xml>
/// -dir <input dir> -file <output csv>`. For PaDEL-Descriptor the launcher arguments
/// carry the JVM options and `-jar <PaDEL-Descriptor.jar>`.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorToolConfig {
    pub program: PathBuf,
    pub launcher_args: Vec<String>,
    pub descriptor_types_path: PathBuf,
    pub remove_salt: bool,
    pub standardize_nitro: bool,
    pub fingerprints: bool,
    /// Identifier column in the tool's CSV output.
    pub name_column: String,
    /// `None` waits for the tool indefinitely.
    pub timeout: Option<Duration>,
    /// Parent directory for per-run workspaces; the system temp dir when `None`.
    pub work_root: Option<PathBuf>,
    /// Keep the per-run workspace (input, output and tool logs) after the run.
    pub keep_intermediates: bool,
}

impl DescriptorToolConfig {
    /// The standard PaDEL-Descriptor invocation: a headless JVM with a fixed heap,
    /// salt removal, nitro standardization and fingerprint descriptors enabled.
    pub fn padel(jar_path: PathBuf, descriptor_types_path: PathBuf) -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            launcher_args: padel_launcher_args(&jar_path, DEFAULT_HEAP),
            descriptor_types_path,
            remove_salt: true,
            standardize_nitro: true,
            fingerprints: true,
            name_column: DEFAULT_NAME_COLUMN.to_string(),
            timeout: None,
            work_root: None,
            keep_intermediates: false,
        }
    }

    pub fn tool_flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::with_capacity(3);
        if self.remove_salt {
            flags.push("-removesalt");
        }
        if self.standardize_nitro {
            flags.push("-standardizenitro");
        }
        if self.fingerprints {
            flags.push("-fingerprints");
        }
        flags
    }
}

pub fn padel_launcher_args(jar_path: &std::path::Path, heap: &str) -> Vec<String> {
    vec![
        format!("-Xms{}", heap),
        format!("-Xmx{}", heap),
        "-Djava.awt.headless=true".to_string(),
        "-jar".to_string(),
        jar_path.to_string_lossy().to_string(),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub tool: DescriptorToolConfig,
    pub schema_path: PathBuf,
    pub model_path: PathBuf,
    pub export: ExportConfig,
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    tool: Option<DescriptorToolConfig>,
    schema_path: Option<PathBuf>,
    model_path: Option<PathBuf>,
    timeout: Option<Duration>,
    work_root: Option<PathBuf>,
    keep_intermediates: Option<bool>,
    export: Option<ExportConfig>,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descriptor_tool(mut self, tool: DescriptorToolConfig) -> Self {
        self.tool = Some(tool);
        self
    }
    pub fn schema_path(mut self, path: PathBuf) -> Self {
        self.schema_path = Some(path);
        self
    }
    pub fn model_path(mut self, path: PathBuf) -> Self {
        self.model_path = Some(path);
        self
    }
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
    pub fn work_root(mut self, path: Option<PathBuf>) -> Self {
        self.work_root = path;
        self
    }
    pub fn keep_intermediates(mut self, keep: bool) -> Self {
        self.keep_intermediates = Some(keep);
        self
    }
    pub fn export(mut self, export: ExportConfig) -> Self {
        self.export = Some(export);
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let mut tool = self
            .tool
            .ok_or(ConfigError::MissingParameter("descriptor_tool"))?;
        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(ConfigError::InvalidValue {
                    field: "timeout",
                    reason: "must be greater than zero".to_string(),
                });
            }
            tool.timeout = Some(timeout);
        }
        if self.work_root.is_some() {
            tool.work_root = self.work_root;
        }
        if let Some(keep) = self.keep_intermediates {
            tool.keep_intermediates = keep;
        }

        let export = self.export.unwrap_or_default();
        if export.file_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "file_name",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(PipelineConfig {
            tool,
            schema_path: self
                .schema_path
                .ok_or(ConfigError::MissingParameter("schema_path"))?,
            model_path: self
                .model_path
                .ok_or(ConfigError::MissingParameter("model_path"))?,
            export,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padel() -> DescriptorToolConfig {
        DescriptorToolConfig::padel(
            PathBuf::from("/opt/padel/PaDEL-Descriptor.jar"),
            PathBuf::from("/opt/padel/PubchemFingerprinter.xml"),
        )
    }

    #[test]
    fn padel_defaults_match_the_standard_invocation() {
        let tool = padel();
        assert_eq!(tool.program, PathBuf::from("java"));
        assert_eq!(
            tool.launcher_args,
            vec![
                "-Xms2G",
                "-Xmx2G",
                "-Djava.awt.headless=true",
                "-jar",
                "/opt/padel/PaDEL-Descriptor.jar"
            ]
        );
        assert_eq!(
            tool.tool_flags(),
            vec!["-removesalt", "-standardizenitro", "-fingerprints"]
        );
        assert_eq!(tool.name_column, "Name");
    }

    #[test]
    fn tool_flags_can_be_disabled_individually() {
        let mut tool = padel();
        tool.standardize_nitro = false;
        assert_eq!(tool.tool_flags(), vec!["-removesalt", "-fingerprints"]);
    }

    #[test]
    fn builder_applies_overrides_to_the_tool() {
        let config = PipelineConfigBuilder::new()
            .descriptor_tool(padel())
            .schema_path(PathBuf::from("descriptor_list.csv"))
            .model_path(PathBuf::from("model.json"))
            .timeout(Some(Duration::from_secs(60)))
            .keep_intermediates(true)
            .build()
            .unwrap();

        assert_eq!(config.tool.timeout, Some(Duration::from_secs(60)));
        assert!(config.tool.keep_intermediates);
        assert_eq!(config.export, ExportConfig::default());
    }

    #[test]
    fn builder_reports_missing_parameters() {
        let result = PipelineConfigBuilder::new()
            .descriptor_tool(padel())
            .model_path(PathBuf::from("model.json"))
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("schema_path")));

        let result = PipelineConfigBuilder::new().build();
        assert_eq!(result, Err(ConfigError::MissingParameter("descriptor_tool")));
    }

    #[test]
    fn builder_rejects_zero_timeout() {
        let result = PipelineConfigBuilder::new()
            .descriptor_tool(padel())
            .schema_path(PathBuf::from("s.csv"))
            .model_path(PathBuf::from("m.json"))
            .timeout(Some(Duration::ZERO))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "timeout", .. })
        ));
    }
}
