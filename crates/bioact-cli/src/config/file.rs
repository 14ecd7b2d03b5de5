use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileDescriptorToolConfig {
    pub program: Option<String>,
    #[serde(rename = "padel-jar")]
    pub padel_jar: Option<String>,
    pub fingerprint: Option<String>,
    pub heap: Option<String>,
    #[serde(rename = "remove-salt")]
    pub remove_salt: Option<bool>,
    #[serde(rename = "standardize-nitro")]
    pub standardize_nitro: Option<bool>,
    pub fingerprints: Option<bool>,
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
    #[serde(rename = "keep-intermediates")]
    pub keep_intermediates: Option<bool>,
    #[serde(rename = "work-dir")]
    pub work_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileModelConfig {
    #[serde(rename = "model-path")]
    pub model_path: Option<String>,
    #[serde(rename = "schema-path")]
    pub schema_path: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileOutputConfig {
    #[serde(rename = "file-name")]
    pub file_name: Option<String>,
    #[serde(rename = "name-column")]
    pub name_column: Option<String>,
    #[serde(rename = "score-column")]
    pub score_column: Option<String>,
}

/// The TOML configuration file. Every field is optional; absent values fall back to
/// the built-in defaults.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub target: Option<String>,
    #[serde(rename = "descriptor-tool")]
    pub descriptor_tool: Option<FileDescriptorToolConfig>,
    pub model: Option<FileModelConfig>,
    pub output: Option<FileOutputConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
