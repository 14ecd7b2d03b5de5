use crate::error::{CliError, Result};
use crate::utils::parser::ParsedLogicalName;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const TARGETS_DIR: &str = "targets";
pub const PADEL_DIR: &str = "padel";
pub const MODEL_FILE: &str = "model.json";
pub const SCHEMA_FILE: &str = "descriptor_list.csv";
pub const PADEL_JAR_FILE: &str = "PaDEL-Descriptor.jar";

/// A target directory found under `targets/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledTarget {
    pub name: String,
    pub has_model: bool,
    pub has_schema: bool,
}

impl InstalledTarget {
    pub fn is_complete(&self) -> bool {
        self.has_model && self.has_schema
    }
}

#[derive(Debug)]
pub struct DataManager {
    base_path: PathBuf,
}

impl DataManager {
    pub fn new() -> Result<Self> {
        let path = Self::determine_data_path()?;
        debug!("DataManager initialized with path: {:?}", &path);
        Ok(Self { base_path: path })
    }

    pub fn with_custom_path(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn get_data_path(&self) -> &Path {
        &self.base_path
    }

    pub fn set_custom_path(path: &Path) -> Result<()> {
        if !path.is_absolute() {
            return Err(CliError::Argument(format!(
                "Data path must be absolute: {}",
                path.display()
            )));
        }
        let path_str = path.to_str().ok_or_else(|| {
            CliError::Argument(format!("Data path is not valid UTF-8: {}", path.display()))
        })?;
        let config_path = Self::get_path_config_file()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(config_path, path_str).map_err(CliError::from)
    }

    pub fn reset_path() -> Result<()> {
        if let Ok(config_path) = Self::get_path_config_file() {
            if config_path.exists() {
                fs::remove_file(config_path)?;
            }
        }
        Ok(())
    }

    pub fn resolve_logical_name(&self, parsed_name: &ParsedLogicalName) -> PathBuf {
        match parsed_name {
            ParsedLogicalName::TargetModel { target } => {
                self.base_path.join(TARGETS_DIR).join(target).join(MODEL_FILE)
            }
            ParsedLogicalName::TargetSchema { target } => {
                self.base_path.join(TARGETS_DIR).join(target).join(SCHEMA_FILE)
            }
            ParsedLogicalName::PadelJar => self.base_path.join(PADEL_DIR).join(PADEL_JAR_FILE),
            ParsedLogicalName::Fingerprint { file_name } => {
                self.base_path.join(PADEL_DIR).join(file_name)
            }
        }
    }

    /// Lists the subdirectories of `targets/`, sorted by name. A missing `targets/`
    /// directory yields an empty list.
    pub fn list_targets(&self) -> Result<Vec<InstalledTarget>> {
        let targets_dir = self.base_path.join(TARGETS_DIR);
        if !targets_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut targets = Vec::new();
        for entry in fs::read_dir(&targets_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                warn!("Skipping target directory with a non UTF-8 name: {:?}", entry.path());
                continue;
            };
            let dir = entry.path();
            targets.push(InstalledTarget {
                name,
                has_model: dir.join(MODEL_FILE).is_file(),
                has_schema: dir.join(SCHEMA_FILE).is_file(),
            });
        }
        targets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(targets)
    }

    fn determine_data_path() -> Result<PathBuf> {
        match Self::get_path_config_file() {
            Ok(config_path) if config_path.exists() => {
                let custom_path_str = fs::read_to_string(&config_path)?.trim().to_string();
                if custom_path_str.is_empty() {
                    warn!("Custom path config file is empty, falling back to default path.");
                    Self::get_default_data_path()
                } else {
                    Ok(PathBuf::from(custom_path_str))
                }
            }
            _ => Self::get_default_data_path(),
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("org", "bioact", "bioact")
    }

    fn get_path_config_file() -> Result<PathBuf> {
        Self::project_dirs()
            .map(|dirs| dirs.config_dir().join("path.conf"))
            .ok_or_else(|| CliError::Data("Could not determine config directory path.".to_string()))
    }

    fn get_default_data_path() -> Result<PathBuf> {
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                CliError::Data("Could not determine default data directory path.".to_string())
            })
    }
}
