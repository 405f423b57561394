//! Configuration for the loader CLI.
//!
//! Supports both environment variables and YAML config file.
//! Environment variables take precedence over config file values.

use crate::error::{DatasetError, Result};
use crate::loader::LoaderOptions;
use crate::query::UnionMode;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Dataset loader settings
    pub dataset: LoaderOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: LoaderOptions::new(PathBuf::new()),
        }
    }
}

/// Configuration file structure (YAML format).
#[derive(Debug, Deserialize)]
struct ConfigFile {
    dataset: Option<DatasetFileSection>,
}

#[derive(Debug, Deserialize)]
struct DatasetFileSection {
    path: Option<PathBuf>,
    has_labels: Option<bool>,
    nrows: Option<usize>,
    start_row: Option<usize>,
    text_idxs: Option<Vec<usize>>,
    query_placeholder_union_mode: Option<String>,
    extend_entities_with_answers: Option<bool>,
}

impl Config {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (RUCOS_DATASET_PATH, RUCOS_UNION_MODE, ...)
    /// 2. Config file (`explicit` if given, else ~/.config/rucos-loader/config.yaml)
    /// 3. Default values
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::config_file_path() {
                Some(path) if path.exists() => Self::load_from_file(&path)?,
                _ => Config::default(),
            },
        };

        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
        tracing::debug!(path = %path.display(), "reading config file");
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file_config: ConfigFile = serde_yaml::from_str(content)
            .map_err(|e| DatasetError::Config(format!("Failed to parse config file: {}", e)))?;

        let mut config = Config::default();

        if let Some(dataset) = file_config.dataset {
            let options = &mut config.dataset;
            if let Some(path) = dataset.path {
                options.path = path;
            }
            if let Some(has_labels) = dataset.has_labels {
                options.has_labels = has_labels;
            }
            if dataset.nrows.is_some() {
                options.nrows = dataset.nrows;
            }
            if let Some(start_row) = dataset.start_row {
                options.start_row = start_row;
            }
            if dataset.text_idxs.is_some() {
                options.text_idxs = dataset.text_idxs;
            }
            if let Some(mode) = dataset.query_placeholder_union_mode {
                options.query_placeholder_union_mode = mode;
            }
            if let Some(extend) = dataset.extend_entities_with_answers {
                options.extend_entities_with_answers = extend;
            }
        }

        Ok(config)
    }

    fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from a key lookup. Values that fail to parse are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let options = &mut self.dataset;

        if let Some(path) = lookup("RUCOS_DATASET_PATH") {
            options.path = PathBuf::from(path);
        }

        if let Some(mode) = lookup("RUCOS_UNION_MODE") {
            options.query_placeholder_union_mode = mode;
        }

        if let Some(has_labels) = lookup("RUCOS_HAS_LABELS") {
            if let Ok(value) = has_labels.parse() {
                options.has_labels = value;
            }
        }

        if let Some(nrows) = lookup("RUCOS_NROWS") {
            if let Ok(value) = nrows.parse() {
                options.nrows = Some(value);
            }
        }

        if let Some(start_row) = lookup("RUCOS_START_ROW") {
            if let Ok(value) = start_row.parse() {
                options.start_row = value;
            }
        }

        if let Some(extend) = lookup("RUCOS_EXTEND_ENTITIES") {
            if let Ok(value) = extend.parse() {
                options.extend_entities_with_answers = value;
            }
        }
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "rucos-loader")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Validate that required configuration is present.
    pub fn validate(&self) -> Result<()> {
        if self.dataset.path.as_os_str().is_empty() {
            return Err(DatasetError::Config(
                "Dataset path is required. Pass it on the command line, set RUCOS_DATASET_PATH or add it to the config file.".to_string(),
            ));
        }

        self.dataset
            .query_placeholder_union_mode
            .parse::<UnionMode>()?;

        Ok(())
    }
}
