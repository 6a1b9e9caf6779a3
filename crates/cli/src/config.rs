//! Configuration management for the CLI
//!
//! Settings are layered: settings file, then `FTYPE_*` environment variables,
//! then command-line flags.

use anyhow::{Context, Result};
use filetype_lib::FileTypePredictor;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable prefix for settings
const ENV_PREFIX: &str = "FTYPE";

/// CLI settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// ONNX model file
    pub model_path: Option<PathBuf>,
    /// Model configuration document (JSON)
    pub model_config_path: Option<PathBuf>,
    /// Expected SHA-256 of the model file
    pub model_sha256: Option<String>,
}

impl Settings {
    /// Load settings from `file` (or the default location) and the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        builder = match file {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => match default_settings_path() {
                Some(path) => builder
                    .add_source(config::File::with_name(&path.to_string_lossy()).required(false)),
                None => builder,
            },
        };

        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Failed to parse settings")
    }

    /// Apply command-line overrides
    pub fn with_overrides(
        mut self,
        model_path: Option<PathBuf>,
        model_config_path: Option<PathBuf>,
        model_sha256: Option<String>,
    ) -> Self {
        if model_path.is_some() {
            self.model_path = model_path;
        }
        if model_config_path.is_some() {
            self.model_config_path = model_config_path;
        }
        if model_sha256.is_some() {
            self.model_sha256 = model_sha256;
        }
        self
    }

    /// Model configuration path, defaulting to `config.json` beside the model
    pub fn resolved_config_path(&self) -> Option<PathBuf> {
        self.model_config_path.clone().or_else(|| {
            self.model_path
                .as_ref()
                .map(|model| model.with_file_name("config.json"))
        })
    }

    /// Load the configured model
    pub fn build_predictor(&self) -> Result<FileTypePredictor> {
        let model_path = self
            .model_path
            .as_deref()
            .context("No model configured: pass --model or set FTYPE_MODEL_PATH")?;
        let config_path = self
            .resolved_config_path()
            .context("No model configuration: pass --model-config or set FTYPE_MODEL_CONFIG_PATH")?;

        FileTypePredictor::from_paths(model_path, &config_path, self.model_sha256.as_deref())
            .with_context(|| format!("Failed to load model {}", model_path.display()))
    }
}

/// Get the default settings file path (extension resolved by the loader)
fn default_settings_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|home| home.join(".config").join("ftype").join("config"))
}
