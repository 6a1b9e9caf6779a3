//! Model configuration document
//!
//! The document ships next to the model and describes both the sampling
//! geometry the model was trained with and the order of its output labels.
//! Only field presence and type are checked; unknown fields are ignored.

use crate::error::{ClassifierError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Sampling geometry for feature extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingConfig {
    /// Bytes taken from the start of the input
    pub beginning_size: usize,
    /// Bytes taken around the middle of the input
    pub mid_size: usize,
    /// Bytes taken from the end of the input
    pub end_size: usize,
    /// Byte used for positions the input cannot fill
    pub padding_token: u8,
    /// Inputs up to this length are classified without the model
    pub min_size_for_model: u64,
}

impl SamplingConfig {
    /// Length of every feature vector built with this configuration
    pub fn feature_len(&self) -> usize {
        self.beginning_size + self.mid_size + self.end_size
    }
}

/// Ordered output labels; position `i` names the model's output `i`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSpace {
    labels: Vec<String>,
}

impl LabelSpace {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
struct RawModelConfig {
    target_labels_space: Vec<String>,
    beg_size: usize,
    mid_size: usize,
    end_size: usize,
    padding_token: u8,
    min_file_size_for_dl: u64,
}

/// Immutable configuration loaded once and handed to the predictor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub sampling: SamplingConfig,
    pub labels: LabelSpace,
}

impl ModelConfig {
    pub fn new(sampling: SamplingConfig, labels: LabelSpace) -> Self {
        Self { sampling, labels }
    }

    /// Load the configuration document from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ClassifierError::from_io(path, e))?;
        let config = Self::from_json_str(&content).map_err(|e| match e {
            ClassifierError::Config(msg) => {
                ClassifierError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        debug!(
            path = %path.display(),
            labels = config.labels.len(),
            feature_len = config.sampling.feature_len(),
            "Loaded model configuration"
        );
        Ok(config)
    }

    /// Parse the configuration document from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawModelConfig =
            serde_json::from_str(content).map_err(|e| ClassifierError::Config(e.to_string()))?;
        Ok(Self {
            sampling: SamplingConfig {
                beginning_size: raw.beg_size,
                mid_size: raw.mid_size,
                end_size: raw.end_size,
                padding_token: raw.padding_token,
                min_size_for_model: raw.min_file_size_for_dl,
            },
            labels: LabelSpace::new(raw.target_labels_space),
        })
    }
}
