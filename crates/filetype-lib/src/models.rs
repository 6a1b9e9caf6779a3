//! Core data models for file type prediction

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label returned for zero-length inputs
pub const EMPTY_LABEL: &str = "empty";

/// Label returned for inputs too small to be worth running the model on
pub const TEXT_LABEL: &str = "txt";

/// Predicted file type with the probability of the winning label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub probability: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, probability: f32) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }

    /// Prediction for an empty input
    pub fn empty() -> Self {
        Self::new(EMPTY_LABEL, 1.0)
    }

    /// Prediction for an input below the model threshold
    pub fn text() -> Self {
        Self::new(TEXT_LABEL, 1.0)
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.4})", self.label, self.probability)
    }
}

/// Byte windows sampled from a source before concatenation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Windows {
    pub beginning: Vec<u8>,
    pub middle: Vec<u8>,
    pub end: Vec<u8>,
}

/// Fixed-length model input laid out as `[beginning][middle][end]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    values: Vec<i32>,
}

impl FeatureVector {
    /// Concatenate sampled windows, widening each byte to an integer in 0..=255
    pub fn from_windows(windows: &Windows) -> Self {
        let values = windows
            .beginning
            .iter()
            .chain(&windows.middle)
            .chain(&windows.end)
            .map(|&b| i32::from(b))
            .collect();
        Self { values }
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_inner(self) -> Vec<i32> {
        self.values
    }
}
