//! ONNX inference using tract
//!
//! Loads the file type model through tract-onnx with a fixed `1 x n` int32
//! input and returns the first output as a flat probability vector.

use super::InferenceEngine;
use crate::error::{ClassifierError, Result};
use crate::models::FeatureVector;
use crate::observability::PredictorMetrics;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, info, warn};

/// Inference latency above which a warning is logged
const MAX_INFERENCE_MS: u128 = 50;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// tract-backed inference engine
pub struct OnnxEngine {
    model: TractModel,
    input_len: usize,
    checksum: String,
    metrics: PredictorMetrics,
}

impl std::fmt::Debug for OnnxEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEngine")
            .field("input_len", &self.input_len)
            .field("checksum", &self.checksum)
            .finish_non_exhaustive()
    }
}

impl OnnxEngine {
    /// Create an engine from model bytes for inputs of `input_len` features
    pub fn new(model_bytes: &[u8], input_len: usize) -> Result<Self> {
        let checksum = compute_checksum(model_bytes);
        let model = Self::load_model(model_bytes, input_len)?;
        Ok(Self {
            model,
            input_len,
            checksum,
            metrics: PredictorMetrics::new(),
        })
    }

    /// Load a model file, verifying its SHA-256 when `expected_checksum` is set
    pub fn from_file(path: &Path, input_len: usize, expected_checksum: Option<&str>) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| ClassifierError::from_io(path, e))?;

        if let Some(expected) = expected_checksum {
            verify_checksum(&bytes, expected)?;
        }

        let engine = Self::new(&bytes, input_len)?;
        info!(
            path = %path.display(),
            size = bytes.len(),
            checksum = %engine.checksum,
            input_len = input_len,
            "Loaded ONNX model"
        );
        Ok(engine)
    }

    /// Parse and optimize an ONNX model from bytes
    fn load_model(model_bytes: &[u8], input_len: usize) -> Result<TractModel> {
        tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .and_then(|model| model.with_input_fact(0, i32::fact([1, input_len]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| ClassifierError::Inference(format!("failed to load ONNX model: {:#}", e)))
    }

    /// SHA-256 of the loaded model bytes, hex encoded
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn input_len(&self) -> usize {
        self.input_len
    }

    fn features_to_tensor(&self, features: &FeatureVector) -> Result<Tensor> {
        if features.len() != self.input_len {
            return Err(ClassifierError::InvalidInput(format!(
                "feature vector has {} values, model expects {}",
                features.len(),
                self.input_len
            )));
        }
        let array = tract_ndarray::Array2::from_shape_vec((1, self.input_len), features.values().to_vec())
            .map_err(|e| ClassifierError::InvalidInput(e.to_string()))?;
        Ok(array.into())
    }
}

impl InferenceEngine for OnnxEngine {
    fn run(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        let start = Instant::now();
        let input = self.features_to_tensor(features)?;

        let result = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| ClassifierError::Inference(format!("{:#}", e)))?;
        let output = result
            .first()
            .ok_or_else(|| ClassifierError::Inference("no output from model".to_string()))?;
        let probabilities: Vec<f32> = output
            .to_array_view::<f32>()
            .map_err(|e| ClassifierError::Inference(format!("{:#}", e)))?
            .iter()
            .copied()
            .collect();

        let elapsed = start.elapsed();
        self.metrics.observe_inference_latency(elapsed.as_secs_f64());
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            self.metrics.inc_slow_inferences();
            warn!(elapsed_ms = elapsed.as_millis(), "Inference exceeded {}ms target", MAX_INFERENCE_MS);
        } else {
            debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
        }

        Ok(probabilities)
    }
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn verify_checksum(data: &[u8], expected: &str) -> Result<()> {
    let actual = compute_checksum(data);
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(ClassifierError::ChecksumMismatch {
            expected: expected.trim().to_string(),
            actual,
        });
    }
    Ok(())
}
