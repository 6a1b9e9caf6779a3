//! File type detection library
//!
//! This crate provides the core functionality for:
//! - Fingerprint sampling from files and buffers
//! - ONNX-based file type classification
//! - Batch prediction over file lists and directories
//! - Metrics and structured logging

pub mod config;
pub mod discovery;
pub mod error;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod source;

pub use config::{LabelSpace, ModelConfig, SamplingConfig};
pub use error::{ClassifierError, Result};
pub use models::*;
pub use observability::{PredictionRoute, PredictorMetrics, StructuredLogger};
pub use predictor::{FileTypePredictor, InferenceEngine, OnnxEngine};
pub use source::{ByteSource, FileSource, MemorySource};
