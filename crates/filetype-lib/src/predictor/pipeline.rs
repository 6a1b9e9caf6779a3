//! Prediction pipeline for files, buffers and directories
//!
//! Trivial inputs are answered by [`TrivialCasePolicy`]; everything else is
//! sampled, run through the inference engine and reduced to the most likely
//! label. Batch operations abort on the first failing input.

use super::{FeatureExtractor, InferenceEngine, OnnxEngine, PredictionReducer, TrivialCasePolicy};
use crate::config::{LabelSpace, ModelConfig, SamplingConfig};
use crate::discovery::{find_regular_files, scan_depth};
use crate::error::{ClassifierError, Result};
use crate::models::Prediction;
use crate::observability::{PredictionRoute, PredictorMetrics, StructuredLogger};
use crate::source::{ByteSource, FileSource, MemorySource};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Predicts file types with a configured model
///
/// Holds only immutable state and can be shared across threads.
pub struct FileTypePredictor {
    engine: Arc<dyn InferenceEngine>,
    extractor: FeatureExtractor,
    policy: TrivialCasePolicy,
    reducer: PredictionReducer,
    metrics: PredictorMetrics,
    logger: StructuredLogger,
}

impl std::fmt::Debug for FileTypePredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileTypePredictor")
            .field("sampling", self.sampling())
            .field("labels", &self.labels().len())
            .finish_non_exhaustive()
    }
}

impl FileTypePredictor {
    /// Create a predictor from a loaded configuration and an engine
    pub fn new(config: ModelConfig, engine: Arc<dyn InferenceEngine>) -> Self {
        let logger = StructuredLogger::new();
        logger.log_predictor_ready(config.labels.len(), config.sampling.feature_len());
        Self {
            engine,
            extractor: FeatureExtractor::new(config.sampling),
            policy: TrivialCasePolicy::new(config.sampling.min_size_for_model),
            reducer: PredictionReducer::new(config.labels),
            metrics: PredictorMetrics::new(),
            logger,
        }
    }

    /// Load the configuration document and the ONNX model from disk
    pub fn from_paths(
        model_path: &Path,
        config_path: &Path,
        model_checksum: Option<&str>,
    ) -> Result<Self> {
        let config = ModelConfig::from_path(config_path)?;
        let engine = OnnxEngine::from_file(model_path, config.sampling.feature_len(), model_checksum)?;
        Ok(Self::new(config, Arc::new(engine)))
    }

    pub fn sampling(&self) -> &SamplingConfig {
        self.extractor.config()
    }

    pub fn labels(&self) -> &LabelSpace {
        self.reducer.labels()
    }

    /// Predict the type of one file
    pub fn predict(&self, path: &Path) -> Result<Prediction> {
        if !path.exists() {
            warn!(path = %path.display(), "Input path does not exist");
            return Err(ClassifierError::NotFound(path.to_path_buf()));
        }
        if path.is_dir() {
            return Err(ClassifierError::InvalidInput(format!(
                "expected a file but found a directory: {}",
                path.display()
            )));
        }

        let mut source = FileSource::open(path)?;
        let input = path.display().to_string();
        self.classify(&mut source, &input)
    }

    /// Predict the type of an in-memory buffer
    pub fn predict_bytes(&self, bytes: &[u8]) -> Result<Prediction> {
        self.classify(&mut MemorySource::new(bytes), "<bytes>")
    }

    /// Predict the type of any byte source
    pub fn predict_source<S: ByteSource + ?Sized>(&self, source: &mut S) -> Result<Prediction> {
        self.classify(source, "<source>")
    }

    /// Predict every file in `paths`, skipping directories
    ///
    /// The first failing path aborts the whole batch.
    pub fn predict_many<I, P>(&self, paths: I) -> Result<HashMap<PathBuf, Prediction>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let start = Instant::now();
        let mut predictions = HashMap::new();
        for path in paths {
            let path = path.as_ref();
            if path.is_dir() {
                self.logger.log_skipped(&path.display().to_string(), "directory");
                continue;
            }
            let prediction = self.predict(path)?;
            predictions.insert(path.to_path_buf(), prediction);
        }

        self.metrics.set_last_batch_files(predictions.len() as i64);
        self.logger
            .log_batch_completed(predictions.len(), start.elapsed().as_millis());
        Ok(predictions)
    }

    /// Predict the regular files in a directory, descending into
    /// subdirectories when `recursive` is set
    pub fn predict_directory(
        &self,
        dir: &Path,
        recursive: bool,
    ) -> Result<HashMap<PathBuf, Prediction>> {
        if !dir.exists() {
            warn!(path = %dir.display(), "Provided path does not exist");
            return Err(ClassifierError::InvalidInput(format!(
                "path does not exist: {}",
                dir.display()
            )));
        }
        if !dir.is_dir() {
            warn!(path = %dir.display(), "Provided path is not a directory");
            return Err(ClassifierError::InvalidInput(format!(
                "path is not a directory: {}",
                dir.display()
            )));
        }

        let files = find_regular_files(dir, scan_depth(recursive))?;
        self.predict_many(files)
    }

    fn classify<S: ByteSource + ?Sized>(&self, source: &mut S, input: &str) -> Result<Prediction> {
        if let Some(prediction) = self.policy.evaluate(source.len()) {
            self.record(input, &prediction, PredictionRoute::Heuristic);
            return Ok(prediction);
        }

        let start = Instant::now();
        let prediction = self.run_model(source).map_err(|e| {
            self.metrics.inc_prediction_errors();
            self.logger.log_prediction_failed(input, &e);
            e
        })?;

        self.metrics
            .observe_prediction_latency(start.elapsed().as_secs_f64());
        self.record(input, &prediction, PredictionRoute::Model);
        Ok(prediction)
    }

    fn run_model<S: ByteSource + ?Sized>(&self, source: &mut S) -> Result<Prediction> {
        let features = self.extractor.extract(source)?;
        let probabilities = self.engine.run(&features)?;
        self.reducer.reduce(&probabilities)
    }

    fn record(&self, input: &str, prediction: &Prediction, route: PredictionRoute) {
        self.metrics.inc_predictions(route);
        self.logger.log_prediction(input, prediction, route);
    }
}
