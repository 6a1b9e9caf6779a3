//! File type prediction engine

mod features;
mod inference;
mod output;
mod pipeline;
mod policy;


pub use features::{middle_offset, FeatureExtractor};
pub use inference::{compute_checksum, OnnxEngine};
pub use output::PredictionReducer;
pub use pipeline::FileTypePredictor;
pub use policy::TrivialCasePolicy;

use crate::error::Result;
use crate::models::FeatureVector;

/// Trait for inference engine implementations
pub trait InferenceEngine: Send + Sync {
    /// Run the model on one feature vector, returning one probability per label
    fn run(&self, features: &FeatureVector) -> Result<Vec<f32>>;
}
