//! Reduction of model output to a labeled prediction

use crate::config::LabelSpace;
use crate::error::{ClassifierError, Result};
use crate::models::Prediction;

/// Picks the most probable label from a probability vector
#[derive(Debug, Clone)]
pub struct PredictionReducer {
    labels: LabelSpace,
}

impl PredictionReducer {
    pub fn new(labels: LabelSpace) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &LabelSpace {
        &self.labels
    }

    /// Index and value of the first maximum
    ///
    /// The vector must be non-empty and have one entry per label.
    pub fn argmax(&self, probabilities: &[f32]) -> Result<(usize, f32)> {
        if probabilities.is_empty() {
            return Err(ClassifierError::InvalidInput(
                "model returned an empty probability vector".to_string(),
            ));
        }
        if probabilities.len() != self.labels.len() {
            return Err(ClassifierError::InvalidInput(format!(
                "model returned {} probabilities for {} labels",
                probabilities.len(),
                self.labels.len()
            )));
        }

        let mut best = 0;
        let mut best_value = f32::NEG_INFINITY;
        for (i, &p) in probabilities.iter().enumerate() {
            if p > best_value {
                best = i;
                best_value = p;
            }
        }
        Ok((best, probabilities[best]))
    }

    /// Labeled prediction for a probability vector
    pub fn reduce(&self, probabilities: &[f32]) -> Result<Prediction> {
        let (index, probability) = self.argmax(probabilities)?;
        let label = self.labels.get(index).ok_or_else(|| {
            ClassifierError::InvalidInput(format!("no label at index {}", index))
        })?;
        Ok(Prediction::new(label, probability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reducer(labels: &[&str]) -> PredictionReducer {
        PredictionReducer::new(LabelSpace::new(
            labels.iter().map(|l| l.to_string()).collect(),
        ))
    }

    #[test]
    fn test_first_maximum_wins() {
        let r = reducer(&["a", "b", "c", "d"]);
        assert_eq!(r.argmax(&[0.2, 0.5, 0.5, 0.1]).unwrap(), (1, 0.5));
        assert_eq!(r.reduce(&[0.2, 0.5, 0.5, 0.1]).unwrap(), Prediction::new("b", 0.5));
    }

    #[test]
    fn test_single_label() {
        let r = reducer(&["only"]);
        assert_eq!(r.reduce(&[0.01]).unwrap(), Prediction::new("only", 0.01));
    }

    #[test]
    fn test_unnormalized_values() {
        let r = reducer(&["a", "b", "c"]);
        assert_eq!(r.argmax(&[3.0, -1.0, 7.5]).unwrap(), (2, 7.5));
    }

    #[test]
    fn test_nan_never_wins() {
        let r = reducer(&["a", "b"]);
        assert_eq!(r.argmax(&[f32::NAN, 0.3]).unwrap(), (1, 0.3));
    }

    #[test]
    fn test_empty_vector_rejected() {
        let r = reducer(&[]);
        assert!(matches!(r.argmax(&[]), Err(ClassifierError::InvalidInput(_))));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let r = reducer(&["a", "b", "c"]);
        assert!(matches!(
            r.reduce(&[0.1, 0.9]),
            Err(ClassifierError::InvalidInput(_))
        ));
    }
}
