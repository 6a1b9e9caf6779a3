//! Short-circuit rules for inputs too small to classify with the model

use crate::models::Prediction;

/// Decides whether an input of a given length bypasses the model
#[derive(Debug, Clone, Copy)]
pub struct TrivialCasePolicy {
    min_size_for_model: u64,
}

impl TrivialCasePolicy {
    pub fn new(min_size_for_model: u64) -> Self {
        Self { min_size_for_model }
    }

    /// Fixed prediction for trivial inputs, `None` when the model must run
    pub fn evaluate(&self, len: u64) -> Option<Prediction> {
        if len == 0 {
            Some(Prediction::empty())
        } else if len <= self.min_size_for_model {
            Some(Prediction::text())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let policy = TrivialCasePolicy::new(8);
        assert_eq!(policy.evaluate(0), Some(Prediction::new("empty", 1.0)));
    }

    #[test]
    fn test_small_input_is_text() {
        let policy = TrivialCasePolicy::new(8);
        assert_eq!(policy.evaluate(1), Some(Prediction::new("txt", 1.0)));
        assert_eq!(policy.evaluate(8), Some(Prediction::new("txt", 1.0)));
    }

    #[test]
    fn test_above_threshold_runs_model() {
        let policy = TrivialCasePolicy::new(8);
        assert_eq!(policy.evaluate(9), None);
    }

    #[test]
    fn test_zero_threshold_only_short_circuits_empty() {
        let policy = TrivialCasePolicy::new(0);
        assert_eq!(policy.evaluate(0), Some(Prediction::empty()));
        assert_eq!(policy.evaluate(1), None);
    }
}
