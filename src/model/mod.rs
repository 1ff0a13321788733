//! Recommender model boundary: the fit-then-predict protocol and the
//! accuracy metric reported alongside the ranking metrics.

pub mod baseline;

pub use baseline::BiasModel;

use crate::data::Rating;
use crate::error::Result;
use crate::eval::PredictionSet;

/// A rating predictor evaluated by cross-validation.
///
/// The protocol is fit-then-predict: `fit` fully overwrites any state from
/// a previous fold, and `predict` is only valid against the most recent
/// fit. Folds therefore run strictly sequentially when a single model
/// instance is reused.
pub trait Recommender {
    /// Name used in fold reports.
    fn name(&self) -> &str;

    /// Train on one fold's training partition, replacing prior state.
    fn fit(&mut self, train: &[Rating]) -> Result<()>;

    /// Estimate a rating for every held-out (user, item) pair.
    fn predict(&self, test: &[Rating]) -> Result<PredictionSet>;
}

/// Mean Absolute Error over a fold's predictions; 0 for an empty set.
pub fn mean_absolute_error(predictions: &PredictionSet) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let sum: f64 = predictions
        .iter()
        .map(|p| (p.true_rating - p.estimated_rating).abs())
        .sum();
    sum / predictions.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Prediction;

    #[test]
    fn test_mae() {
        let preds = PredictionSet::from_vec(vec![
            Prediction::new("u1", "i1", 4.0, 3.5),
            Prediction::new("u1", "i2", 2.0, 3.0),
        ]);
        // (0.5 + 1.0) / 2
        assert!((mean_absolute_error(&preds) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_mae_empty_set() {
        assert_eq!(mean_absolute_error(&PredictionSet::from_vec(vec![])), 0.0);
    }
}
