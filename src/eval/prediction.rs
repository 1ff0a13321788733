use std::collections::HashSet;

/// One rating prediction for a held-out (user, item) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub user_id: String,
    pub item_id: String,
    /// Held-out ground-truth rating, bounded by the dataset's rating scale.
    pub true_rating: f64,
    /// Model estimate; may fall outside the nominal scale (no clamping here).
    pub estimated_rating: f64,
}

impl Prediction {
    pub fn new(
        user_id: impl Into<String>,
        item_id: impl Into<String>,
        true_rating: f64,
        estimated_rating: f64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
            true_rating,
            estimated_rating,
        }
    }
}

/// All predictions for one evaluation split.
///
/// Consumers group by `user_id` and never rely on sequence order. Created
/// fresh per fold and discarded once that fold's metrics are computed.
#[derive(Debug, Clone, Default)]
pub struct PredictionSet {
    predictions: Vec<Prediction>,
}

impl PredictionSet {
    /// Build a set from raw predictions, deduplicating (user, item) pairs.
    ///
    /// A user is expected to contribute at most one prediction per item per
    /// fold; if duplicates do arrive, the first occurrence wins and a
    /// warning is logged rather than leaving the outcome to sort stability.
    pub fn from_vec(predictions: Vec<Prediction>) -> Self {
        let mut seen: HashSet<(String, String)> = HashSet::with_capacity(predictions.len());
        let mut deduped = Vec::with_capacity(predictions.len());
        let mut dropped = 0usize;

        for p in predictions {
            if seen.insert((p.user_id.clone(), p.item_id.clone())) {
                deduped.push(p);
            } else {
                dropped += 1;
            }
        }

        if dropped > 0 {
            log::warn!(
                "Dropped {} duplicate (user, item) predictions; kept first occurrences",
                dropped
            );
        }

        Self {
            predictions: deduped,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Prediction> {
        self.predictions.iter()
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    pub fn as_slice(&self) -> &[Prediction] {
        &self.predictions
    }
}

impl<'a> IntoIterator for &'a PredictionSet {
    type Item = &'a Prediction;
    type IntoIter = std::slice::Iter<'a, Prediction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
