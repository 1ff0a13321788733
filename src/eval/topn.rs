//! Top-N selection: per-user ranked, threshold-filtered recommendation lists.

use crate::error::{RecmetricsError, Result};
use crate::eval::PredictionSet;
use std::collections::BTreeMap;

/// One entry of a per-user Top-N recommendation list.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendedItem {
    pub item_id: String,
    pub estimated_rating: f64,
}

/// Build per-user Top-N recommendation lists from a fold's predictions.
///
/// Per user: keep predictions with `estimated_rating >= threshold`, sort
/// descending by estimated rating, truncate to `n`. Ties between equal
/// estimates keep their input order (stable sort); callers must not depend
/// on that order. Users with no prediction at or above the threshold are
/// omitted from the map entirely, which consumers treat the same as an
/// empty list.
///
/// The map is keyed in user-id order so "first user" style sampling is
/// deterministic. `n == 0` violates the caller contract and is rejected.
pub fn select_top_n(
    predictions: &PredictionSet,
    n: usize,
    threshold: f64,
) -> Result<BTreeMap<String, Vec<RecommendedItem>>> {
    if n == 0 {
        return Err(RecmetricsError::InvalidArgument(
            "top-n size n must be greater than 0".to_string(),
        ));
    }

    let mut by_user: BTreeMap<String, Vec<RecommendedItem>> = BTreeMap::new();
    for p in predictions {
        if p.estimated_rating >= threshold {
            by_user
                .entry(p.user_id.clone())
                .or_default()
                .push(RecommendedItem {
                    item_id: p.item_id.clone(),
                    estimated_rating: p.estimated_rating,
                });
        }
    }

    for items in by_user.values_mut() {
        items.sort_by(|a, b| {
            b.estimated_rating
                .partial_cmp(&a.estimated_rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        items.truncate(n);
    }

    Ok(by_user)
}
