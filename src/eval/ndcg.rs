//! Ranking quality via Normalized Discounted Cumulative Gain.
//!
//! NDCG is computed over *all* of a user's predictions, independent of the
//! Top-N relevance threshold: Top-N selection answers "did we pick good
//! items" while NDCG answers "did we order them well", so a user who never
//! clears the threshold still contributes here.

use crate::error::{RecmetricsError, Result};
use crate::eval::PredictionSet;
use std::collections::HashMap;

/// DCG over a relevance sequence: sum of rel_i / log2(i + 1) with
/// 1-indexed ranks, so the discount starts at log2(2) = 1.
fn dcg(relevances: &[f64]) -> f64 {
    relevances
        .iter()
        .enumerate()
        .map(|(i, rel)| rel / ((i + 2) as f64).log2())
        .sum()
}

/// Average NDCG@k over all users with at least one prediction.
///
/// Per user: rank predictions by estimated rating descending, take the top
/// k true ratings as the achieved relevance sequence; the ideal sequence
/// is all of the user's true ratings sorted descending, truncated to k.
/// A user whose ideal DCG is 0 (all true ratings non-positive) scores 0.
/// An empty prediction set yields 0. `k == 0` is a caller contract
/// violation.
pub fn average_ndcg(predictions: &PredictionSet, k: usize) -> Result<f64> {
    if k == 0 {
        return Err(RecmetricsError::InvalidArgument(
            "ndcg depth k must be greater than 0".to_string(),
        ));
    }

    // (estimated, true) pairs per user.
    let mut by_user: HashMap<&str, Vec<(f64, f64)>> = HashMap::new();
    for p in predictions {
        by_user
            .entry(p.user_id.as_str())
            .or_default()
            .push((p.estimated_rating, p.true_rating));
    }

    if by_user.is_empty() {
        return Ok(0.0);
    }

    let mut ndcg_sum = 0.0;
    for items in by_user.values() {
        let mut ranked = items.clone();
        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        let achieved: Vec<f64> = ranked.iter().take(k).map(|&(_, true_r)| true_r).collect();

        let mut ideal: Vec<f64> = items.iter().map(|&(_, true_r)| true_r).collect();
        ideal.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        ideal.truncate(k);

        let idcg = dcg(&ideal);
        if idcg != 0.0 {
            ndcg_sum += dcg(&achieved) / idcg;
        }
    }

    Ok(ndcg_sum / by_user.len() as f64)
}
