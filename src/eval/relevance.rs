//! Precision and recall of Top-N lists against ground-truth relevance.

use crate::data::Rating;
use crate::eval::topn::RecommendedItem;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Average precision and recall of Top-N recommendations over all
/// ground-truth users.
///
/// Per user in `ground_truth`: the relevant set is the items whose true
/// rating is `>= threshold`; the recommended set comes from `top_n` (empty
/// when the user is absent). Precision is the relevant fraction of the
/// recommended items, recall the recommended fraction of the relevant
/// items; an empty denominator yields 0 for that user, not an error.
///
/// The averaging universe is ground-truth users only — users with zero
/// qualifying recommendations still count in the denominator. Returns
/// `(0.0, 0.0)` when the ground truth is empty.
pub fn precision_recall(
    top_n: &BTreeMap<String, Vec<RecommendedItem>>,
    ground_truth: &[Rating],
    threshold: f64,
) -> (f64, f64) {
    let mut relevant_by_user: HashMap<&str, HashSet<&str>> = HashMap::new();
    for r in ground_truth {
        let items = relevant_by_user.entry(r.user_id.as_str()).or_default();
        if r.rating >= threshold {
            items.insert(r.item_id.as_str());
        }
    }

    if relevant_by_user.is_empty() {
        return (0.0, 0.0);
    }

    let empty: Vec<RecommendedItem> = Vec::new();
    let mut precision_sum = 0.0;
    let mut recall_sum = 0.0;

    for (user_id, relevant) in &relevant_by_user {
        let recommended = top_n.get(*user_id).unwrap_or(&empty);
        let hits = recommended
            .iter()
            .filter(|item| relevant.contains(item.item_id.as_str()))
            .count();

        if !recommended.is_empty() {
            precision_sum += hits as f64 / recommended.len() as f64;
        }
        if !relevant.is_empty() {
            recall_sum += hits as f64 / relevant.len() as f64;
        }
    }

    let users = relevant_by_user.len() as f64;
    (precision_sum / users, recall_sum / users)
}
