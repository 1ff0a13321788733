//! Dataset handling: rating tuples, file loading, and K-fold splitting.

pub mod kfold;
pub mod loader;

pub use kfold::KFold;
pub use loader::load_ratings;

use serde::Deserialize;

/// One observed (user, item, rating) tuple from the dataset.
///
/// Ratings are carried as f64 throughout; the nominal scale (e.g. 1.0-5.0)
/// comes from the dataset and is not assumed to be integer-only.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rating {
    pub user_id: String,
    pub item_id: String,
    pub rating: f64,
}

impl Rating {
    pub fn new(user_id: impl Into<String>, item_id: impl Into<String>, rating: f64) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
            rating,
        }
    }
}
