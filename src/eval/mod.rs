//! Evaluation core: Top-N selection, precision/recall, NDCG, and the
//! cross-validation run loop.

pub mod ndcg;
pub mod prediction;
pub mod relevance;
pub mod run;
pub mod topn;

pub use ndcg::average_ndcg;
pub use prediction::{Prediction, PredictionSet};
pub use relevance::precision_recall;
pub use run::{summarize, EvaluationRun, FoldOutcome, FoldReport, RunSummary};
pub use topn::{select_top_n, RecommendedItem};
