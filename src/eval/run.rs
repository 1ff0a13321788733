//! Cross-validation evaluation loop: fit, predict, score, report per fold.

use crate::config::EvaluationConfig;
use crate::data::Rating;
use crate::error::{RecmetricsError, Result};
use crate::eval::topn::RecommendedItem;
use crate::eval::{average_ndcg, precision_recall, select_top_n, Prediction};
use crate::model::{mean_absolute_error, Recommender};

/// Metrics and inspection samples for one successfully evaluated fold.
#[derive(Debug, Clone)]
pub struct FoldReport {
    /// 1-based fold index.
    pub fold: usize,
    pub prediction_count: usize,
    pub mae: f64,
    pub avg_precision: f64,
    pub avg_recall: f64,
    pub avg_ndcg: f64,
    /// First few raw predictions, for eyeballing the model output.
    pub sample_predictions: Vec<Prediction>,
    /// Top-N list of the lexicographically smallest recommended user;
    /// None when no user cleared the threshold.
    pub sample_user: Option<(String, Vec<RecommendedItem>)>,
}

/// Outcome of one fold: metrics, or the error that stopped it.
#[derive(Debug)]
pub enum FoldOutcome {
    Success(FoldReport),
    Failure { fold: usize, error: RecmetricsError },
}

/// Cross-fold means over the successful folds.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub folds_succeeded: usize,
    pub folds_failed: usize,
    pub mae: f64,
    pub avg_precision: f64,
    pub avg_recall: f64,
    pub avg_ndcg: f64,
}

/// Drives the per-fold evaluation sequence over a cross-validation split.
#[derive(Debug, Clone)]
pub struct EvaluationRun {
    n: usize,
    threshold: f64,
    k: usize,
}

const SAMPLE_PREDICTION_COUNT: usize = 2;

impl EvaluationRun {
    pub fn new(config: &EvaluationConfig) -> Self {
        Self {
            n: config.n,
            threshold: config.threshold,
            k: config.k,
        }
    }

    /// Evaluate the model over every fold, strictly in order.
    ///
    /// The model is refit for each fold, so fold i+1 never starts before
    /// fold i's metrics are computed. A failure in one fold is logged with
    /// its index and recorded as a [`FoldOutcome::Failure`]; the remaining
    /// folds still run.
    pub fn run<M: Recommender>(
        &self,
        model: &mut M,
        folds: &[(Vec<Rating>, Vec<Rating>)],
    ) -> Vec<FoldOutcome> {
        let mut outcomes = Vec::with_capacity(folds.len());

        for (idx, (train, test)) in folds.iter().enumerate() {
            let fold = idx + 1;
            log::info!(
                "Fold {}/{}: fitting {} on {} ratings",
                fold,
                folds.len(),
                model.name(),
                train.len()
            );

            match self.evaluate_fold(model, fold, train, test) {
                Ok(report) => outcomes.push(FoldOutcome::Success(report)),
                Err(error) => {
                    log::error!("Fold {} failed: {}", fold, error);
                    outcomes.push(FoldOutcome::Failure { fold, error });
                }
            }
        }

        outcomes
    }

    fn evaluate_fold<M: Recommender>(
        &self,
        model: &mut M,
        fold: usize,
        train: &[Rating],
        test: &[Rating],
    ) -> Result<FoldReport> {
        model.fit(train)?;
        let predictions = model.predict(test)?;

        let mae = mean_absolute_error(&predictions);
        let top_n = select_top_n(&predictions, self.n, self.threshold)?;
        let (avg_precision, avg_recall) = precision_recall(&top_n, test, self.threshold);
        let avg_ndcg = average_ndcg(&predictions, self.k)?;

        let sample_predictions = predictions
            .iter()
            .take(SAMPLE_PREDICTION_COUNT)
            .cloned()
            .collect();
        // BTreeMap keys are ordered, so this is the smallest user id.
        let sample_user = top_n
            .iter()
            .next()
            .map(|(user, items)| (user.clone(), items.clone()));

        Ok(FoldReport {
            fold,
            prediction_count: predictions.len(),
            mae,
            avg_precision,
            avg_recall,
            avg_ndcg,
            sample_predictions,
            sample_user,
        })
    }
}

/// Average the successful folds into one summary; None if every fold failed
/// or there were no folds.
pub fn summarize(outcomes: &[FoldOutcome]) -> Option<RunSummary> {
    let reports: Vec<&FoldReport> = outcomes
        .iter()
        .filter_map(|o| match o {
            FoldOutcome::Success(report) => Some(report),
            FoldOutcome::Failure { .. } => None,
        })
        .collect();

    if reports.is_empty() {
        return None;
    }

    let count = reports.len() as f64;
    Some(RunSummary {
        folds_succeeded: reports.len(),
        folds_failed: outcomes.len() - reports.len(),
        mae: reports.iter().map(|r| r.mae).sum::<f64>() / count,
        avg_precision: reports.iter().map(|r| r.avg_precision).sum::<f64>() / count,
        avg_recall: reports.iter().map(|r| r.avg_recall).sum::<f64>() / count,
        avg_ndcg: reports.iter().map(|r| r.avg_ndcg).sum::<f64>() / count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::KFold;
    use crate::eval::PredictionSet;
    use crate::model::BiasModel;

    /// Echoes the true rating back as the estimate: a perfect predictor.
    struct EchoModel;

    impl Recommender for EchoModel {
        fn name(&self) -> &str {
            "echo"
        }

        fn fit(&mut self, _train: &[Rating]) -> Result<()> {
            Ok(())
        }

        fn predict(&self, test: &[Rating]) -> Result<PredictionSet> {
            Ok(PredictionSet::from_vec(
                test.iter()
                    .map(|r| Prediction::new(r.user_id.clone(), r.item_id.clone(), r.rating, r.rating))
                    .collect(),
            ))
        }
    }

    /// Fails on a chosen fold's fit call, succeeds otherwise.
    struct FlakyModel {
        fail_on_fit: usize,
        fits: usize,
    }

    impl Recommender for FlakyModel {
        fn name(&self) -> &str {
            "flaky"
        }

        fn fit(&mut self, _train: &[Rating]) -> Result<()> {
            self.fits += 1;
            if self.fits == self.fail_on_fit {
                return Err(RecmetricsError::Model("simulated fit failure".to_string()));
            }
            Ok(())
        }

        fn predict(&self, test: &[Rating]) -> Result<PredictionSet> {
            EchoModel.predict(test)
        }
    }

    fn dataset() -> Vec<Rating> {
        let mut ratings = Vec::new();
        for u in 0..6 {
            for i in 0..8 {
                let rating = 1.0 + ((u * 3 + i * 5) % 9) as f64 / 2.0;
                ratings.push(Rating::new(format!("u{}", u), format!("i{}", i), rating));
            }
        }
        ratings
    }

    fn config() -> EvaluationConfig {
        EvaluationConfig {
            n: 10,
            threshold: 3.5,
            k: 10,
        }
    }

    #[test]
    fn test_run_produces_one_outcome_per_fold() {
        let ratings = dataset();
        let folds = KFold::new(4, 42).unwrap().split(&ratings).unwrap();
        let mut model = BiasModel::new();
        let outcomes = EvaluationRun::new(&config()).run(&mut model, &folds);
        assert_eq!(outcomes.len(), 4);
        for outcome in &outcomes {
            assert!(matches!(outcome, FoldOutcome::Success(_)));
        }
    }

    #[test]
    fn test_perfect_predictor_metrics() {
        // Every rating sits at or above the 3.5 threshold, so a predictor
        // that echoes the truth recommends exactly the relevant items.
        let mut ratings = Vec::new();
        for u in 0..5 {
            for i in 0..6 {
                let rating = 3.5 + ((u + i) % 4) as f64 * 0.5;
                ratings.push(Rating::new(format!("u{}", u), format!("i{}", i), rating));
            }
        }
        let folds = KFold::new(3, 42).unwrap().split(&ratings).unwrap();
        let mut model = EchoModel;
        let outcomes = EvaluationRun::new(&config()).run(&mut model, &folds);

        for (idx, outcome) in outcomes.iter().enumerate() {
            let FoldOutcome::Success(report) = outcome else {
                panic!("fold failed");
            };
            assert_eq!(report.fold, idx + 1);
            assert!((report.mae - 0.0).abs() < 1e-9);
            assert!((report.avg_precision - 1.0).abs() < 1e-9);
            assert!((report.avg_recall - 1.0).abs() < 1e-9);
            assert!((report.avg_ndcg - 1.0).abs() < 1e-9);
            assert_eq!(report.prediction_count, folds[idx].1.len());
        }
    }

    #[test]
    fn test_failed_fold_does_not_abort_the_rest() {
        let ratings = dataset();
        let folds = KFold::new(3, 42).unwrap().split(&ratings).unwrap();
        let mut model = FlakyModel {
            fail_on_fit: 2,
            fits: 0,
        };
        let outcomes = EvaluationRun::new(&config()).run(&mut model, &folds);

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0], FoldOutcome::Success(_)));
        assert!(matches!(outcomes[1], FoldOutcome::Failure { fold: 2, .. }));
        assert!(matches!(outcomes[2], FoldOutcome::Success(_)));
    }

    #[test]
    fn test_sample_user_is_smallest_id() {
        let ratings = dataset();
        let folds = KFold::new(3, 42).unwrap().split(&ratings).unwrap();
        let mut model = EchoModel;
        let outcomes = EvaluationRun::new(&config()).run(&mut model, &folds);

        let FoldOutcome::Success(report) = &outcomes[0] else {
            panic!("fold failed");
        };
        let (sample_id, items) = report.sample_user.as_ref().expect("no sample user");
        assert!(!items.is_empty());
        // Smallest among the users that actually got recommendations.
        let fold_users: Vec<&String> = folds[0]
            .1
            .iter()
            .filter(|r| r.rating >= 3.5)
            .map(|r| &r.user_id)
            .collect();
        assert!(fold_users.iter().all(|u| sample_id <= *u));
    }

    #[test]
    fn test_summarize_averages_successes_only() {
        let outcomes = vec![
            FoldOutcome::Success(FoldReport {
                fold: 1,
                prediction_count: 10,
                mae: 0.5,
                avg_precision: 0.8,
                avg_recall: 0.6,
                avg_ndcg: 0.9,
                sample_predictions: vec![],
                sample_user: None,
            }),
            FoldOutcome::Failure {
                fold: 2,
                error: RecmetricsError::Model("boom".to_string()),
            },
            FoldOutcome::Success(FoldReport {
                fold: 3,
                prediction_count: 12,
                mae: 0.7,
                avg_precision: 0.6,
                avg_recall: 0.4,
                avg_ndcg: 0.7,
                sample_predictions: vec![],
                sample_user: None,
            }),
        ];

        let summary = summarize(&outcomes).unwrap();
        assert_eq!(summary.folds_succeeded, 2);
        assert_eq!(summary.folds_failed, 1);
        assert!((summary.mae - 0.6).abs() < 1e-9);
        assert!((summary.avg_precision - 0.7).abs() < 1e-9);
        assert!((summary.avg_recall - 0.5).abs() < 1e-9);
        assert!((summary.avg_ndcg - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_all_failures_is_none() {
        let outcomes = vec![FoldOutcome::Failure {
            fold: 1,
            error: RecmetricsError::Model("boom".to_string()),
        }];
        assert!(summarize(&outcomes).is_none());
        assert!(summarize(&[]).is_none());
    }
}
