use crate::data::Rating;
use crate::error::{RecmetricsError, Result};
use crate::eval::{Prediction, PredictionSet};
use crate::model::Recommender;
use std::collections::HashMap;

/// Baseline bias predictor: global mean plus per-user and per-item offsets.
///
/// `estimate(u, i) = mean + bias_u + bias_i`, where a bias is 0 when the
/// user or item never appeared in the training partition. Estimates are not
/// clamped to the rating scale. This is the stand-in collaborator behind
/// the [`Recommender`] boundary; a neighborhood model can replace it
/// without touching the evaluation core.
#[derive(Debug, Default)]
pub struct BiasModel {
    fitted: Option<Fitted>,
}

#[derive(Debug)]
struct Fitted {
    global_mean: f64,
    user_bias: HashMap<String, f64>,
    item_bias: HashMap<String, f64>,
}

impl BiasModel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Recommender for BiasModel {
    fn name(&self) -> &str {
        "bias-baseline"
    }

    fn fit(&mut self, train: &[Rating]) -> Result<()> {
        if train.is_empty() {
            return Err(RecmetricsError::Model(
                "cannot fit on an empty training partition".to_string(),
            ));
        }

        let global_mean = train.iter().map(|r| r.rating).sum::<f64>() / train.len() as f64;

        let mut user_sums: HashMap<&str, (f64, usize)> = HashMap::new();
        for r in train {
            let entry = user_sums.entry(r.user_id.as_str()).or_insert((0.0, 0));
            entry.0 += r.rating - global_mean;
            entry.1 += 1;
        }
        let user_bias: HashMap<String, f64> = user_sums
            .iter()
            .map(|(u, (sum, count))| (u.to_string(), sum / *count as f64))
            .collect();

        // Item bias is the residual after removing the user bias.
        let mut item_sums: HashMap<&str, (f64, usize)> = HashMap::new();
        for r in train {
            let ub = user_bias.get(r.user_id.as_str()).copied().unwrap_or(0.0);
            let entry = item_sums.entry(r.item_id.as_str()).or_insert((0.0, 0));
            entry.0 += r.rating - global_mean - ub;
            entry.1 += 1;
        }
        let item_bias: HashMap<String, f64> = item_sums
            .into_iter()
            .map(|(i, (sum, count))| (i.to_string(), sum / count as f64))
            .collect();

        self.fitted = Some(Fitted {
            global_mean,
            user_bias,
            item_bias,
        });
        Ok(())
    }

    fn predict(&self, test: &[Rating]) -> Result<PredictionSet> {
        let fitted = self.fitted.as_ref().ok_or_else(|| {
            RecmetricsError::Model("predict called before fit".to_string())
        })?;

        let predictions = test
            .iter()
            .map(|r| {
                let ub = fitted.user_bias.get(&r.user_id).copied().unwrap_or(0.0);
                let ib = fitted.item_bias.get(&r.item_id).copied().unwrap_or(0.0);
                Prediction::new(
                    r.user_id.clone(),
                    r.item_id.clone(),
                    r.rating,
                    fitted.global_mean + ub + ib,
                )
            })
            .collect();

        Ok(PredictionSet::from_vec(predictions))
    }
}
