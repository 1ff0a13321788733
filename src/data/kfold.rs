use crate::data::Rating;
use crate::error::{RecmetricsError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Seeded K-fold splitter.
///
/// Shuffles the dataset once with a fixed seed, then partitions it into
/// `n_splits` contiguous test folds; each fold's training set is the
/// complement. The same seed always produces the same folds.
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
    seed: u64,
}

impl KFold {
    pub fn new(n_splits: usize, seed: u64) -> Result<Self> {
        if n_splits < 2 {
            return Err(RecmetricsError::InvalidArgument(format!(
                "n_splits must be at least 2, got {}",
                n_splits
            )));
        }
        Ok(Self { n_splits, seed })
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Split `ratings` into `n_splits` (train, test) pairs.
    ///
    /// The first `len % n_splits` test folds receive one extra element so
    /// the partition is as even as possible. Errors if the dataset has
    /// fewer ratings than splits.
    pub fn split(&self, ratings: &[Rating]) -> Result<Vec<(Vec<Rating>, Vec<Rating>)>> {
        if ratings.len() < self.n_splits {
            return Err(RecmetricsError::InvalidArgument(format!(
                "cannot split {} ratings into {} folds",
                ratings.len(),
                self.n_splits
            )));
        }

        let mut indices: Vec<usize> = (0..ratings.len()).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        let base = ratings.len() / self.n_splits;
        let extra = ratings.len() % self.n_splits;

        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < extra);
            let test_range = start..start + size;

            let test: Vec<Rating> = indices[test_range.clone()]
                .iter()
                .map(|&i| ratings[i].clone())
                .collect();
            let train: Vec<Rating> = indices[..test_range.start]
                .iter()
                .chain(indices[test_range.end..].iter())
                .map(|&i| ratings[i].clone())
                .collect();

            folds.push((train, test));
            start += size;
        }

        Ok(folds)
    }
}
