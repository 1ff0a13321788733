use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub cross_validation: CrossValidationConfig,
}

/// Metric parameters: Top-N size, relevance threshold, NDCG depth
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    /// Maximum length of each per-user recommendation list.
    #[serde(default = "default_n")]
    pub n: usize,
    /// Minimum rating (true or estimated) for an item to count as relevant.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Ranking depth for NDCG.
    #[serde(default = "default_k")]
    pub k: usize,
}

/// Cross-validation parameters
#[derive(Debug, Clone, Deserialize)]
pub struct CrossValidationConfig {
    #[serde(default = "default_folds")]
    pub folds: usize,
    /// Shuffle seed; fixed by default so runs are reproducible.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_n() -> usize {
    10
}

fn default_threshold() -> f64 {
    3.5
}

fn default_k() -> usize {
    10
}

fn default_folds() -> usize {
    5
}

fn default_seed() -> u64 {
    42
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            n: default_n(),
            threshold: default_threshold(),
            k: default_k(),
        }
    }
}

impl Default for CrossValidationConfig {
    fn default() -> Self {
        Self {
            folds: default_folds(),
            seed: default_seed(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            evaluation: EvaluationConfig::default(),
            cross_validation: CrossValidationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file.
    ///
    /// Looks for the config file in this order:
    /// 1. Path specified in the RECMETRICS_CONFIG environment variable
    /// 2. ./config.toml in the current directory
    ///
    /// If neither exists, built-in defaults are used (n=10, threshold=3.5,
    /// k=10, folds=5, seed=42).
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("RECMETRICS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config = if config_path.exists() {
            let config_str = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
            toml::from_str(&config_str).context("Failed to parse config.toml")?
        } else {
            Config::default()
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.evaluation.n == 0 {
            anyhow::bail!("evaluation.n must be greater than 0");
        }

        if self.evaluation.k == 0 {
            anyhow::bail!("evaluation.k must be greater than 0");
        }

        if !self.evaluation.threshold.is_finite() {
            anyhow::bail!("evaluation.threshold must be a finite number");
        }

        if self.cross_validation.folds < 2 {
            anyhow::bail!("cross_validation.folds must be at least 2");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn with_config_env(config_path: &std::path::Path, f: impl FnOnce()) {
        let original = std::env::var("RECMETRICS_CONFIG").ok();
        std::env::set_var("RECMETRICS_CONFIG", config_path.to_str().unwrap());
        f();
        std::env::remove_var("RECMETRICS_CONFIG");
        if let Some(val) = original {
            std::env::set_var("RECMETRICS_CONFIG", val);
        }
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[evaluation]
n = 5
threshold = 4.0
k = 20

[cross_validation]
folds = 3
seed = 7
"#,
        )
        .unwrap();
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.evaluation.n, 5);
            assert!((config.evaluation.threshold - 4.0).abs() < 1e-9);
            assert_eq!(config.evaluation.k, 20);
            assert_eq!(config.cross_validation.folds, 3);
            assert_eq!(config.cross_validation.seed, 7);
        });
    }

    #[test]
    fn test_config_defaults_when_file_missing() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("does_not_exist.toml");
        with_config_env(&config_path, || {
            let config = Config::load().unwrap();
            assert_eq!(config.evaluation.n, 10);
            assert!((config.evaluation.threshold - 3.5).abs() < 1e-9);
            assert_eq!(config.evaluation.k, 10);
            assert_eq!(config.cross_validation.folds, 5);
            assert_eq!(config.cross_validation.seed, 42);
        });
    }

    #[test]
    fn test_config_partial_file_fills_defaults() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[evaluation]\nn = 3\n").unwrap();
        with_config_env(&config_path, || {
            let config = Config::load().unwrap();
            assert_eq!(config.evaluation.n, 3);
            assert!((config.evaluation.threshold - 3.5).abs() < 1e-9);
            assert_eq!(config.cross_validation.folds, 5);
        });
    }

    #[test]
    fn test_config_rejects_zero_n() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[evaluation]\nn = 0\n").unwrap();
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("evaluation.n"));
        });
    }

    #[test]
    fn test_config_rejects_single_fold() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[cross_validation]\nfolds = 1\n").unwrap();
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_err());
            assert!(config
                .unwrap_err()
                .to_string()
                .contains("cross_validation.folds"));
        });
    }
}
