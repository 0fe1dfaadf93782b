//! Pipeline Configuration
//!
//! Environment-driven settings with fallback to `constants`.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::constants::{
    default_data_dir, DEFAULT_SEED, DEFAULT_SVM_MAX_SAMPLES, DEFAULT_VALIDATION_FRACTION,
    DEFAULT_WINDOW_MINUTES,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Window must be at least one minute, got {0}")]
    WindowMinutes(i64),

    #[error("Validation fraction must lie strictly between 0 and 1, got {0}")]
    ValidationFraction(f64),

    #[error("SVM row cap must be at least 1")]
    SvmMaxSamples,
}

fn valid_window_minutes(minutes: i64) -> bool {
    minutes > 0
}

fn valid_validation_fraction(fraction: f64) -> bool {
    fraction > 0.0 && fraction < 1.0
}

fn valid_svm_max_samples(cap: usize) -> bool {
    cap > 0
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the four model artifacts
    pub model_dir: PathBuf,

    /// Directory holding the per-day attack journals
    pub journal_dir: PathBuf,

    /// Seed for every randomized stage
    pub seed: u64,

    /// Trailing window for recent-event selection (minutes)
    pub window_minutes: i64,

    /// Validation share of the balanced training set
    pub validation_fraction: f64,

    /// Row cap for kernel classifier training
    pub svm_max_samples: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let base = default_data_dir();
        Self {
            model_dir: base.join("models"),
            journal_dir: base.join("attacks"),
            seed: DEFAULT_SEED,
            window_minutes: DEFAULT_WINDOW_MINUTES,
            validation_fraction: DEFAULT_VALIDATION_FRACTION,
            svm_max_samples: DEFAULT_SVM_MAX_SAMPLES,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            model_dir: env::var("HONEYPOT_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),

            journal_dir: env::var("HONEYPOT_JOURNAL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.journal_dir),

            seed: env::var("HONEYPOT_SEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.seed),

            window_minutes: env::var("HONEYPOT_WINDOW_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|m: &i64| valid_window_minutes(*m))
                .unwrap_or(defaults.window_minutes),

            validation_fraction: env::var("HONEYPOT_VALIDATION_FRACTION")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|f: &f64| valid_validation_fraction(*f))
                .unwrap_or(defaults.validation_fraction),

            svm_max_samples: env::var("HONEYPOT_SVM_MAX_SAMPLES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| valid_svm_max_samples(*n))
                .unwrap_or(defaults.svm_max_samples),
        }
    }

    /// Check the bounds `from_env` enforces, for values set any other way
    /// (command-line overrides, struct literals).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !valid_window_minutes(self.window_minutes) {
            return Err(ConfigError::WindowMinutes(self.window_minutes));
        }
        if !valid_validation_fraction(self.validation_fraction) {
            return Err(ConfigError::ValidationFraction(self.validation_fraction));
        }
        if !valid_svm_max_samples(self.svm_max_samples) {
            return Err(ConfigError::SvmMaxSamples);
        }
        Ok(())
    }
}
