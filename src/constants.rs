//! Central Configuration Constants
//!
//! Single source of truth for all pipeline defaults.
//! Runtime overrides live in `logic::config`.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "honeypot-classifier";

// ============================================
// Training protocol
// ============================================

/// Seed for balancing, splitting and every randomized model
pub const DEFAULT_SEED: u64 = 42;

/// Share of the balanced set held out for validation
pub const DEFAULT_VALIDATION_FRACTION: f64 = 0.2;

/// Minimum examples per class after balancing
pub const MIN_CLASS_EXAMPLES: usize = 2;

/// Soft-voting decision threshold (average >= threshold => attack)
pub const VOTING_THRESHOLD: f64 = 0.5;

/// Upper bound on rows fed to the kernel classifier
pub const DEFAULT_SVM_MAX_SAMPLES: usize = 4000;

// ============================================
// Event window
// ============================================

/// Trailing window used by the daily cron path (minutes)
pub const DEFAULT_WINDOW_MINUTES: i64 = 15;

// ============================================
// Artifacts & journal
// ============================================

pub const SVM_ARTIFACT: &str = "model_svm.json";
pub const XGB_ARTIFACT: &str = "model_xgb.json";
pub const RF_ARTIFACT: &str = "model_rf.json";
pub const VOTING_ARTIFACT: &str = "model_voting.json";

/// Journal file name prefix, completed with `<YYYY-MM-DD>.json`
pub const JOURNAL_PREFIX: &str = "events_attack_";

/// Default base directory when no environment override is set
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(APP_NAME)
}
