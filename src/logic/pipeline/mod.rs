//! Pipeline Module - End-to-End Batch Jobs
//!
//! Ghép các engine lại thành các job chạy một lượt:
//! - `train`: label heuristic → encode → balance → scale → split → fit → evaluate → persist
//! - `classify`: load artifact → transform → predict → ghi prediction records
//! - `run`: window → classify → journal (job cron hằng ngày)
//!
//! Mỗi stage chạy xong mới tới stage sau; lỗi của một stage làm hỏng cả lượt.

pub mod train;
pub mod classify;
pub mod run;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use thiserror::Error;

use crate::logic::config::ConfigError;
use crate::logic::events::EventError;
use crate::logic::features::FeatureError;
use crate::logic::journal::JournalError;
use crate::logic::model::{ArtifactError, TrainingError};

pub use train::train;
pub use classify::{classify, read_predictions, write_predictions};
pub use run::run;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Events(#[from] EventError),

    #[error(transparent)]
    Features(#[from] FeatureError),

    #[error(transparent)]
    Training(#[from] TrainingError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Journal(#[from] JournalError),

    #[error("Prediction file {} error: {source}", .path.display())]
    Predictions {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode predictions: {0}")]
    Encode(#[from] serde_json::Error),
}
