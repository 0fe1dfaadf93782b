//! Model Module - Attack Classification Engine
//!
//! Ba base model (SVM, gradient boosting, random forest) + soft voting.
//! Model là artifact bất biến: train một lần, persist, load read-only.

pub mod tree;
pub mod svm;
pub mod boosting;
pub mod forest;
pub mod ensemble;
pub mod metrics;
pub mod artifacts;

use thiserror::Error;

use crate::constants::VOTING_THRESHOLD;
use crate::logic::features::FeatureVector;
use crate::logic::labeling::Label;

// Re-export common types
pub use ensemble::{EnsembleParams, SoftVotingEnsemble};
pub use metrics::{evaluate, Evaluation};
pub use artifacts::{ArtifactError, ArtifactKind, ArtifactStore, LoadedArtifact};

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// A trained binary decision function over feature vectors
pub trait Classifier {
    fn name(&self) -> &'static str;

    /// Probability of the attack class, in [0, 1]
    fn predict_proba(&self, x: &FeatureVector) -> f64;

    fn threshold(&self) -> f64 {
        VOTING_THRESHOLD
    }

    /// Attack iff probability >= threshold
    fn predict(&self, x: &FeatureVector) -> Label {
        Label::from(self.predict_proba(x) >= self.threshold())
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Error, Debug)]
pub enum TrainingError {
    /// Not enough examples of a class to train and validate
    #[error("Degenerate training set: {benign} benign / {attack} attack, need at least {required} of each")]
    DegenerateTrainingSet {
        benign: usize,
        attack: usize,
        required: usize,
    },

    #[error("Empty input for {0}")]
    EmptyInput(&'static str),

    #[error(transparent)]
    Features(#[from] crate::logic::features::FeatureError),
}

pub(crate) fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}
