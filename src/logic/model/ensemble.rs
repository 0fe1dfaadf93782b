//! Soft-Voting Ensemble
//!
//! Trung bình xác suất class-1 của ba base model.
//! Tie-break: average >= VOTING_THRESHOLD (0.5) => Attack.

use serde::{Deserialize, Serialize};

use super::boosting::{BoostingParams, GradientBoostingClassifier};
use super::forest::{ForestParams, RandomForestClassifier};
use super::svm::{SvmClassifier, SvmParams};
use super::{Classifier, TrainingError};
use crate::constants::VOTING_THRESHOLD;
use crate::logic::dataset::{ClassCounts, LabeledSample};
use crate::logic::features::FeatureVector;

/// Hyper-parameters for all three members
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnsembleParams {
    pub svm: SvmParams,
    pub boosting: BoostingParams,
    pub forest: ForestParams,
}

impl EnsembleParams {
    /// Defaults with every randomized member seeded from `seed`
    pub fn seeded(seed: u64) -> Self {
        let mut params = Self::default();
        params.svm.seed = seed;
        params.forest.seed = seed;
        params
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftVotingEnsemble {
    pub svm: SvmClassifier,
    pub xgb: GradientBoostingClassifier,
    pub rf: RandomForestClassifier,
    pub threshold: f64,
}

impl SoftVotingEnsemble {
    pub fn new(svm: SvmClassifier, xgb: GradientBoostingClassifier, rf: RandomForestClassifier) -> Self {
        Self { svm, xgb, rf, threshold: VOTING_THRESHOLD }
    }

    /// Train the three members independently on the same rows
    pub fn fit(samples: &[LabeledSample], params: &EnsembleParams) -> Result<Self, TrainingError> {
        let counts = ClassCounts::of(samples);
        if counts.benign == 0 || counts.attack == 0 {
            return Err(TrainingError::DegenerateTrainingSet {
                benign: counts.benign,
                attack: counts.attack,
                required: 1,
            });
        }

        let svm = SvmClassifier::fit(samples, &params.svm)?;
        let xgb = GradientBoostingClassifier::fit(samples, &params.boosting)?;
        let rf = RandomForestClassifier::fit(samples, &params.forest)?;
        Ok(Self::new(svm, xgb, rf))
    }

    pub fn members(&self) -> [&dyn Classifier; 3] {
        [&self.svm, &self.xgb, &self.rf]
    }

    /// Class-1 probability of each member, in `members()` order
    pub fn member_probabilities(&self, x: &FeatureVector) -> [f64; 3] {
        self.members().map(|m| m.predict_proba(x))
    }
}

impl Classifier for SoftVotingEnsemble {
    fn name(&self) -> &'static str {
        "voting"
    }

    fn predict_proba(&self, x: &FeatureVector) -> f64 {
        let probs = self.member_probabilities(x);
        probs.iter().sum::<f64>() / probs.len() as f64
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }
}
