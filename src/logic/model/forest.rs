//! Random Forest Classifier
//!
//! Bagged Gini trees, mỗi split chỉ xét sqrt(d) features ngẫu nhiên.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::tree::{DecisionTree, GiniParams};
use super::{Classifier, TrainingError};
use crate::logic::dataset::LabeledSample;
use crate::logic::features::{FeatureVector, FEATURE_COUNT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            seed: crate::constants::DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    pub trees: Vec<DecisionTree>,
}

impl RandomForestClassifier {
    pub fn fit(samples: &[LabeledSample], params: &ForestParams) -> Result<Self, TrainingError> {
        if samples.is_empty() {
            return Err(TrainingError::EmptyInput("random forest"));
        }

        let x: Vec<FeatureVector> = samples.iter().map(|s| s.features).collect();
        let y: Vec<f64> = samples.iter().map(|s| s.label.target()).collect();
        let n = x.len();

        let tree_params = GiniParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            max_features: ((FEATURE_COUNT as f64).sqrt().floor() as usize).max(1),
        };

        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let trees: Vec<DecisionTree> = (0..params.n_estimators)
            .map(|_| {
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::fit_gini(&x, &y, &bootstrap, &tree_params, &mut rng)
            })
            .collect();

        log::info!(
            "Random forest trained: {} rows, {} trees",
            n,
            trees.len()
        );

        Ok(Self { trees })
    }
}

impl Classifier for RandomForestClassifier {
    fn name(&self) -> &'static str {
        "rf"
    }

    /// Mean of per-tree leaf class-1 fractions
    fn predict_proba(&self, x: &FeatureVector) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }
        self.trees.iter().map(|t| t.predict(x)).sum::<f64>() / self.trees.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::labeling::Label;

    fn by_protocol() -> Vec<LabeledSample> {
        (0..60)
            .map(|i| {
                let protocol = (i % 3) as f64;
                let label = Label::from(protocol == 2.0);
                LabeledSample::new(FeatureVector::from_values([(i % 4) as f64, 0.0, protocol]), label)
            })
            .collect()
    }

    #[test]
    fn test_learns_single_feature_rule() {
        let model = RandomForestClassifier::fit(&by_protocol(), &ForestParams::default()).unwrap();
        assert!(model.predict_proba(&FeatureVector::from_values([1.0, 0.0, 2.0])) > 0.8);
        assert!(model.predict_proba(&FeatureVector::from_values([1.0, 0.0, 0.0])) < 0.2);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let params = ForestParams { n_estimators: 5, ..Default::default() };
        let a = RandomForestClassifier::fit(&by_protocol(), &params).unwrap();
        let b = RandomForestClassifier::fit(&by_protocol(), &params).unwrap();
        assert_eq!(a.trees, b.trees);
    }
}
