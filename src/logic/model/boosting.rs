//! Gradient Boosted Trees (logistic loss)
//!
//! Second-order boosting: mỗi vòng fit một cây trên gradient/hessian của
//! log-loss, leaf weight = -G / (H + lambda), nhân learning rate.

use serde::{Deserialize, Serialize};

use super::tree::{DecisionTree, GradientParams};
use super::{sigmoid, Classifier, TrainingError};
use crate::logic::dataset::LabeledSample;
use crate::logic::features::FeatureVector;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    /// L2 regularisation on leaf weights
    pub lambda: f64,
    pub min_child_weight: f64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.3,
            max_depth: 6,
            lambda: 1.0,
            min_child_weight: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingClassifier {
    /// Initial margin (log-odds of 0.5)
    pub base_margin: f64,
    pub trees: Vec<DecisionTree>,
}

impl GradientBoostingClassifier {
    pub fn fit(samples: &[LabeledSample], params: &BoostingParams) -> Result<Self, TrainingError> {
        if samples.is_empty() {
            return Err(TrainingError::EmptyInput("gradient boosting"));
        }

        let x: Vec<FeatureVector> = samples.iter().map(|s| s.features).collect();
        let y: Vec<f64> = samples.iter().map(|s| s.label.target()).collect();

        let tree_params = GradientParams {
            max_depth: params.max_depth,
            lambda: params.lambda,
            min_child_weight: params.min_child_weight,
            leaf_scale: params.learning_rate,
        };

        let base_margin = 0.0;
        let mut margin = vec![base_margin; x.len()];
        let mut trees = Vec::with_capacity(params.n_estimators);

        for _ in 0..params.n_estimators {
            let mut grad = Vec::with_capacity(x.len());
            let mut hess = Vec::with_capacity(x.len());
            for (m, target) in margin.iter().zip(y.iter()) {
                let p = sigmoid(*m);
                grad.push(p - target);
                hess.push((p * (1.0 - p)).max(1e-16));
            }

            let tree = DecisionTree::fit_gradient(&x, &grad, &hess, &tree_params);
            for (m, row) in margin.iter_mut().zip(x.iter()) {
                *m += tree.predict(row);
            }
            trees.push(tree);
        }

        log::info!(
            "Gradient boosting trained: {} rows, {} trees",
            x.len(),
            trees.len()
        );

        Ok(Self { base_margin, trees })
    }

    pub fn margin(&self, x: &FeatureVector) -> f64 {
        self.base_margin + self.trees.iter().map(|t| t.predict(x)).sum::<f64>()
    }
}

impl Classifier for GradientBoostingClassifier {
    fn name(&self) -> &'static str {
        "xgb"
    }

    fn predict_proba(&self, x: &FeatureVector) -> f64 {
        sigmoid(self.margin(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::labeling::Label;

    fn conjunction() -> Vec<LabeledSample> {
        // attack only when both of the first two codes are high
        let mut out = Vec::new();
        for _ in 0..20 {
            for (a, b) in [(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)] {
                let label = Label::from(a == 1.0 && b == 1.0);
                out.push(LabeledSample::new(FeatureVector::from_values([a, b, 0.0]), label));
            }
        }
        out
    }

    #[test]
    fn test_learns_interaction() {
        let model = GradientBoostingClassifier::fit(&conjunction(), &BoostingParams::default()).unwrap();
        let p = |a: f64, b: f64| model.predict_proba(&FeatureVector::from_values([a, b, 0.0]));
        assert!(p(1.0, 1.0) > 0.8);
        assert!(p(0.0, 1.0) < 0.2);
        assert!(p(1.0, 0.0) < 0.2);
        assert!(p(0.0, 0.0) < 0.2);
    }

    #[test]
    fn test_tree_count() {
        let params = BoostingParams { n_estimators: 7, ..Default::default() };
        let model = GradientBoostingClassifier::fit(&conjunction(), &params).unwrap();
        assert_eq!(model.trees.len(), 7);
    }
}
