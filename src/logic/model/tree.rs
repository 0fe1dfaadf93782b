//! Decision Tree - shared arena representation
//!
//! Dùng chung cho random forest (Gini) và gradient boosting (gradient/hessian).

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureVector, FEATURE_COUNT};

/// Minimum improvement for a gradient split to be kept
const MIN_SPLIT_GAIN: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Binary tree stored as a flat node arena, root at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    pub fn predict(&self, x: &FeatureVector) -> f64 {
        let mut at = 0;
        loop {
            match &self.nodes[at] {
                Node::Leaf { value } => return *value,
                Node::Split { feature, threshold, left, right } => {
                    at = if x.values[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    #[cfg(test)]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], at: usize) -> usize {
            match &nodes[at] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }

    /// Grow a classification tree on `rows` (may repeat, e.g. bootstrap).
    ///
    /// Leaves hold the class-1 fraction of their rows.
    pub fn fit_gini(
        x: &[FeatureVector],
        y: &[f64],
        rows: &[usize],
        params: &GiniParams,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow_gini(x, y, rows.to_vec(), 0, params, rng);
        tree
    }

    /// Grow a regression tree on gradient/hessian statistics.
    ///
    /// Leaves hold `-G / (H + lambda) * leaf_scale`.
    pub fn fit_gradient(
        x: &[FeatureVector],
        grad: &[f64],
        hess: &[f64],
        params: &GradientParams,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let rows: Vec<usize> = (0..x.len()).collect();
        tree.grow_gradient(x, grad, hess, rows, 0, params);
        tree
    }

    fn push_leaf(&mut self, value: f64) -> usize {
        self.nodes.push(Node::Leaf { value });
        self.nodes.len() - 1
    }

    fn grow_gini(
        &mut self,
        x: &[FeatureVector],
        y: &[f64],
        rows: Vec<usize>,
        depth: usize,
        params: &GiniParams,
        rng: &mut ChaCha8Rng,
    ) -> usize {
        let n = rows.len();
        let positives: f64 = rows.iter().map(|&i| y[i]).sum();
        let fraction = if n > 0 { positives / n as f64 } else { 0.0 };

        let pure = positives == 0.0 || positives == n as f64;
        let depth_reached = params.max_depth.is_some_and(|max| depth >= max);
        if pure || depth_reached || n < params.min_samples_split {
            return self.push_leaf(fraction);
        }

        // Draw features in random order; keep drawing past max_features
        // only while no valid split has been found.
        let mut features: Vec<usize> = (0..FEATURE_COUNT).collect();
        features.shuffle(rng);

        let mut best: Option<(f64, usize, f64)> = None;
        for (tried, &feature) in features.iter().enumerate() {
            if tried >= params.max_features && best.is_some() {
                break;
            }
            if let Some((impurity, threshold)) = best_gini_split(x, y, &rows, feature) {
                if best.map_or(true, |(b, _, _)| impurity < b) {
                    best = Some((impurity, feature, threshold));
                }
            }
        }

        let Some((_, feature, threshold)) = best else {
            return self.push_leaf(fraction);
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
            rows.into_iter().partition(|&i| x[i].values[feature] <= threshold);

        let at = self.push_leaf(fraction);
        let left = self.grow_gini(x, y, left_rows, depth + 1, params, rng);
        let right = self.grow_gini(x, y, right_rows, depth + 1, params, rng);
        self.nodes[at] = Node::Split { feature, threshold, left, right };
        at
    }

    fn grow_gradient(
        &mut self,
        x: &[FeatureVector],
        grad: &[f64],
        hess: &[f64],
        rows: Vec<usize>,
        depth: usize,
        params: &GradientParams,
    ) -> usize {
        let g: f64 = rows.iter().map(|&i| grad[i]).sum();
        let h: f64 = rows.iter().map(|&i| hess[i]).sum();
        let weight = -g / (h + params.lambda) * params.leaf_scale;

        if depth >= params.max_depth || rows.len() < 2 {
            return self.push_leaf(weight);
        }

        let parent_score = g * g / (h + params.lambda);
        let mut best: Option<(f64, usize, f64)> = None;

        for feature in 0..FEATURE_COUNT {
            let sorted = sorted_by_feature(x, &rows, feature);
            let (mut gl, mut hl) = (0.0, 0.0);

            for w in 0..sorted.len() - 1 {
                let i = sorted[w];
                gl += grad[i];
                hl += hess[i];

                let here = x[i].values[feature];
                let next = x[sorted[w + 1]].values[feature];
                if here == next {
                    continue;
                }

                let (gr, hr) = (g - gl, h - hl);
                if hl < params.min_child_weight || hr < params.min_child_weight {
                    continue;
                }

                let gain = 0.5
                    * (gl * gl / (hl + params.lambda) + gr * gr / (hr + params.lambda)
                        - parent_score);
                if gain > MIN_SPLIT_GAIN && best.map_or(true, |(b, _, _)| gain > b) {
                    best = Some((gain, feature, (here + next) / 2.0));
                }
            }
        }

        let Some((_, feature, threshold)) = best else {
            return self.push_leaf(weight);
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
            rows.into_iter().partition(|&i| x[i].values[feature] <= threshold);

        let at = self.push_leaf(weight);
        let left = self.grow_gradient(x, grad, hess, left_rows, depth + 1, params);
        let right = self.grow_gradient(x, grad, hess, right_rows, depth + 1, params);
        self.nodes[at] = Node::Split { feature, threshold, left, right };
        at
    }
}

/// Gini tree settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiniParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub max_features: usize,
}

/// Gradient tree settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientParams {
    pub max_depth: usize,
    pub lambda: f64,
    pub min_child_weight: f64,
    /// Learning rate folded into the leaf values
    pub leaf_scale: f64,
}

fn sorted_by_feature(x: &[FeatureVector], rows: &[usize], feature: usize) -> Vec<usize> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|&a, &b| x[a].values[feature].total_cmp(&x[b].values[feature]));
    sorted
}

/// Lowest weighted child Gini impurity for one feature, with its threshold
fn best_gini_split(x: &[FeatureVector], y: &[f64], rows: &[usize], feature: usize) -> Option<(f64, f64)> {
    let sorted = sorted_by_feature(x, rows, feature);
    let n = sorted.len() as f64;
    let total_pos: f64 = sorted.iter().map(|&i| y[i]).sum();

    let gini = |count: f64, pos: f64| {
        if count == 0.0 {
            return 0.0;
        }
        let p = pos / count;
        2.0 * p * (1.0 - p)
    };

    let mut best: Option<(f64, f64)> = None;
    let mut left_pos = 0.0;

    for w in 0..sorted.len().saturating_sub(1) {
        let i = sorted[w];
        left_pos += y[i];

        let here = x[i].values[feature];
        let next = x[sorted[w + 1]].values[feature];
        if here == next {
            continue;
        }

        let left_n = (w + 1) as f64;
        let right_n = n - left_n;
        let impurity = (left_n * gini(left_n, left_pos)
            + right_n * gini(right_n, total_pos - left_pos))
            / n;

        if best.map_or(true, |(b, _)| impurity < b) {
            best = Some((impurity, (here + next) / 2.0));
        }
    }

    best
}
