use serde::{Deserialize, Serialize};

use crate::logic::features::FeatureVector;
use crate::logic::labeling::Label;

/// A feature vector paired with its heuristic label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub features: FeatureVector,
    pub label: Label,
}

impl LabeledSample {
    pub fn new(features: FeatureVector, label: Label) -> Self {
        Self { features, label }
    }
}

/// Per-class counts of a sample set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassCounts {
    pub benign: usize,
    pub attack: usize,
}

impl ClassCounts {
    pub fn of(samples: &[LabeledSample]) -> Self {
        let attack = samples.iter().filter(|s| s.label.is_attack()).count();
        Self {
            benign: samples.len() - attack,
            attack,
        }
    }
}
