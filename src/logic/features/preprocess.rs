//! Preprocessor - fitted encoder + scaler pair
//!
//! Built once per training run, persisted in every artifact, passed
//! explicitly into inference. Never refit on an inference batch.

use serde::{Deserialize, Serialize};

use super::encoder::CategoricalEncoder;
use super::scaler::StandardScaler;
use super::vector::FeatureVector;
use crate::logic::events::Event;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    pub encoder: CategoricalEncoder,
    pub scaler: StandardScaler,
}

impl Preprocessor {
    pub fn new(encoder: CategoricalEncoder, scaler: StandardScaler) -> Self {
        Self { encoder, scaler }
    }

    /// Encode then standardize one event
    pub fn transform(&self, event: &Event) -> FeatureVector {
        self.scaler.transform(&self.encoder.encode(event))
    }

    /// Transform a batch and count events that hit the unknown bucket
    pub fn transform_batch(&self, events: &[Event]) -> (Vec<FeatureVector>, usize) {
        let mut unseen = 0;
        let vectors = events
            .iter()
            .map(|event| {
                if self.encoder.unseen_fields(event) > 0 {
                    unseen += 1;
                }
                self.transform(event)
            })
            .collect();
        (vectors, unseen)
    }
}
