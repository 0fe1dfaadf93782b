//! Feature Vector - Core data structure for model input
//!
//! Order is fixed by `layout::FEATURE_LAYOUT`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::layout::{FEATURE_COUNT, FEATURE_LAYOUT};

/// Fixed-order numeric encoding of one event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FeatureVector {
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Raw bit patterns, for exact equality checks
    #[cfg(test)]
    pub fn to_bits(&self) -> [u64; FEATURE_COUNT] {
        self.values.map(f64::to_bits)
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::from_values(values)
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in FEATURE_LAYOUT.iter().zip(self.values.iter()).enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}={:.4}", name, value)?;
        }
        Ok(())
    }
}
