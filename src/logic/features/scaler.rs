//! Standard Scaler
//!
//! Zero mean / unit variance, statistics frozen at fit time.

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use super::layout::FEATURE_COUNT;
use super::vector::FeatureVector;
use super::FeatureError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: [f64; FEATURE_COUNT],
    /// Population std per column; constant columns store 1.0
    pub scale: [f64; FEATURE_COUNT],
    pub samples: usize,
}

impl StandardScaler {
    pub fn fit(vectors: &[FeatureVector]) -> Result<Self, FeatureError> {
        if vectors.is_empty() {
            return Err(FeatureError::EmptyInput("scaler fit"));
        }

        let flat: Vec<f64> = vectors.iter().flat_map(|v| v.values).collect();
        let matrix = Array2::from_shape_vec((vectors.len(), FEATURE_COUNT), flat)
            .map_err(|e| FeatureError::Shape(e.to_string()))?;

        let means = matrix
            .mean_axis(Axis(0))
            .ok_or(FeatureError::EmptyInput("scaler fit"))?;
        let stds = matrix.std_axis(Axis(0), 0.0);

        let mut mean = [0.0; FEATURE_COUNT];
        let mut scale = [1.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            mean[i] = means[i];
            if stds[i] > f64::EPSILON {
                scale[i] = stds[i];
            }
        }

        Ok(Self { mean, scale, samples: vectors.len() })
    }

    pub fn transform(&self, vector: &FeatureVector) -> FeatureVector {
        let mut values = [0.0; FEATURE_COUNT];
        for (i, value) in values.iter_mut().enumerate() {
            *value = (vector.values[i] - self.mean[i]) / self.scale[i];
        }
        FeatureVector::from_values(values)
    }
}
