//! Features Module - Feature Encoding Engine
//!
//! Tách logic mã hoá features khỏi labeling và model.
//! Encoder + scaler được fit một lần, sau đó chỉ đọc.

pub mod layout;
pub mod vector;
pub mod encoder;
pub mod scaler;
pub mod preprocess;

#[cfg(test)]
mod tests;

use thiserror::Error;

// Re-export common types
pub use layout::{LayoutInfo, LayoutMismatchError, FEATURE_COUNT};
pub use vector::FeatureVector;
pub use encoder::CategoricalEncoder;
pub use scaler::StandardScaler;
pub use preprocess::Preprocessor;

#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("Empty input for {0}")]
    EmptyInput(&'static str),

    #[error("Feature matrix shape error: {0}")]
    Shape(String),
}
