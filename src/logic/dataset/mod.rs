//! Dataset Module - Training Set Construction
//!
//! Ghép feature vector với nhãn heuristic, cân bằng lớp và chia train/validation.

pub mod sample;
pub mod balance;
pub mod split;

pub use sample::{ClassCounts, LabeledSample};
pub use balance::balance;
pub use split::stratified_split;
