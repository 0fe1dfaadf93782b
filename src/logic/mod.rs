//! Logic Module - Business Logic & Engines
//!
//! Chứa các engine của pipeline phân loại sự kiện honeypot.
//!
//! ## Architecture
//! - `events/` - Sanitized event table (load/save, timestamp parsing)
//! - `sanitize/` - Raw JSON-lines log → event table
//! - `labeling/` - Heuristic ground-truth labels
//! - `features/` - Categorical encoder + scaler (Preprocessor)
//! - `dataset/` - Class balancing, stratified split
//! - `model/` - SVM, gradient boosting, random forest, soft voting, artifacts
//! - `window/` - Trailing time-window selection
//! - `journal/` - Per-day attack journal
//! - `pipeline/` - Train / classify / run jobs

pub mod config;

// Engines
pub mod events;
pub mod sanitize;
pub mod labeling;
pub mod features;
pub mod dataset;
pub mod model;
pub mod window;
pub mod journal;

// Batch jobs
pub mod pipeline;
