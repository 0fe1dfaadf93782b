//! Labeling Module
//!
//! Heuristic gán nhãn ground-truth cho training từ nội dung message.
//!
//! ## Structure
//! - `types`: Label, MatchedRule
//! - `rules`: whitelist, keywords, failed-login pattern
//! - `classifier`: precedence logic
//!
//! ## Usage
//! ```ignore
//! use crate::logic::labeling::{label, Label};
//!
//! assert_eq!(label("login attempt [root/12345] failed"), Label::Attack);
//! ```

pub mod types;
pub mod rules;
pub mod classifier;

pub use types::Label;
pub use classifier::{explain, label};
