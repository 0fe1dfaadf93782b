//! Events Module - Sanitized Honeypot Event Table
//!
//! Đọc/ghi bảng sự kiện 13 cột do bộ sanitize sinh ra.
//! Dòng lỗi bị bỏ qua và đếm lại, không bao giờ dừng cả batch.

pub mod record;
pub mod loader;
pub mod timestamp;


use thiserror::Error;

pub use record::{Event, EVENT_COLUMNS};
pub use loader::{load_events, save_events};
pub use timestamp::parse_timestamp;

/// Event table errors
#[derive(Error, Debug)]
pub enum EventError {
    /// A single row could not be turned into an Event
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// A timestamp did not parse as an absolute instant
    #[error("Timestamp parse failure for '{raw}': {reason}")]
    Timestamp { raw: String, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
