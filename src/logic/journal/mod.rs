//! Journal Module - Attack Journal Writer
//!
//! Mỗi ngày (UTC) một file `events_attack_YYYY-MM-DD.json` chứa JSON array
//! các event bị model đánh dấu attack.
//! Append = đọc cả file, thêm phần tử, ghi lại cả file. Chỉ một writer mỗi ngày.

pub mod record;

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::constants::JOURNAL_PREFIX;

pub use record::PredictionRecord;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Journal IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Journal {} is not a JSON array of records: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to encode journal: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Date-partitioned attack journal
#[derive(Debug, Clone)]
pub struct JournalWriter {
    dir: PathBuf,
}

impl JournalWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Collection file for one UTC day
    pub fn path_for(&self, day: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}{}.json", JOURNAL_PREFIX, day.format("%Y-%m-%d")))
    }

    /// Create the day's collection as an empty array if it does not exist yet
    pub fn ensure(&self, day: NaiveDate) -> Result<PathBuf, JournalError> {
        let path = self.path_for(day);
        if !path.exists() {
            fs::create_dir_all(&self.dir).map_err(|source| JournalError::Io { path: self.dir.clone(), source })?;
            fs::write(&path, b"[]").map_err(|source| JournalError::Io { path: path.clone(), source })?;
            log::info!("Created attack journal {}", path.display());
        }
        Ok(path)
    }

    /// Read the whole collection for a day (empty if absent)
    pub fn read(&self, day: NaiveDate) -> Result<Vec<PredictionRecord>, JournalError> {
        let path = self.path_for(day);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read(&path).map_err(|source| JournalError::Io { path: path.clone(), source })?;
        serde_json::from_slice(&data).map_err(|source| JournalError::Corrupt { path, source })
    }

    /// Append records in one read-modify-write. No deduplication.
    /// Returns the new collection size.
    pub fn append_all(&self, day: NaiveDate, records: &[PredictionRecord]) -> Result<usize, JournalError> {
        let path = self.ensure(day)?;
        let mut entries = self.read(day)?;
        entries.extend_from_slice(records);

        let json = serde_json::to_vec_pretty(&entries)?;
        fs::write(&path, json).map_err(|source| JournalError::Io { path: path.clone(), source })?;

        log::debug!("Appended {} records to {} ({} total)", records.len(), path.display(), entries.len());
        Ok(entries.len())
    }

    /// Append only the records predicted as attacks
    pub fn record_attacks(&self, day: NaiveDate, records: &[PredictionRecord]) -> Result<usize, JournalError> {
        let attacks: Vec<PredictionRecord> = records.iter().filter(|r| r.attack).cloned().collect();
        if attacks.is_empty() {
            log::info!("No attack events to journal for {}", day);
            return Ok(0);
        }
        self.append_all(day, &attacks)?;
        log::info!("Journaled {} attack events for {}", attacks.len(), day);
        Ok(attacks.len())
    }
}
