use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::classify::{classify_loaded, write_predictions, ClassificationReport};
use super::PipelineError;
use crate::logic::config::PipelineConfig;
use crate::logic::events::load_events;
use crate::logic::journal::JournalWriter;
use crate::logic::model::ArtifactStore;
use crate::logic::window::select_recent_minutes;

/// Summary of one window → classify → journal pass
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub now: DateTime<Utc>,
    /// Oldest instant inside the classified window
    pub window_start: DateTime<Utc>,
    pub loaded: usize,
    /// Malformed rows dropped while loading
    pub skipped_rows: usize,
    /// Events passed over by the window scan (unparseable timestamp)
    pub skipped_timestamps: usize,
    pub classification: ClassificationReport,
    pub predictions: PathBuf,
    pub journal: PathBuf,
    pub journaled: usize,
}

/// The scheduled job: classify the trailing window and journal its attacks.
///
/// The artifact is loaded before anything else so a missing model halts the
/// run without touching the journal.
pub fn run(
    table: &Path,
    predictions: &Path,
    config: &PipelineConfig,
    now: DateTime<Utc>,
) -> Result<RunReport, PipelineError> {
    config.validate()?;
    let model = ArtifactStore::new(&config.model_dir).load_ensemble()?;

    let loaded = load_events(table)?;
    let window = select_recent_minutes(&loaded.events, now, config.window_minutes);

    let mut classification = classify_loaded(&window.events, &model);
    classification.skipped = loaded.skipped;
    write_predictions(predictions, &classification.records)?;

    let journal = JournalWriter::new(&config.journal_dir);
    let day = now.date_naive();
    let journaled = journal.record_attacks(day, &classification.records)?;

    Ok(RunReport {
        now,
        window_start: window.cutoff,
        loaded: loaded.events.len(),
        skipped_rows: loaded.skipped,
        skipped_timestamps: window.skipped,
        classification,
        predictions: predictions.to_path_buf(),
        journal: journal.path_for(day),
        journaled,
    })
}
