use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use super::record::{is_header, Event, EVENT_COLUMNS};
use super::EventError;

/// Result of reading one event table
#[derive(Debug, Default)]
pub struct LoadReport {
    pub events: Vec<Event>,
    /// Rows dropped as malformed
    pub skipped: usize,
}

/// Load the sanitized event table from disk
pub fn load_events(path: &Path) -> Result<LoadReport, EventError> {
    let file = File::open(path)?;
    let report = read_events(file)?;
    log::info!(
        "Loaded {} events from {} ({} malformed rows skipped)",
        report.events.len(),
        path.display(),
        report.skipped
    );
    Ok(report)
}

/// Read events from any CSV source.
///
/// Malformed rows are skipped and counted, never fatal.
pub fn read_events<R: Read>(source: R) -> Result<LoadReport, EventError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);

    let mut report = LoadReport::default();

    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping unreadable row {}: {}", line + 1, e);
                report.skipped += 1;
                continue;
            }
        };

        if line == 0 && is_header(&record) {
            continue;
        }

        match Event::from_record(&record) {
            Ok(event) => report.events.push(event),
            Err(e) => {
                log::warn!("Skipping row {}: {}", line + 1, e);
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}

/// Write events as a table with a header row
pub fn write_events<W: Write>(sink: W, events: &[Event]) -> Result<(), EventError> {
    let mut writer = WriterBuilder::new().from_writer(sink);
    writer.write_record(EVENT_COLUMNS)?;
    for event in events {
        writer.write_record(event.to_row())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write events to a file, replacing it
pub fn save_events(path: &Path, events: &[Event]) -> Result<(), EventError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    write_events(file, events)
}
