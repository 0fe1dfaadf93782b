//! Sanitize Module - Raw Honeypot Log Ingestion
//!
//! Chuyển log JSON-lines thô của honeypot sang bảng 13 cột (có header).
//! Dòng không decode được thì log lại và bỏ qua.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use serde_json::{Map, Value};

use crate::logic::events::{EventError, EVENT_COLUMNS};

/// Counts for one sanitize run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SanitizeReport {
    pub written: usize,
    pub skipped: usize,
}

/// Render one JSON value as a table cell. Missing and null become empty.
fn cell(entry: &Map<String, Value>, key: &str) -> String {
    match entry.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Convert JSON-lines from `reader` and append rows to `writer`
pub fn sanitize_reader<R: BufRead, W: Write>(
    reader: R,
    source: &str,
    writer: &mut csv::Writer<W>,
) -> Result<SanitizeReport, EventError> {
    let mut report = SanitizeReport::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let entry = match serde_json::from_str::<Value>(&line) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                log::warn!("{}:{}: not a JSON object, skipped", source, line_no + 1);
                report.skipped += 1;
                continue;
            }
            Err(e) => {
                log::warn!("Error decoding JSON in {}:{}: {}", source, line_no + 1, e);
                report.skipped += 1;
                continue;
            }
        };

        let row: Vec<String> = EVENT_COLUMNS.iter().map(|key| cell(&entry, key)).collect();
        writer.write_record(&row)?;
        report.written += 1;
    }

    Ok(report)
}

/// Sanitize several raw log files into one table with a header row
pub fn sanitize_jsonl(inputs: &[PathBuf], output: &Path) -> Result<SanitizeReport, EventError> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new().from_path(output)?;
    writer.write_record(EVENT_COLUMNS)?;

    let mut total = SanitizeReport::default();
    for input in inputs {
        let file = File::open(input)?;
        let report = sanitize_reader(BufReader::new(file), &input.display().to_string(), &mut writer)?;
        log::info!(
            "Sanitized {}: {} rows written, {} lines skipped",
            input.display(),
            report.written,
            report.skipped
        );
        total.written += report.written;
        total.skipped += report.skipped;
    }

    writer.flush()?;
    Ok(total)
}
