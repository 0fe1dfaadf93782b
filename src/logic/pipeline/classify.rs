use std::fs;
use std::path::Path;

use serde::Serialize;
use uuid::Uuid;

use super::PipelineError;
use crate::logic::events::{load_events, Event};
use crate::logic::features::Preprocessor;
use crate::logic::journal::PredictionRecord;
use crate::logic::labeling::label;
use crate::logic::model::{ArtifactKind, ArtifactStore, Classifier, Evaluation, LoadedArtifact};

/// Summary of one classification batch
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationReport {
    /// Training run the model came from
    pub model_run: Uuid,
    pub events: usize,
    /// Malformed rows dropped while loading
    pub skipped: usize,
    /// Events with at least one categorical value unseen at training time
    pub unseen: usize,
    pub attacks: usize,
    /// Model verdicts scored against heuristic verdicts
    pub agreement: Evaluation,
    #[serde(skip)]
    pub records: Vec<PredictionRecord>,
}

/// Predict every event with an already-fitted preprocessor and model.
///
/// The preprocessor is the one persisted at training time; it is never
/// refit on the batch being classified.
pub fn classify_events(
    events: &[Event],
    preprocessor: &Preprocessor,
    model: &dyn Classifier,
) -> (Vec<PredictionRecord>, Evaluation, usize) {
    let (vectors, unseen) = preprocessor.transform_batch(events);

    let mut records = Vec::with_capacity(events.len());
    let mut pairs = Vec::with_capacity(events.len());
    for (event, x) in events.iter().zip(&vectors) {
        log::trace!("{} -> [{}]", event.event_id, x);
        let predicted = model.predict(x);
        pairs.push((label(&event.message), predicted));
        records.push(PredictionRecord::new(event, predicted));
    }

    let agreement = Evaluation::from_labels(model.name(), pairs);
    (records, agreement, unseen)
}

/// Classify an event table with one persisted artifact.
///
/// The artifact is loaded before the table so a missing model fails fast.
pub fn classify(table: &Path, store: &ArtifactStore, kind: ArtifactKind) -> Result<ClassificationReport, PipelineError> {
    match kind {
        ArtifactKind::Svm => classify_table(table, &store.load_svm()?),
        ArtifactKind::GradientBoosting => classify_table(table, &store.load_xgb()?),
        ArtifactKind::RandomForest => classify_table(table, &store.load_rf()?),
        ArtifactKind::Voting => classify_table(table, &store.load_ensemble()?),
    }
}

fn classify_table<M: Classifier>(table: &Path, model: &LoadedArtifact<M>) -> Result<ClassificationReport, PipelineError> {
    let loaded = load_events(table)?;
    let mut report = classify_loaded(&loaded.events, model);
    report.skipped = loaded.skipped;
    Ok(report)
}

pub(crate) fn classify_loaded<M: Classifier>(events: &[Event], model: &LoadedArtifact<M>) -> ClassificationReport {
    log::info!(
        "Using {} model from run {} (trained {})",
        model.model.name(),
        model.run_id,
        model.created_at.to_rfc3339()
    );

    let (records, agreement, unseen) = classify_events(events, &model.preprocessor, &model.model);
    let attacks = records.iter().filter(|r| r.attack).count();

    if unseen > 0 {
        log::warn!("{} of {} events carried categories unseen at training time", unseen, events.len());
    }
    log::info!(
        "Classified {} events: {} attack, accuracy vs heuristic {:.4}",
        records.len(),
        attacks,
        agreement.accuracy
    );

    ClassificationReport {
        model_run: model.run_id,
        events: events.len(),
        skipped: 0,
        unseen,
        attacks,
        agreement,
        records,
    }
}

/// Write prediction records as a pretty JSON array
pub fn write_predictions(path: &Path, records: &[PredictionRecord]) -> Result<(), PipelineError> {
    let io_err = |source| PipelineError::Predictions { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_vec_pretty(records)?;
    fs::write(path, json).map_err(io_err)?;

    log::info!("Wrote {} predictions to {}", records.len(), path.display());
    Ok(())
}

pub fn read_predictions(path: &Path) -> Result<Vec<PredictionRecord>, PipelineError> {
    let data = fs::read(path).map_err(|source| PipelineError::Predictions { path: path.to_path_buf(), source })?;
    Ok(serde_json::from_slice(&data)?)
}
