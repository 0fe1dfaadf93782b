use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use super::PipelineError;
use crate::constants::MIN_CLASS_EXAMPLES;
use crate::logic::config::PipelineConfig;
use crate::logic::dataset::{balance, stratified_split, ClassCounts, LabeledSample};
use crate::logic::events::{load_events, Event};
use crate::logic::features::{CategoricalEncoder, FeatureVector, LayoutInfo, Preprocessor, StandardScaler};
use crate::logic::labeling::label;
use crate::logic::model::{evaluate, ArtifactStore, EnsembleParams, Evaluation, SoftVotingEnsemble, TrainingError};

/// Summary of one training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub run_id: Uuid,
    pub events: usize,
    /// Malformed rows dropped while loading
    pub skipped: usize,
    /// Heuristic label counts before balancing
    pub labeled: ClassCounts,
    pub balanced: ClassCounts,
    pub train_rows: usize,
    pub validation_rows: usize,
    /// One entry per base model, then the ensemble
    pub evaluations: Vec<Evaluation>,
    pub artifacts: Vec<PathBuf>,
}

/// In-memory result of fitting, before persistence
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub preprocessor: Preprocessor,
    pub ensemble: SoftVotingEnsemble,
    pub report: TrainingReport,
}

/// Fit preprocessor and ensemble on labeled-by-heuristic events.
///
/// The encoder is fit on every event, the scaler on the balanced raw
/// vectors. Both are frozen into the returned `Preprocessor`.
pub fn train_from_events(events: &[Event], config: &PipelineConfig) -> Result<TrainedModel, PipelineError> {
    config.validate()?;
    if events.is_empty() {
        return Err(TrainingError::EmptyInput("training events").into());
    }

    let layout = LayoutInfo::current();
    log::info!(
        "Feature layout v{} ({:08x}): {}",
        layout.version,
        layout.hash,
        layout.feature_names.join(", ")
    );

    let encoder = CategoricalEncoder::fit(events);
    let samples: Vec<LabeledSample> = events
        .iter()
        .map(|event| LabeledSample::new(encoder.encode(event), label(&event.message)))
        .collect();
    let labeled = ClassCounts::of(&samples);
    log::info!(
        "Heuristic labels: {} benign / {} attack over {} events",
        labeled.benign,
        labeled.attack,
        samples.len()
    );

    let balanced_raw = balance(&samples, config.seed);
    let balanced = ClassCounts::of(&balanced_raw);
    if balanced.benign < MIN_CLASS_EXAMPLES || balanced.attack < MIN_CLASS_EXAMPLES {
        return Err(TrainingError::DegenerateTrainingSet {
            benign: balanced.benign,
            attack: balanced.attack,
            required: MIN_CLASS_EXAMPLES,
        }
        .into());
    }

    let raw_vectors: Vec<FeatureVector> = balanced_raw.iter().map(|s| s.features).collect();
    let scaler = StandardScaler::fit(&raw_vectors)?;
    let scaled: Vec<LabeledSample> = balanced_raw
        .iter()
        .map(|s| LabeledSample::new(scaler.transform(&s.features), s.label))
        .collect();

    let split = stratified_split(&scaled, config.validation_fraction, config.seed);
    log::info!("Split: {} train / {} validation rows", split.train.len(), split.validation.len());

    let mut params = EnsembleParams::seeded(config.seed);
    params.svm.max_samples = config.svm_max_samples;
    let ensemble = SoftVotingEnsemble::fit(&split.train, &params)?;

    let mut evaluations: Vec<Evaluation> = ensemble
        .members()
        .iter()
        .map(|member| evaluate(*member, &split.validation))
        .collect();
    evaluations.push(evaluate(&ensemble, &split.validation));
    for evaluation in &evaluations {
        log::info!("{} validation accuracy {:.4}\n{}", evaluation.model, evaluation.accuracy, evaluation);
    }

    let report = TrainingReport {
        run_id: Uuid::new_v4(),
        events: events.len(),
        skipped: 0,
        labeled,
        balanced,
        train_rows: split.train.len(),
        validation_rows: split.validation.len(),
        evaluations,
        artifacts: Vec::new(),
    };

    Ok(TrainedModel {
        preprocessor: Preprocessor::new(encoder, scaler),
        ensemble,
        report,
    })
}

/// Train from a sanitized event table and persist all four artifacts
pub fn train(table: &Path, config: &PipelineConfig) -> Result<TrainingReport, PipelineError> {
    let loaded = load_events(table)?;
    let trained = train_from_events(&loaded.events, config)?;

    let store = ArtifactStore::new(&config.model_dir);
    let mut report = trained.report;
    report.skipped = loaded.skipped;
    report.artifacts = store.save_all(report.run_id, &trained.preprocessor, &trained.ensemble)?;

    log::info!(
        "Training run {} complete: {} artifacts in {}",
        report.run_id,
        report.artifacts.len(),
        store.dir().display()
    );
    Ok(report)
}

impl TrainingReport {
    pub fn ensemble_evaluation(&self) -> Option<&Evaluation> {
        self.evaluations.iter().find(|e| e.model == "voting")
    }
}
