//! Pipeline Integration Tests

use std::path::Path;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::tempdir;

use super::classify::classify_events;
use super::train::train_from_events;
use super::*;
use crate::constants::{RF_ARTIFACT, SVM_ARTIFACT, VOTING_ARTIFACT, XGB_ARTIFACT};
use crate::logic::config::{ConfigError, PipelineConfig};
use crate::logic::events::{save_events, Event};
use crate::logic::journal::JournalWriter;
use crate::logic::model::{ArtifactKind, ArtifactStore, Classifier, TrainingError};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 13, 12, 0, 0).unwrap()
}

fn event(event_id: &str, message: &str, minutes_ago: i64) -> Event {
    Event {
        event_id: event_id.into(),
        source_ip: "203.0.113.9".into(),
        source_port: Some(50122),
        dest_ip: "10.0.0.2".into(),
        dest_port: Some(2222),
        session_id: format!("s{}", minutes_ago),
        protocol: "ssh".into(),
        message: message.into(),
        sensor_id: "hp-1".into(),
        timestamp: (now() - Duration::minutes(minutes_ago)).to_rfc3339(),
        ..Default::default()
    }
}

/// 30 attack and 60 benign events, separable by event id
fn corpus() -> Vec<Event> {
    let mut events = Vec::new();
    for i in 0..30 {
        events.push(event("cowrie.session.connect", "New connection: 203.0.113.9:50122", 200 - i));
        events.push(event("cowrie.command.input", "CMD: uname -a", 200 - i));
        events.push(event("cowrie.session.closed", "Connection lost after 3 seconds", 200 - i));
    }
    for i in 0..15 {
        events[i * 3 + 1] = event("cowrie.login.failed", "login attempt [root/123456] failed", 200 - i as i64);
    }
    events
}

fn config(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        model_dir: dir.join("models"),
        journal_dir: dir.join("attacks"),
        ..PipelineConfig::default()
    }
}

#[test]
fn test_train_separates_event_types() {
    let dir = tempdir().unwrap();
    let trained = train_from_events(&corpus(), &config(dir.path())).unwrap();

    assert_eq!(trained.report.labeled.attack, 30);
    assert_eq!(trained.report.labeled.benign, 60);
    assert_eq!(trained.report.balanced.benign, 30);
    assert_eq!(trained.report.balanced.attack, 30);
    assert_eq!(trained.report.train_rows + trained.report.validation_rows, 60);
    assert_eq!(trained.report.evaluations.len(), 4);

    let voting = trained.report.ensemble_evaluation().unwrap();
    assert!(voting.accuracy >= 0.9, "accuracy {}", voting.accuracy);
}

#[test]
fn test_single_class_is_degenerate() {
    let dir = tempdir().unwrap();
    let benign: Vec<Event> = (0..10)
        .map(|i| event("cowrie.session.connect", "New connection: 1.2.3.4:22", i))
        .collect();

    match train_from_events(&benign, &config(dir.path())) {
        Err(PipelineError::Training(TrainingError::DegenerateTrainingSet { attack, required, .. })) => {
            assert_eq!(attack, 0);
            assert_eq!(required, 2);
        }
        other => panic!("expected degenerate set, got {:?}", other.map(|t| t.report.run_id)),
    }
}

#[test]
fn test_one_attack_is_degenerate() {
    let dir = tempdir().unwrap();
    let mut events: Vec<Event> = (0..10)
        .map(|i| event("cowrie.session.connect", "New connection: 1.2.3.4:22", i))
        .collect();
    events.push(event("cowrie.command.input", "CMD: whoami", 0));

    assert!(matches!(
        train_from_events(&events, &config(dir.path())),
        Err(PipelineError::Training(TrainingError::DegenerateTrainingSet { attack: 1, .. }))
    ));
}

#[test]
fn test_empty_training_input() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        train_from_events(&[], &config(dir.path())),
        Err(PipelineError::Training(TrainingError::EmptyInput(_)))
    ));
}

#[test]
fn test_zero_svm_row_cap_rejected_before_training() {
    let dir = tempdir().unwrap();
    let cfg = PipelineConfig { svm_max_samples: 0, ..config(dir.path()) };

    assert!(matches!(
        train_from_events(&corpus(), &cfg),
        Err(PipelineError::Config(ConfigError::SvmMaxSamples))
    ));
}

#[test]
fn test_out_of_range_validation_fraction_rejected() {
    let dir = tempdir().unwrap();
    let cfg = PipelineConfig { validation_fraction: 1.0, ..config(dir.path()) };

    assert!(matches!(
        train_from_events(&corpus(), &cfg),
        Err(PipelineError::Config(ConfigError::ValidationFraction(_)))
    ));
}

#[test]
fn test_train_persists_then_classify_reuses_preprocessor() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path());
    let table = dir.path().join("sanitized.csv");
    save_events(&table, &corpus()).unwrap();

    let report = train(&table, &cfg).unwrap();
    assert_eq!(report.artifacts.len(), 4);
    for (path, name) in report.artifacts.iter().zip([SVM_ARTIFACT, XGB_ARTIFACT, RF_ARTIFACT, VOTING_ARTIFACT]) {
        assert!(path.ends_with(name), "{} is not {}", path.display(), name);
        assert!(path.exists(), "{} missing", name);
    }
    let store = ArtifactStore::new(&cfg.model_dir);

    // one known attack, one known benign, one event id never seen in training
    let batch = vec![
        event("cowrie.command.input", "CMD: uname -a", 1),
        event("cowrie.session.connect", "New connection: 198.51.100.7:41000", 1),
        event("cowrie.direct-tcpip.request", "direct-tcp connection request", 1),
    ];
    let batch_table = dir.path().join("latest.csv");
    save_events(&batch_table, &batch).unwrap();

    let result = classify(&batch_table, &store, ArtifactKind::Voting).unwrap();
    assert_eq!(result.model_run, report.run_id);
    assert_eq!(result.records.len(), 3);
    assert_eq!(result.unseen, 1);
    assert!(result.records[0].attack);
    assert!(!result.records[1].attack);

    // a single-event batch gets the same verdict as inside the larger batch
    let model = store.load_ensemble().unwrap();
    let (alone, _, _) = classify_events(&batch[..1], &model.preprocessor, &model.model);
    assert_eq!(alone[0].attack, result.records[0].attack);
}

#[test]
fn test_every_artifact_loads_on_its_own() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path());
    let table = dir.path().join("sanitized.csv");
    save_events(&table, &corpus()).unwrap();
    let report = train(&table, &cfg).unwrap();

    // each load re-hashes the payload and rejects a checksum mismatch
    let store = ArtifactStore::new(&cfg.model_dir);
    let voting = store.load_ensemble().unwrap();
    let svm = store.load_svm().unwrap();
    let xgb = store.load_xgb().unwrap();
    let rf = store.load_rf().unwrap();

    for run_id in [svm.run_id, xgb.run_id, rf.run_id, voting.run_id] {
        assert_eq!(run_id, report.run_id);
    }
    assert_eq!(svm.preprocessor, voting.preprocessor);
    assert_eq!(xgb.preprocessor, voting.preprocessor);
    assert_eq!(rf.preprocessor, voting.preprocessor);

    let mut samples = corpus();
    samples.push(event("cowrie.direct-tcpip.request", "direct-tcp connection request", 1));
    for sample in &samples {
        let x = voting.preprocessor.transform(sample);
        let mean = (svm.model.predict_proba(&x) + xgb.model.predict_proba(&x) + rf.model.predict_proba(&x)) / 3.0;
        assert!(
            (voting.model.predict_proba(&x) - mean).abs() < 1e-12,
            "{}: voting {} vs member mean {}",
            sample.event_id,
            voting.model.predict_proba(&x),
            mean
        );
    }
}

#[test]
fn test_classify_with_single_base_model() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path());
    let table = dir.path().join("sanitized.csv");
    save_events(&table, &corpus()).unwrap();
    train(&table, &cfg).unwrap();

    let store = ArtifactStore::new(&cfg.model_dir);
    for (kind, name) in [
        (ArtifactKind::Svm, "svm"),
        (ArtifactKind::GradientBoosting, "xgb"),
        (ArtifactKind::RandomForest, "rf"),
    ] {
        let result = classify(&table, &store, kind).unwrap();
        assert_eq!(result.agreement.model, name);
        assert_eq!(result.records.len(), 90);
    }
}

#[test]
fn test_agreement_scores_model_against_heuristic() {
    let dir = tempdir().unwrap();
    let trained = train_from_events(&corpus(), &config(dir.path())).unwrap();

    // heuristic says attack (keyword), the model only sees a benign event id
    let disputed = vec![event("cowrie.session.connect", "CMD: whoami", 1)];
    let (records, agreement, _) = classify_events(&disputed, &trained.preprocessor, &trained.ensemble);

    assert!(!records[0].attack);
    assert_eq!(agreement.model, "voting");
    assert_eq!(agreement.confusion.false_negative, 1);
    assert_eq!(agreement.accuracy, 0.0);
}

#[test]
fn test_classify_without_artifact_fails() {
    let dir = tempdir().unwrap();
    let table = dir.path().join("latest.csv");
    save_events(&table, &corpus()).unwrap();

    let store = ArtifactStore::new(dir.path().join("empty"));
    assert!(matches!(classify(&table, &store, ArtifactKind::Voting), Err(PipelineError::Artifact(_))));
    assert!(matches!(classify(&table, &store, ArtifactKind::Svm), Err(PipelineError::Artifact(_))));
}

#[test]
fn test_predictions_written_as_array() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out").join("predictions.json");
    let records = vec![
        crate::logic::journal::PredictionRecord::new(
            &event("cowrie.command.input", "CMD: uname -a", 1),
            crate::logic::labeling::Label::Attack,
        ),
    ];

    write_predictions(&path, &records).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.trim_start().starts_with('['));
    assert!(text.contains("\"attack\": true"));
    assert!(!text.contains("hasshAlgorithms"));
    assert_eq!(read_predictions(&path).unwrap(), records);
}

#[test]
fn test_run_journals_recent_attacks_only() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path());
    let table = dir.path().join("sanitized.csv");
    save_events(&table, &corpus()).unwrap();
    train(&table, &cfg).unwrap();

    // corpus is 170+ minutes old; append a recent tail
    let mut log = corpus();
    log.push(event("cowrie.session.connect", "New connection: 198.51.100.7:41000", 10));
    log.push(event("cowrie.command.input", "CMD: cat /etc/passwd", 5));
    log.push(event("cowrie.session.closed", "Connection lost after 9 seconds", 1));
    let latest = dir.path().join("today.csv");
    save_events(&latest, &log).unwrap();

    let predictions = dir.path().join("latest_predictions.json");
    let report = run(&latest, &predictions, &cfg, now()).unwrap();

    assert_eq!(report.loaded, 93);
    assert_eq!(report.classification.events, 3);
    assert_eq!(report.journaled, report.classification.attacks);
    assert_eq!(read_predictions(&predictions).unwrap().len(), 3);

    let journal = JournalWriter::new(&cfg.journal_dir);
    assert_eq!(report.journal, journal.path_for(now().date_naive()));
    let entries = journal.read(now().date_naive()).unwrap();
    assert_eq!(entries.len(), report.journaled);
    assert!(entries.iter().any(|r| r.message == "CMD: cat /etc/passwd"));
}

#[test]
fn test_run_with_oversized_window_keeps_everything() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path());
    let table = dir.path().join("sanitized.csv");
    save_events(&table, &corpus()).unwrap();
    train(&table, &cfg).unwrap();

    let wide = PipelineConfig { window_minutes: i64::MAX, ..cfg };
    let predictions = dir.path().join("latest_predictions.json");
    let report = run(&table, &predictions, &wide, now()).unwrap();

    assert_eq!(report.classification.events, 90);
    assert_eq!(report.window_start, DateTime::<Utc>::MIN_UTC);
}

#[test]
fn test_run_rejects_non_positive_window() {
    let dir = tempdir().unwrap();
    let cfg = PipelineConfig { window_minutes: 0, ..config(dir.path()) };
    let predictions = dir.path().join("latest_predictions.json");

    assert!(matches!(
        run(&dir.path().join("missing.csv"), &predictions, &cfg, now()),
        Err(PipelineError::Config(ConfigError::WindowMinutes(0)))
    ));
    assert!(!predictions.exists());
}
