//! Model Artifact Store
//!
//! Bốn artifact JSON (svm, xgb, rf, voting), mỗi cái tự load được:
//! preprocessor + model + layout version/hash + SHA-256 checksum.
//! Ghi vào file tạm rồi rename để reader không bao giờ thấy file dở dang.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use super::boosting::GradientBoostingClassifier;
use super::ensemble::SoftVotingEnsemble;
use super::forest::RandomForestClassifier;
use super::svm::SvmClassifier;
use crate::constants::{APP_VERSION, RF_ARTIFACT, SVM_ARTIFACT, VOTING_ARTIFACT, XGB_ARTIFACT};
use crate::logic::features::layout::{layout_hash, validate_layout, FEATURE_VERSION};
use crate::logic::features::{LayoutMismatchError, Preprocessor};

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    Svm,
    GradientBoosting,
    RandomForest,
    Voting,
}

impl ArtifactKind {
    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::Svm => SVM_ARTIFACT,
            ArtifactKind::GradientBoosting => XGB_ARTIFACT,
            ArtifactKind::RandomForest => RF_ARTIFACT,
            ArtifactKind::Voting => VOTING_ARTIFACT,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Svm => "svm",
            ArtifactKind::GradientBoosting => "xgb",
            ArtifactKind::RandomForest => "rf",
            ArtifactKind::Voting => "voting",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactPayload<M> {
    pub preprocessor: Preprocessor,
    pub model: M,
}

#[derive(Serialize)]
struct PayloadRef<'a, M> {
    preprocessor: &'a Preprocessor,
    model: &'a M,
}

/// On-disk wrapper around one model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEnvelope<P> {
    pub kind: ArtifactKind,
    pub run_id: Uuid,
    pub app_version: String,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub created_at: DateTime<Utc>,
    /// Hex SHA-256 of the serialized payload
    pub checksum: String,
    pub payload: P,
}

/// A verified artifact, ready for inference
#[derive(Debug, Clone)]
pub struct LoadedArtifact<M> {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub preprocessor: Preprocessor,
    pub model: M,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Artifact '{artifact}' could not be loaded from {}: {reason}", .path.display())]
    LoadFailure {
        artifact: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("Artifact '{artifact}' at {} failed checksum: expected {expected}, got {actual}", .path.display())]
    ChecksumMismatch {
        artifact: &'static str,
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Artifact '{artifact}' at {} targets another feature layout: {source}", .path.display())]
    Layout {
        artifact: &'static str,
        path: PathBuf,
        source: LayoutMismatchError,
    },

    #[error("Failed to write artifact '{artifact}' to {}: {source}", .path.display())]
    Write {
        artifact: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize artifact '{artifact}': {source}")]
    Serialize {
        artifact: &'static str,
        source: serde_json::Error,
    },
}

fn checksum<P: Serialize>(payload: &P) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(payload)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

// ============================================================================
// STORE
// ============================================================================

/// Directory holding one training run's artifacts
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, kind: ArtifactKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Write one artifact atomically (temp file + rename)
    pub fn save<M: Serialize>(
        &self,
        kind: ArtifactKind,
        run_id: Uuid,
        preprocessor: &Preprocessor,
        model: &M,
    ) -> Result<PathBuf, ArtifactError> {
        let artifact = kind.label();
        let path = self.path(kind);
        let write_err = |source| ArtifactError::Write { artifact, path: path.clone(), source };

        let payload = PayloadRef { preprocessor, model };
        let envelope = ArtifactEnvelope {
            kind,
            run_id,
            app_version: APP_VERSION.to_string(),
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            created_at: Utc::now(),
            checksum: checksum(&payload).map_err(|source| ArtifactError::Serialize { artifact, source })?,
            payload,
        };
        let json = serde_json::to_vec_pretty(&envelope)
            .map_err(|source| ArtifactError::Serialize { artifact, source })?;

        fs::create_dir_all(&self.dir).map_err(write_err)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &path).map_err(write_err)?;

        log::info!("Saved {} artifact to {}", artifact, path.display());
        Ok(path)
    }

    /// Read, verify and decode one artifact
    pub fn load<M: Serialize + DeserializeOwned>(
        &self,
        kind: ArtifactKind,
    ) -> Result<LoadedArtifact<M>, ArtifactError> {
        let artifact = kind.label();
        let path = self.path(kind);
        let fail = |reason: String| ArtifactError::LoadFailure { artifact, path: path.clone(), reason };

        let data = fs::read(&path).map_err(|e| fail(e.to_string()))?;
        let envelope: ArtifactEnvelope<ArtifactPayload<M>> =
            serde_json::from_slice(&data).map_err(|e| fail(format!("decode error: {}", e)))?;

        if envelope.kind != kind {
            return Err(fail(format!("holds a {:?} artifact", envelope.kind)));
        }

        validate_layout(envelope.feature_version, envelope.layout_hash).map_err(|source| {
            ArtifactError::Layout { artifact, path: path.clone(), source }
        })?;

        let actual = checksum(&envelope.payload).map_err(|e| fail(e.to_string()))?;
        if actual != envelope.checksum {
            return Err(ArtifactError::ChecksumMismatch {
                artifact,
                path: path.clone(),
                expected: envelope.checksum,
                actual,
            });
        }

        log::debug!("Loaded {} artifact (run {})", artifact, envelope.run_id);

        Ok(LoadedArtifact {
            run_id: envelope.run_id,
            created_at: envelope.created_at,
            preprocessor: envelope.payload.preprocessor,
            model: envelope.payload.model,
        })
    }

    /// Persist all four artifacts of one training run
    pub fn save_all(
        &self,
        run_id: Uuid,
        preprocessor: &Preprocessor,
        ensemble: &SoftVotingEnsemble,
    ) -> Result<Vec<PathBuf>, ArtifactError> {
        Ok(vec![
            self.save(ArtifactKind::Svm, run_id, preprocessor, &ensemble.svm)?,
            self.save(ArtifactKind::GradientBoosting, run_id, preprocessor, &ensemble.xgb)?,
            self.save(ArtifactKind::RandomForest, run_id, preprocessor, &ensemble.rf)?,
            self.save(ArtifactKind::Voting, run_id, preprocessor, ensemble)?,
        ])
    }

    pub fn load_ensemble(&self) -> Result<LoadedArtifact<SoftVotingEnsemble>, ArtifactError> {
        self.load(ArtifactKind::Voting)
    }

    pub fn load_svm(&self) -> Result<LoadedArtifact<SvmClassifier>, ArtifactError> {
        self.load(ArtifactKind::Svm)
    }

    pub fn load_xgb(&self) -> Result<LoadedArtifact<GradientBoostingClassifier>, ArtifactError> {
        self.load(ArtifactKind::GradientBoosting)
    }

    pub fn load_rf(&self) -> Result<LoadedArtifact<RandomForestClassifier>, ArtifactError> {
        self.load(ArtifactKind::RandomForest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::events::Event;
    use crate::logic::features::{CategoricalEncoder, FeatureVector, StandardScaler};
    use crate::logic::model::tree::DecisionTree;
    use crate::logic::model::Classifier;
    use tempfile::tempdir;

    fn preprocessor() -> Preprocessor {
        let events = vec![
            Event { event_id: "cowrie.login.failed".into(), protocol: "ssh".into(), ..Default::default() },
            Event { event_id: "cowrie.session.connect".into(), protocol: "telnet".into(), ..Default::default() },
        ];
        let encoder = CategoricalEncoder::fit(&events);
        let raw: Vec<FeatureVector> = events.iter().map(|e| encoder.encode(e)).collect();
        let scaler = StandardScaler::fit(&raw).unwrap();
        Preprocessor::new(encoder, scaler)
    }

    fn boosting() -> GradientBoostingClassifier {
        GradientBoostingClassifier { base_margin: 0.25, trees: Vec::<DecisionTree>::new() }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let run_id = Uuid::new_v4();
        let prep = preprocessor();

        let path = store.save(ArtifactKind::GradientBoosting, run_id, &prep, &boosting()).unwrap();
        assert!(path.ends_with(XGB_ARTIFACT));
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = store.load_xgb().unwrap();
        assert_eq!(loaded.run_id, run_id);
        assert_eq!(loaded.preprocessor, prep);
        let x = FeatureVector::from_values([0.1, -0.4, 2.0]);
        assert_eq!(loaded.model.predict_proba(&x), boosting().predict_proba(&x));
    }

    #[test]
    fn test_missing_artifact_names_file() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        match store.load_ensemble() {
            Err(ArtifactError::LoadFailure { artifact, path, .. }) => {
                assert_eq!(artifact, "voting");
                assert!(path.ends_with(VOTING_ARTIFACT));
            }
            other => panic!("expected LoadFailure, got {:?}", other.map(|a| a.run_id)),
        }
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let path = store.save(ArtifactKind::GradientBoosting, Uuid::new_v4(), &preprocessor(), &boosting()).unwrap();

        let mut doc: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        doc["payload"]["model"]["base_margin"] = serde_json::json!(3.5);
        fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

        assert!(matches!(store.load_xgb(), Err(ArtifactError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_layout_hash_checked() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let path = store.save(ArtifactKind::GradientBoosting, Uuid::new_v4(), &preprocessor(), &boosting()).unwrap();

        let mut doc: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        doc["layout_hash"] = serde_json::json!(layout_hash().wrapping_add(1));
        fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

        assert!(matches!(store.load_xgb(), Err(ArtifactError::Layout { .. })));
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.save(ArtifactKind::GradientBoosting, Uuid::new_v4(), &preprocessor(), &boosting()).unwrap();
        fs::rename(store.path(ArtifactKind::GradientBoosting), store.path(ArtifactKind::RandomForest)).unwrap();

        assert!(matches!(store.load_rf(), Err(ArtifactError::LoadFailure { .. })));
    }
}
