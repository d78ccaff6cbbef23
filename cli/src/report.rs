//! Report loading: run metadata and the raw event sequence.
//!
//! The data-source collaborator is a pair of JSON files here: one with the
//! encounter metadata and actor roster, one with the time-ascending event
//! array. Either failing to load is fatal to the run.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use vigil_core::{Actor, ActorId, CombatEvent, EncounterInfo};

/// Run metadata supplied before any event is parsed.
#[derive(Debug, Deserialize)]
pub struct ReportMeta {
    pub encounter: EncounterInfo,
    pub actors: Vec<Actor>,
    /// The participant to analyse.
    pub subject: ActorId,
}

/// Fatal data-source failures: without metadata or events there is no run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub async fn load_meta(path: &Path) -> Result<ReportMeta, ReportError> {
    parse_json(path).await
}

pub async fn load_events(path: &Path) -> Result<Vec<CombatEvent>, ReportError> {
    parse_json(path).await
}

async fn parse_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ReportError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&contents).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })
}
