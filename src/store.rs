//! Results store: one JSON document per tournament, kept in memory and optionally mirrored
//! to `<data_dir>/<tournamentId>.json`.

use crate::models::{SaveResultsRequest, TournamentResults};
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Errors raised by the results store.
#[derive(Debug)]
pub enum StoreError {
    /// Tournament ids may only contain ASCII letters, digits, `-` and `_`.
    InvalidTournamentId(String),
    /// A save must name its participation type.
    MissingParticipationType,
    /// The document changed since the caller loaded it.
    Conflict { expected: u64, actual: u64 },
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::InvalidTournamentId(id) => write!(f, "Invalid tournament id '{}'", id),
            StoreError::MissingParticipationType => write!(f, "Participation type is required"),
            StoreError::Conflict { expected, actual } => write!(
                f,
                "Results were changed by someone else (expected version {}, found {})",
                expected, actual
            ),
            StoreError::Io(e) => write!(f, "Could not access results storage: {}", e),
            StoreError::Json(e) => write!(f, "Could not encode results: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

fn validate_id(id: &str) -> Result<(), StoreError> {
    let ok = !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidTournamentId(id.to_string()))
    }
}

/// All tournament result documents.
#[derive(Debug, Default)]
pub struct ResultsStore {
    documents: HashMap<String, TournamentResults>,
    data_dir: Option<PathBuf>,
}

impl ResultsStore {
    /// A store that forgets everything on restart.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// A store backed by `dir`, loading every `*.json` document already there.
    /// Files that fail to parse are skipped with a warning.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        let mut documents = HashMap::new();
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let raw = tokio::fs::read(&path).await?;
            match serde_json::from_slice::<TournamentResults>(&raw) {
                Ok(doc) if validate_id(&doc.tournament_id).is_ok() => {
                    documents.insert(doc.tournament_id.clone(), doc);
                }
                Ok(doc) => log::warn!(
                    "Skipping {}: invalid tournament id '{}'",
                    path.display(),
                    doc.tournament_id
                ),
                Err(e) => log::warn!("Skipping unreadable results file {}: {}", path.display(), e),
            }
        }
        log::info!(
            "Loaded {} results document(s) from {}",
            documents.len(),
            dir.display()
        );
        Ok(Self {
            documents,
            data_dir: Some(dir),
        })
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// The stored document, or the default-empty one when nothing was saved yet.
    pub fn get(&self, tournament_id: &str) -> Result<TournamentResults, StoreError> {
        validate_id(tournament_id)?;
        Ok(self
            .documents
            .get(tournament_id)
            .cloned()
            .unwrap_or_else(|| TournamentResults::empty(tournament_id)))
    }

    /// Replace one participation type's results and return the saved document.
    ///
    /// Other participation types are left untouched. With `expected_version` set the save is
    /// refused when the stored version differs. On any error nothing changes.
    pub async fn save(
        &mut self,
        tournament_id: &str,
        request: SaveResultsRequest,
    ) -> Result<TournamentResults, StoreError> {
        let (participation_type, results, expected) = request.into_parts();
        if participation_type.trim().is_empty() {
            return Err(StoreError::MissingParticipationType);
        }
        let mut doc = self.get(tournament_id)?;
        if let Some(expected) = expected {
            if expected != doc.version {
                return Err(StoreError::Conflict {
                    expected,
                    actual: doc.version,
                });
            }
        }
        doc.replace_participation(&participation_type, results);
        self.commit(doc).await
    }

    /// Set the published flag.
    pub async fn set_published(
        &mut self,
        tournament_id: &str,
        is_published: bool,
    ) -> Result<TournamentResults, StoreError> {
        let mut doc = self.get(tournament_id)?;
        doc.is_published = is_published;
        self.commit(doc).await
    }

    async fn commit(&mut self, mut doc: TournamentResults) -> Result<TournamentResults, StoreError> {
        doc.version += 1;
        doc.updated_at = Some(Utc::now());
        if let Some(dir) = &self.data_dir {
            write_document(dir, &doc).await?;
        }
        log::info!(
            "Saved results for tournament {} (version {})",
            doc.tournament_id,
            doc.version
        );
        self.documents.insert(doc.tournament_id.clone(), doc.clone());
        Ok(doc)
    }
}

/// Written to `<id>.json.tmp`, then renamed over `<id>.json`.
async fn write_document(dir: &Path, doc: &TournamentResults) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(doc)?;
    let path = dir.join(format!("{}.json", doc.tournament_id));
    let tmp = dir.join(format!("{}.json.tmp", doc.tournament_id));
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, &path).await?;
    Ok(())
}
