//! JSON file persistence for the scenario document.
//!
//! The store is optional. Without a configured path the board lives only
//! in memory: [`DocumentStore::load`] yields nothing and
//! [`DocumentStore::save`] fails with [`StoreError::NotConfigured`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use scenario_types::ScenarioDocument;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Errors that can occur while reading or writing the document file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No store path is configured.
    #[error("no document store configured")]
    NotConfigured,

    /// The file could not be read or written.
    #[error("store I/O error at {path}: {source}")]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file does not hold a valid scenario document.
    #[error("store JSON error at {path}: {source}")]
    Json {
        /// The file being parsed or written.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

/// Location of the persisted scenario document.
///
/// Clones share one writer lock, so saves through any clone of a store
/// are applied one after another.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    path: Option<PathBuf>,
    writer: Arc<Mutex<()>>,
}

impl DocumentStore {
    /// Create a store backed by `path`, or an in-memory-only store.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// The configured file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the stored document.
    ///
    /// Returns `Ok(None)` when no path is configured or the file does not
    /// exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read, or
    /// [`StoreError::Json`] if it is not a scenario document.
    pub async fn load(&self) -> Result<Option<ScenarioDocument>, StoreError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(None);
        };
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no stored document yet");
                return Ok(None);
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let document: ScenarioDocument =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!(path = %path.display(), scenarios = document.len(), "stored document loaded");
        Ok(Some(document))
    }

    /// Take a document from `snapshot` and write it, replacing any previous
    /// contents. Returns the file written and the number of scenarios.
    ///
    /// The writer lock is held from before `snapshot` is polled until the
    /// file is in place, so a later save never lands under an earlier
    /// one. Each save stages into its own sibling file and renames it over
    /// the target, so readers never see a partial file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotConfigured`] without a path, or an I/O or
    /// JSON error if writing fails.
    pub async fn save<F>(&self, snapshot: F) -> Result<(&Path, usize), StoreError>
    where
        F: Future<Output = ScenarioDocument>,
    {
        let path = self.path.as_deref().ok_or(StoreError::NotConfigured)?;
        let _writer = self.writer.lock().await;
        let document = snapshot.await;
        let json = serde_json::to_vec_pretty(&document).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let staging = staging_path(path);
        if let Err(source) = tokio::fs::write(&staging, json).await {
            discard(&staging).await;
            return Err(StoreError::Io {
                path: staging,
                source,
            });
        }
        if let Err(source) = tokio::fs::rename(&staging, path).await {
            discard(&staging).await;
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }

        tracing::info!(path = %path.display(), scenarios = document.len(), "document persisted");
        Ok((path, document.len()))
    }
}

/// `scenarios.json` stages as `scenarios.json.<uuid-v7>.tmp`.
fn staging_path(path: &Path) -> PathBuf {
    path.with_extension(format!("json.{}.tmp", Uuid::now_v7().simple()))
}

async fn discard(staging: &Path) {
    match tokio::fs::remove_file(staging).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %staging.display(), error = %e, "staging file left behind");
        }
        _ => {}
    }
}
