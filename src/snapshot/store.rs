use crate::error::{Error, Result};
use crate::snapshot::Snapshot;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;

/// Durable storage for the latest snapshot.
///
/// Single writer: only the scheduler's cycle calls `save`, which replaces
/// the file wholesale. No append, no versioning. The display service reads
/// the same file concurrently, so the write goes through a temp file and a
/// rename; a reader never sees a torn snapshot.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        SnapshotStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Persist the snapshot and return the exact serialized text written,
    /// for the change comparison.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<String> {
        let raw = snapshot.serialize();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await.map_err(|e| {
                    Error::PersistenceError(format!(
                        "failed to create snapshot directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        // Write to a temp file, then rename over the live one.
        let tmp = self.path.with_extension("tmp");
        async_fs::write(&tmp, &raw).await.map_err(|e| {
            Error::PersistenceError(format!(
                "failed to write snapshot {}: {}",
                tmp.display(),
                e
            ))
        })?;
        async_fs::rename(&tmp, &self.path).await.map_err(|e| {
            Error::PersistenceError(format!(
                "failed to replace snapshot {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(raw)
    }

    /// Raw text of the previously persisted snapshot, or empty if none has
    /// been written yet.
    pub async fn load_last(&self) -> Result<String> {
        match async_fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(Error::PersistenceError(format!(
                "failed to read snapshot {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
