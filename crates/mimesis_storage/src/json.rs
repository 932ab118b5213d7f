//! JSON file state store.

use async_trait::async_trait;
use mimesis_core::SimulationState;
use mimesis_error::{MimesisResult, StorageError, StorageErrorKind};
use mimesis_interface::StateStore;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Stores the simulation state as a single JSON document.
///
/// Saves write `<path>.tmp`, flush it to disk, then rename it over `<path>`,
/// so a crash leaves either the old or the new document in place.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    /// Create a store for the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> MimesisResult<SimulationState> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(self.path.display().to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        })?;

        let state: SimulationState = serde_json::from_slice(&bytes).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidDocument(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })?;

        tracing::debug!(
            tick = state.tick,
            status = %state.status,
            characters = state.characters.len(),
            locations = state.locations.len(),
            "Loaded simulation state"
        );
        Ok(state)
    }

    #[tracing::instrument(skip(self, state), fields(path = %self.path.display(), tick = state.tick))]
    async fn save(&self, state: &SimulationState) -> MimesisResult<()> {
        let mut data = serde_json::to_vec_pretty(state).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidDocument(e.to_string()))
        })?;
        data.push(b'\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let temp_path = self.temp_path();
        if let Err(e) = write_synced(&temp_path, &data).await {
            tokio::fs::remove_file(&temp_path).await.ok();
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
            .into());
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            tokio::fs::remove_file(&temp_path).await.ok();
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            )))
            .into());
        }

        tracing::info!(size = data.len(), "Saved simulation state");
        Ok(())
    }
}

async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await
}
