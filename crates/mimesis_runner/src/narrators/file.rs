//! Newline-delimited JSON narration log.

use async_trait::async_trait;
use mimesis_core::SimulationState;
use mimesis_error::{JsonError, JsonErrorKind, MimesisResult, StorageError, StorageErrorKind};
use mimesis_interface::{Narrator, PhaseReport, TickReport};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// One line of the narration log.
#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event<'a> {
    TickStart {
        tick: u64,
        characters: usize,
        locations: usize,
    },
    PhaseComplete {
        #[serde(flatten)]
        report: &'a PhaseReport,
    },
    TickComplete {
        #[serde(flatten)]
        report: &'a TickReport,
    },
}

/// Appends one JSON object per lifecycle event to a file.
///
/// Each line carries an `event` tag: `tick_start`, `phase_complete` or
/// `tick_complete`.
#[derive(Debug, Clone)]
pub struct FileNarrator {
    path: PathBuf,
}

impl FileNarrator {
    /// Narrate into the file at `path`, creating it on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, event: &Event<'_>) -> MimesisResult<()> {
        let mut line = serde_json::to_vec(event)
            .map_err(|e| JsonError::new(JsonErrorKind::Narration(e.to_string())))?;
        line.push(b'\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let write_err = |e: std::io::Error| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        };
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(write_err)?;
        file.write_all(&line).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)?;
        Ok(())
    }
}

#[async_trait]
impl Narrator for FileNarrator {
    fn name(&self) -> &str {
        "file"
    }

    async fn on_tick_start(&self, tick: u64, state: &SimulationState) -> MimesisResult<()> {
        self.append(&Event::TickStart {
            tick,
            characters: state.characters.len(),
            locations: state.locations.len(),
        })
        .await
    }

    async fn on_phase_complete(&self, report: &PhaseReport) -> MimesisResult<()> {
        self.append(&Event::PhaseComplete { report }).await
    }

    async fn on_tick_complete(&self, report: &TickReport) -> MimesisResult<()> {
        self.append(&Event::TickComplete { report }).await
    }
}
