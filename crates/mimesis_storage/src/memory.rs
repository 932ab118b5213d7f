//! In-memory state store.

use async_trait::async_trait;
use mimesis_core::SimulationState;
use mimesis_error::{MimesisResult, StorageError, StorageErrorKind};
use mimesis_interface::StateStore;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Keeps the state in memory and counts saves.
///
/// # Examples
///
/// ```
/// use mimesis_core::SimulationState;
/// use mimesis_interface::StateStore;
/// use mimesis_storage::InMemoryStateStore;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryStateStore::new(SimulationState::default());
/// let mut state = store.load().await?;
/// state.tick += 1;
/// store.save(&state).await?;
///
/// assert_eq!(store.snapshot().tick, 1);
/// assert_eq!(store.save_count(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    state: Mutex<SimulationState>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl InMemoryStateStore {
    /// Create a store holding `state`.
    pub fn new(state: SimulationState) -> Self {
        Self {
            state: Mutex::new(state),
            saves: AtomicUsize::new(0),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Copy of the stored state.
    pub fn snapshot(&self) -> SimulationState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make every following save fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn load(&self) -> MimesisResult<SimulationState> {
        Ok(self.snapshot())
    }

    async fn save(&self, state: &SimulationState) -> MimesisResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::new(StorageErrorKind::FileWrite(
                "in-memory store set to fail".to_string(),
            ))
            .into());
        }
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
