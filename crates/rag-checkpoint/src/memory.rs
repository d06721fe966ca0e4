//! In-memory [`CheckpointSaver`] implementation.
//!
//! Reference backend for development, tests, and single-process deployments.
//! Checkpoints are lost on restart; production deployments are expected to
//! provide their own [`CheckpointSaver`] backed by a real store (Redis,
//! Postgres, ...), exactly as the engine treats the checkpoint store as an
//! external, pluggable collaborator (spec §6).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::checkpoint::{Checkpoint, SessionKey};
use crate::error::Result;
use crate::traits::CheckpointSaver;

/// Thread-safe, process-local checkpoint store.
///
/// Writes for a given session are serialized by the single [`Mutex`] guarding
/// the whole map; this is coarser than strictly necessary (it also serializes
/// writes across *different* sessions) but is simple and correct, and the
/// store is not expected to be a bottleneck relative to LLM calls.
#[derive(Clone, Default)]
pub struct InMemoryCheckpointSaver {
    sessions: Arc<Mutex<HashMap<SessionKey, Vec<Checkpoint>>>>,
}

impl InMemoryCheckpointSaver {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all sessions. Handy for test isolation between cases that
    /// share one saver instance.
    pub async fn clear(&self) {
        self.sessions.lock().await.clear();
    }

    /// Count of distinct sessions currently held.
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[async_trait]
impl CheckpointSaver for InMemoryCheckpointSaver {
    async fn put(&self, checkpoint: Checkpoint) -> Result<()> {
        let mut sessions = self.sessions.lock().await;
        let history = sessions.entry(checkpoint.session_key.clone()).or_default();
        match history.iter().position(|cp| cp.step_index == checkpoint.step_index) {
            Some(idx) => history[idx] = checkpoint,
            None => {
                history.push(checkpoint);
                history.sort_by_key(|cp| cp.step_index);
            }
        }
        Ok(())
    }

    async fn get_history(&self, session_key: &SessionKey) -> Result<Vec<Checkpoint>> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(session_key).cloned().unwrap_or_default())
    }

    async fn delete_session(&self, session_key: &SessionKey) -> Result<()> {
        self.sessions.lock().await.remove(session_key);
        Ok(())
    }
}
