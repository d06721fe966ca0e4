//! The [`CheckpointSaver`] trait: a pluggable backend for persisting run snapshots.
//!
//! Implementations must be safe to share across concurrently-executing runs
//! (`Send + Sync`) and must serialize writes for the same session so that
//! steps of one session's history are never interleaved or reordered (spec
//! §5, "Shared-resource policy"); reads may run concurrently with anything.

use crate::checkpoint::{Checkpoint, SessionKey, StepIndex};
use crate::error::Result;
use async_trait::async_trait;

/// Storage backend for engine checkpoints.
///
/// The engine treats a failed [`put`](CheckpointSaver::put) as non-fatal: the
/// run continues, the failure is logged, and the next successful write
/// supersedes it (spec §4.F, §7). [`get_history`](CheckpointSaver::get_history)
/// failures, by contrast, are propagated — there is no meaningful fallback
/// for "I can't read this session's history."
#[async_trait]
pub trait CheckpointSaver: Send + Sync {
    /// Persist a checkpoint. Implementations that generate their own step
    /// ordering (e.g. an auto-increment column) should still honor the
    /// `step_index` supplied on the [`Checkpoint`] for lookups.
    async fn put(&self, checkpoint: Checkpoint) -> Result<()>;

    /// Fetch a session's full history in ascending step order. Returns an
    /// empty vector (not an error) if the session has no checkpoints.
    async fn get_history(&self, session_key: &SessionKey) -> Result<Vec<Checkpoint>>;

    /// Fetch the most recent checkpoint for a session, if any.
    async fn get_latest(&self, session_key: &SessionKey) -> Result<Option<Checkpoint>> {
        Ok(self.get_history(session_key).await?.into_iter().last())
    }

    /// Fetch a single checkpoint by its exact step index.
    async fn get_step(
        &self,
        session_key: &SessionKey,
        step_index: StepIndex,
    ) -> Result<Option<Checkpoint>> {
        Ok(self
            .get_history(session_key)
            .await?
            .into_iter()
            .find(|cp| cp.step_index == step_index))
    }

    /// Drop an entire session's history. Used by callers that want to free
    /// storage once a conversation is over; the engine itself never calls
    /// this.
    async fn delete_session(&self, session_key: &SessionKey) -> Result<()> {
        let _ = session_key;
        Ok(())
    }
}
