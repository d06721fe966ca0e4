//! Checkpoint data structures: a serialized snapshot keyed by `(session_key, step_index)`.
//!
//! This mirrors the teacher library's `Checkpoint`/`CheckpointConfig`/`CheckpointMetadata`
//! triad, narrowed to what the Adaptive RAG engine's checkpointing contract (spec §4.F,
//! §6) actually needs: there is no per-channel version tracking here because the engine
//! has exactly one channel — the whole `RunState` — and advances it one superstep at a
//! time, so the step index alone is a total order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque session identifier. Distinct sessions have entirely independent
/// checkpoint histories.
pub type SessionKey = String;

/// Zero-based index of a superstep within a session's history. Monotonically
/// increasing; never reused within a session.
pub type StepIndex = u64;

/// Where a checkpoint's content originated, kept for parity with the
/// teacher's `CheckpointSource` and useful for audit/debugging even though
/// the engine currently only ever writes `Loop` checkpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckpointSource {
    /// The initial `RunState`, before any node has executed.
    Input,
    /// Written after a node transition inside the executor's superstep loop.
    Loop,
}

/// Metadata stored alongside a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    /// What produced this checkpoint.
    pub source: CheckpointSource,
    /// The node whose transition produced this checkpoint, if any (absent
    /// for the initial `Input` checkpoint).
    pub node: Option<String>,
}

/// A single persisted snapshot: the fully-merged `RunState` (minus
/// non-serializable fields such as the live `Retriever` handle) at a given
/// step, plus the bookkeeping needed to locate and order it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Session this checkpoint belongs to.
    pub session_key: SessionKey,
    /// Position of this checkpoint within the session's history.
    pub step_index: StepIndex,
    /// Wall-clock time the checkpoint was written.
    pub ts: DateTime<Utc>,
    /// The serialized state snapshot (a JSON encoding of `RunStateSnapshot`).
    pub snapshot: Value,
    /// Metadata describing how the checkpoint came to be.
    pub metadata: CheckpointMetadata,
}

impl Checkpoint {
    /// Build a checkpoint for the given session/step.
    pub fn new(
        session_key: impl Into<SessionKey>,
        step_index: StepIndex,
        snapshot: Value,
        metadata: CheckpointMetadata,
    ) -> Self {
        Self {
            session_key: session_key.into(),
            step_index,
            ts: Utc::now(),
            snapshot,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_carries_session_and_step() {
        let cp = Checkpoint::new(
            "session-1",
            3,
            serde_json::json!({"question": "what is rag?"}),
            CheckpointMetadata {
                source: CheckpointSource::Loop,
                node: Some("generate".to_string()),
            },
        );
        assert_eq!(cp.session_key, "session-1");
        assert_eq!(cp.step_index, 3);
        assert_eq!(cp.metadata.node.as_deref(), Some("generate"));
    }
}
