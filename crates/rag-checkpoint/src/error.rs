//! Error types for checkpoint operations.

use thiserror::Error;

/// Result type for checkpoint operations.
pub type Result<T> = std::result::Result<T, CheckpointError>;

/// Errors that can occur while persisting or retrieving checkpoints.
///
/// Per the engine's error-handling design, a [`CheckpointError`] raised while
/// writing a checkpoint is **not** fatal to the run it belongs to — the
/// executor logs it and continues (see `rag_engine::executor`). Errors raised
/// while *reading* history (`get_history`) are propagated to the caller, since
/// there is no sensible fallback for "replay the session" failing outright.
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// No checkpoint exists for the requested session/step.
    #[error("checkpoint not found: {0}")]
    NotFound(String),

    /// The snapshot could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store rejected or failed the write/read.
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O failure from a file- or network-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
