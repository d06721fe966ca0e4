//! Checkpoint storage abstractions for the Adaptive RAG workflow engine.
//!
//! This crate defines the [`CheckpointSaver`] trait — the engine's contract
//! with whatever external store persists run history — plus an
//! [`InMemoryCheckpointSaver`] reference implementation suitable for tests,
//! demos, and single-process deployments. It is deliberately independent of
//! `rag-engine`: the engine depends on this crate, never the reverse, so a
//! host application can swap in its own backend (Redis, Postgres, ...)
//! without pulling in graph/node code.
//!
//! The model here is narrower than a general-purpose checkpointing library:
//! one session has exactly one logical channel (its `RunState`), advanced one
//! superstep at a time, so a checkpoint is keyed by `(session_key,
//! step_index)` rather than by per-channel versions.

mod checkpoint;
mod error;
mod memory;
mod traits;

pub use checkpoint::{Checkpoint, CheckpointMetadata, CheckpointSource, SessionKey, StepIndex};
pub use error::{CheckpointError, Result};
pub use memory::InMemoryCheckpointSaver;
pub use traits::CheckpointSaver;
