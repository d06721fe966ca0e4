//! The engine's error type.
//!
//! Mirrors the shape of the error-kind table in the workflow engine's design:
//! a node either fails fatally (propagated to the executor, which ends the
//! run with an `error` event) or absorbs the failure itself and falls back to
//! a node-local default (never constructs a [`GraphError`] at all). See
//! [`crate::nodes`] and [`crate::routers`] for where each fallback lives.

use thiserror::Error;

/// Result type used throughout the engine.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Fatal errors that can end a run.
///
/// `LMParseFailure` and the graders' treatment of `LMTransportFailure` as a
/// soft failure never reach this type — they're handled inline by the node or
/// router that observed them and never escape as an `Err`. What's left here
/// is exactly the set of failures that have no sensible in-graph fallback.
#[derive(Error, Debug)]
pub enum GraphError {
    /// Request-level validation failed before a run was ever started.
    /// Constructing a run with this error should not be possible from inside
    /// the engine; it exists so the boundary (outside this crate) can reuse
    /// the same error type end to end.
    #[error("invalid input: {0}")]
    InputInvalid(String),

    /// The `retrieve` node's call to the [`crate::collaborators::Retriever`]
    /// failed or timed out. Fatal: spec.md has no fallback corpus.
    #[error("retrieval failed: {0}")]
    RetrievalFailure(String),

    /// The `web_search` node's call to the
    /// [`crate::collaborators::WebSearchTool`] failed or timed out. Fatal:
    /// there is no edge from `web_search` back to anywhere but `generate`.
    #[error("web search failed: {0}")]
    WebSearchFailure(String),

    /// The `generate` node's call to the language model failed or timed out.
    /// Unlike grader/router calls (which degrade to a parse-failure
    /// fallback), a failed *generation* has nothing to fall back to.
    #[error("language model call failed: {0}")]
    LanguageModelFailure(String),

    /// Graph construction was invalid (e.g. an edge referencing an unknown
    /// node). Always a programming error, never data-dependent.
    #[error("graph construction error: {0}")]
    Validation(String),

    /// Catch-all for executor-level failures that don't fit the categories
    /// above (e.g. a poisoned internal channel).
    #[error("execution error: {0}")]
    Execution(String),

    /// Propagated from the checkpoint store's `get_history`. Checkpoint
    /// *write* failures are intentionally not a `GraphError` variant — they
    /// are logged and swallowed by the executor, per spec.md §4.F/§7.
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] rag_checkpoint::CheckpointError),
}

impl GraphError {
    /// Build a [`GraphError::RetrievalFailure`] from any displayable cause.
    pub fn retrieval(cause: impl std::fmt::Display) -> Self {
        GraphError::RetrievalFailure(cause.to_string())
    }

    /// Build a [`GraphError::WebSearchFailure`] from any displayable cause.
    pub fn web_search(cause: impl std::fmt::Display) -> Self {
        GraphError::WebSearchFailure(cause.to_string())
    }

    /// Build a [`GraphError::LanguageModelFailure`] from any displayable cause.
    pub fn language_model(cause: impl std::fmt::Display) -> Self {
        GraphError::LanguageModelFailure(cause.to_string())
    }
}
