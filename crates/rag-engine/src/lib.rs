//! The Adaptive RAG Workflow Engine: a bounded, self-correcting graph that
//! chains retrieval, relevance grading, generation, hallucination checking,
//! and answer-quality grading into a streaming, checkpointed run.
//!
//! This crate is the orchestration core only. It consumes, but does not
//! implement, a [`collaborators::Retriever`], a [`collaborators::LanguageModel`],
//! and a [`collaborators::WebSearchTool`] — the HTTP surface, the vector
//! store client, the document loader, and the LLM provider registry all
//! live outside this crate by design.
//!
//! A typical run:
//!
//! ```ignore
//! let context = RunContext::new(retriever, language_model, web_search);
//! let state = RunState::new("What is a vector index?", 3, "session-1");
//! let executor = Executor::new();
//! let events = stream::adapt(state.question.clone(), executor.stream(state, context));
//! tokio::pin!(events);
//! while let Some(event) = events.next().await {
//!     // write `sse::format_sse(&event)` to the response
//! }
//! ```
//!
//! Grounded throughout on `langgraph-core`/`langgraph-checkpoint` (this
//! crate's teacher library): the module layout, the `tracing`-based logging,
//! the `thiserror` error hierarchy, and the pull-driven streaming contract
//! all follow that library's conventions, narrowed to this engine's five
//! fixed nodes and three routers.

pub mod collaborators;
pub mod error;
pub mod executor;
pub mod graph;
pub mod judge;
pub mod nodes;
pub mod prompts;
pub mod routers;
pub mod sse;
pub mod state;
pub mod stream;

pub use collaborators::{LanguageModel, Retriever, RetrievedDocument, RunContext, WebSearchResult, WebSearchTool};
pub use error::{GraphError, Result};
pub use executor::{Executor, SnapshotStream};
pub use graph::{CompiledGraph, NodeId};
pub use state::{Document, RunState, RunStateSnapshot, StateDelta};
pub use stream::StreamEvent;
