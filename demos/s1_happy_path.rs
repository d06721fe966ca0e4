//! Runnable walkthrough of Scenario S1 (spec.md §8): a happy-path question
//! answered entirely from the vectorstore, no retries needed.
//!
//! Relocated out of a crate literally named `examples/` since that name is
//! reserved in this workspace; otherwise this plays the same role as the
//! teacher's own `examples/*.rs` binaries.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;

use rag_checkpoint::InMemoryCheckpointSaver;
use rag_engine::{
    stream, Executor, LanguageModel, Result, Retriever, RetrievedDocument, RunContext, RunState, WebSearchResult,
    WebSearchTool,
};

struct DemoRetriever;

#[async_trait]
impl Retriever for DemoRetriever {
    async fn retrieve(&self, _question: &str) -> Result<Vec<RetrievedDocument>> {
        Ok(vec![
            RetrievedDocument { text: "A vector index organizes embeddings for approximate nearest-neighbor search.".into() },
            RetrievedDocument { text: "HNSW and IVF are common vector index structures.".into() },
            RetrievedDocument { text: "Vector indexes trade exactness for query speed.".into() },
        ])
    }
}

/// A canned language model: always routes to the vectorstore, keeps every
/// graded document, and produces one grounded, useful answer.
struct DemoLanguageModel;

#[async_trait]
impl LanguageModel for DemoLanguageModel {
    async fn chat(&self, _system_prompt: &str, _human_prompt: &str) -> Result<String> {
        Ok("A vector index is a data structure that organizes embeddings to make similarity search fast.".into())
    }

    async fn chat_structured(&self, system_prompt: &str, _human_prompt: &str) -> Result<String> {
        if system_prompt.contains("routing a user question") {
            Ok(r#"{"datasource": "vectorstore"}"#.into())
        } else {
            Ok(r#"{"binary_score": "yes"}"#.into())
        }
    }
}

struct UnusedWebSearch;

#[async_trait]
impl WebSearchTool for UnusedWebSearch {
    async fn search(&self, _query: &str, _top_k: u32) -> Result<WebSearchResult> {
        unreachable!("Scenario S1 never falls back to web search")
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let context = RunContext::new(Arc::new(DemoRetriever), Arc::new(DemoLanguageModel), Arc::new(UnusedWebSearch));
    let state = RunState::new("What is a vector index?", 3, "demo-session-1");

    let saver = Arc::new(InMemoryCheckpointSaver::new());
    let executor = Executor::with_checkpoint_saver(saver.clone());

    let question = state.question.clone();
    let snapshots = executor.stream(state, context);
    let events = stream::adapt(question, snapshots);
    tokio::pin!(events);

    while let Some(event) = events.next().await {
        println!("{}", rag_engine::sse::format_sse(&event));
    }

    let history = executor.history("demo-session-1").await.unwrap();
    println!("checkpointed {} steps for demo-session-1", history.len());
}
