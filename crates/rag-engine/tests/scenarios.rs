//! End-to-end scenario tests (spec.md §8, Scenarios S1-S6). The
//! LanguageModel is scripted to return canned text/JSON; the Retriever and
//! web-search tool are fixed mocks, exactly as spec.md's scenario
//! descriptions assume.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::StreamExt;

use rag_engine::{
    stream::{self, StreamEvent},
    Executor, LanguageModel, Result, Retriever, RetrievedDocument, RunContext, RunState, WebSearchResult,
    WebSearchTool,
};

struct FixedRetriever(Vec<&'static str>);

#[async_trait]
impl Retriever for FixedRetriever {
    async fn retrieve(&self, _question: &str) -> Result<Vec<RetrievedDocument>> {
        Ok(self.0.iter().map(|t| RetrievedDocument { text: t.to_string() }).collect())
    }
}

/// Returns each scripted `chat_structured` response once, in order, then
/// keeps repeating the last one. `chat` always returns the scripted text.
struct ScriptedLlm {
    structured: Mutex<Vec<String>>,
    chat_responses: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    fn new(structured: Vec<&str>, chat_responses: Vec<&str>) -> Self {
        Self {
            structured: Mutex::new(structured.into_iter().map(String::from).collect()),
            chat_responses: Mutex::new(chat_responses.into_iter().map(String::from).collect()),
        }
    }
}

#[async_trait]
impl LanguageModel for ScriptedLlm {
    async fn chat(&self, _system_prompt: &str, _human_prompt: &str) -> Result<String> {
        let mut queue = self.chat_responses.lock().unwrap();
        if queue.len() > 1 {
            Ok(queue.remove(0))
        } else {
            Ok(queue.first().cloned().unwrap_or_default())
        }
    }

    async fn chat_structured(&self, _system_prompt: &str, _human_prompt: &str) -> Result<String> {
        let mut queue = self.structured.lock().unwrap();
        if queue.len() > 1 {
            Ok(queue.remove(0))
        } else {
            Ok(queue.first().cloned().unwrap_or_default())
        }
    }
}

struct FixedWebSearch {
    content: &'static str,
}

#[async_trait]
impl WebSearchTool for FixedWebSearch {
    async fn search(&self, _query: &str, _top_k: u32) -> Result<WebSearchResult> {
        Ok(WebSearchResult {
            content: self.content.to_string(),
            sources: vec!["https://example.com".to_string()],
        })
    }
}

fn context(retriever_docs: Vec<&'static str>, structured: Vec<&str>, chat_responses: Vec<&str>, web_search_content: &'static str) -> RunContext {
    RunContext::new(
        Arc::new(FixedRetriever(retriever_docs)),
        Arc::new(ScriptedLlm::new(structured, chat_responses)),
        Arc::new(FixedWebSearch { content: web_search_content }),
    )
}

async fn run_to_events(state: RunState, ctx: RunContext) -> Vec<StreamEvent> {
    let executor = Executor::new();
    let question = state.question.clone();
    let snapshots = executor.stream(state, ctx);
    let events = stream::adapt(question, snapshots);
    tokio::pin!(events);
    let mut out = Vec::new();
    while let Some(event) = events.next().await {
        out.push(event);
    }
    out
}

/// S1: happy path, vectorstore. All docs relevant, both graders say yes on
/// the first pass.
#[tokio::test]
async fn s1_happy_path_vectorstore() {
    let state = RunState::new("What is a vector index?", 3, "s1");
    let ctx = context(
        vec!["doc-1", "doc-2", "doc-3"],
        vec![
            r#"{"datasource": "vectorstore"}"#,
            r#"{"binary_score": "yes"}"#,
        ],
        vec!["A vector index is a data structure for fast similarity search."],
        "unused",
    );

    let events = run_to_events(state, ctx).await;

    assert!(matches!(events[0], StreamEvent::Start(_)));
    assert!(matches!(events.last().unwrap(), StreamEvent::Done(_)));
    assert!(events.iter().any(|e| matches!(e, StreamEvent::Documents(d) if d.documents.len() == 3)));
    assert!(events.iter().any(|e| matches!(e, StreamEvent::Chunk(_))));
    if let StreamEvent::Done(payload) = events.last().unwrap() {
        assert_eq!(payload.final_answer.as_deref(), Some("A vector index is a data structure for fast similarity search."));
    }
}

/// S2: all retrieved docs irrelevant, falls back to web search before
/// generating.
#[tokio::test]
async fn s2_fallback_to_web_search() {
    let state = RunState::new("Latest news on X", 3, "s2");
    let ctx = context(
        vec!["doc-1", "doc-2"],
        vec![
            r#"{"datasource": "vectorstore"}"#,
            r#"{"binary_score": "no"}"#,  // doc-1 filtered out
            r#"{"binary_score": "no"}"#,  // doc-2 filtered out -> web_search_needed
            r#"{"binary_score": "yes"}"#, // hallucination check: grounded
            r#"{"binary_score": "yes"}"#, // answer check: useful
        ],
        vec!["Here is the latest on X."],
        "breaking news snippet",
    );

    let events = run_to_events(state, ctx).await;

    let documents_events: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Documents(d) => Some(d.documents.len()),
            _ => None,
        })
        .collect();
    // First documents event fires once docs become non-empty; web_search
    // appends rather than the adapter re-firing (spec.md §4.G fires only on
    // the *first* non-empty transition), so exactly one documents event with
    // however many documents survived grading plus the web result.
    assert!(!documents_events.is_empty());
    assert!(matches!(events.last().unwrap(), StreamEvent::Done(_)));
}

/// S3: hallucination retry then success — exactly two chunk bursts, final
/// loop_step is 2.
#[tokio::test]
async fn s3_hallucination_retry_then_success() {
    let state = RunState::new("question", 3, "s3");
    let ctx = context(
        vec!["doc-1"],
        vec![r#"{"datasource": "vectorstore"}"#, r#"{"binary_score": "yes"}"#],
        vec!["first draft", "first draft refined"],
        "unused",
    );

    // Hallucination grader must say "no" exactly once then "yes". Build a
    // custom scripted sequence since the generic helper repeats the last
    // structured response forever, which would never let the retry succeed.
    let llm = ScriptedLlm::new(
        vec![
            r#"{"datasource": "vectorstore"}"#,
            r#"{"binary_score": "yes"}"#, // doc grader
            r#"{"binary_score": "no"}"#,  // hallucination check #1: ungrounded
            r#"{"binary_score": "yes"}"#, // hallucination check #2: grounded
            r#"{"binary_score": "yes"}"#, // answer check #2: useful
        ],
        vec!["first draft", "first draft refined"],
    );
    let ctx = RunContext::new(ctx.retriever, Arc::new(llm), ctx.web_search);

    let events = run_to_events(state, ctx).await;
    let chunk_count = events.iter().filter(|e| matches!(e, StreamEvent::Chunk(_))).count();
    assert_eq!(chunk_count, 2);

    if let StreamEvent::Done(_) = events.last().unwrap() {
        let last_workflow_step = events.iter().rev().find_map(|e| match e {
            StreamEvent::WorkflowStep(w) => Some(w.loop_step),
            _ => None,
        });
        assert_eq!(last_workflow_step, Some(2));
    } else {
        panic!("expected a done event");
    }
}

/// S4: max retries exhausted — every generation fails the hallucination
/// grader. Run must still terminate with a `done` event.
#[tokio::test]
async fn s4_max_retries_exhausted() {
    let state = RunState::new("question", 2, "s4");
    let ctx = context(
        vec!["doc-1"],
        vec![
            r#"{"datasource": "vectorstore"}"#,
            r#"{"binary_score": "yes"}"#, // doc grader keeps it
            r#"{"binary_score": "no"}"#,  // hallucination: always ungrounded
        ],
        vec!["an answer"],
        "unused",
    );

    let events = run_to_events(state, ctx).await;
    assert!(matches!(events.last().unwrap(), StreamEvent::Done(_)));
    let final_loop_step = events.iter().rev().find_map(|e| match e {
        StreamEvent::WorkflowStep(w) => Some(w.loop_step),
        _ => None,
    });
    assert_eq!(final_loop_step, Some(3)); // max_retries(2) + 1
}

/// S5: router LM returns unparseable JSON, falls back to vectorstore.
#[tokio::test]
async fn s5_router_defaults_to_vectorstore_on_parse_error() {
    let state = RunState::new("question", 3, "s5");
    let ctx = context(
        vec!["doc-1"],
        vec!["not a json", r#"{"binary_score": "yes"}"#],
        vec!["an answer"],
        "unused",
    );

    let events = run_to_events(state, ctx).await;
    // Falling back to vectorstore means `retrieve` ran, so a documents event
    // appears before generation completes.
    assert!(events.iter().any(|e| matches!(e, StreamEvent::Documents(_))));
    assert!(matches!(events.last().unwrap(), StreamEvent::Done(_)));
}

/// S6: consumer drops the stream after the first documents event; no
/// further events, no panic, no done/error leaking through afterward.
#[tokio::test]
async fn s6_cancellation_emits_no_further_events() {
    let state = RunState::new("question", 3, "s6");
    let ctx = context(
        vec!["doc-1", "doc-2"],
        vec![r#"{"datasource": "vectorstore"}"#, r#"{"binary_score": "yes"}"#],
        vec!["an answer"],
        "unused",
    );

    let executor = Executor::new();
    let question = state.question.clone();
    let snapshots = executor.stream(state, ctx);
    let events = stream::adapt(question, snapshots);
    tokio::pin!(events);

    let mut seen = Vec::new();
    while let Some(event) = events.next().await {
        let is_documents = matches!(event, StreamEvent::Documents(_));
        seen.push(event);
        if is_documents {
            break;
        }
    }

    assert!(seen.iter().any(|e| matches!(e, StreamEvent::Start(_))));
    assert!(seen.iter().any(|e| matches!(e, StreamEvent::Documents(_))));
    assert!(!seen.iter().any(|e| matches!(e, StreamEvent::Done(_) | StreamEvent::Error(_))));

    drop(events);
}
