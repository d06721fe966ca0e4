//! The streaming adapter: turns the executor's snapshot sequence into the
//! six named event kinds a consumer (typically an SSE writer) actually sees.
//!
//! Grounded on the teacher's `stream.rs` StreamEventBuffer/multiplexer
//! shape, narrowed from seven generic stream modes down to the six fixed
//! event kinds this engine needs. The adapter is itself a `Stream` built
//! with `async_stream`, consuming the executor's [`SnapshotStream`] one item
//! at a time — it never buffers more than the one pending snapshot the
//! executor itself hands it.

use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use serde::Serialize;
use serde_json::Value;

use crate::executor::SnapshotStream;
use crate::state::RunStateSnapshot;

/// Maximum number of document texts included in a `documents` event.
const MAX_DOCUMENTS_IN_EVENT: usize = 5;

/// One of the six event kinds the consumer sees, paired with its payload.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum StreamEvent {
    Start(StartPayload),
    WorkflowStep(WorkflowStepPayload),
    Documents(DocumentsPayload),
    Chunk(ChunkPayload),
    Done(DonePayload),
    Error(ErrorPayload),
}

#[derive(Debug, Clone, Serialize)]
pub struct StartPayload {
    pub question: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStepPayload {
    pub loop_step: u32,
    pub web_search_needed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentsPayload {
    pub documents: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChunkPayload {
    /// The incremental suffix only — never the whole answer-so-far, except
    /// when a retry shortens `generation`, in which case this is the full
    /// new generation.
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DonePayload {
    pub final_answer: Option<String>,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub error: String,
    pub message: String,
}

/// Diff state the adapter keeps across snapshots: what it has already
/// emitted, so it knows what's new.
struct AdapterState {
    emitted_documents: bool,
    last_generation: String,
    last_loop_step: Option<u32>,
    last_web_search_needed: Option<bool>,
}

impl AdapterState {
    fn new() -> Self {
        Self {
            emitted_documents: false,
            last_generation: String::new(),
            last_loop_step: None,
            last_web_search_needed: None,
        }
    }
}

/// HTML-escape a string before it reaches the wire.
fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Wrap an executor's snapshot sequence into the named event stream a
/// consumer sees. `question` seeds the `start` event, which the executor's
/// snapshots don't themselves carry (the executor never emits a snapshot for
/// the pre-run state).
pub fn adapt(question: String, snapshots: SnapshotStream) -> impl Stream<Item = StreamEvent> {
    async_stream::stream! {
        yield StreamEvent::Start(StartPayload {
            question: escape(&question),
            timestamp: Utc::now(),
        });

        let mut adapter = AdapterState::new();
        let mut snapshots = snapshots;
        let mut last_snapshot: Option<RunStateSnapshot> = None;

        while let Some(item) = snapshots.next().await {
            match item {
                Ok(snapshot) => {
                    for event in events_for_transition(&mut adapter, &snapshot) {
                        yield event;
                    }
                    last_snapshot = Some(snapshot);
                }
                Err(error) => {
                    yield StreamEvent::Error(ErrorPayload {
                        error: format!("{error:?}"),
                        message: escape(&error.to_string()),
                    });
                    return;
                }
            }
        }

        yield StreamEvent::Done(DonePayload {
            final_answer: last_snapshot.and_then(|s| s.generation).map(|g| escape(&g)),
            status: "completed",
        });
    }
}

/// Compute the events a single snapshot transition produces, updating the
/// adapter's diff state in place: `documents` (first non-empty only),
/// `workflow_step` (on loop_step or web_search_needed change), `chunk` (on
/// generation change), in that order.
fn events_for_transition(adapter: &mut AdapterState, snapshot: &RunStateSnapshot) -> Vec<StreamEvent> {
    let mut events = Vec::new();

    if !adapter.emitted_documents && !snapshot.documents.is_empty() {
        adapter.emitted_documents = true;
        events.push(StreamEvent::Documents(DocumentsPayload {
            documents: snapshot
                .documents
                .iter()
                .take(MAX_DOCUMENTS_IN_EVENT)
                .map(|d| escape(&d.text))
                .collect(),
        }));
    }

    let loop_step_changed = adapter.last_loop_step != Some(snapshot.loop_step);
    let web_search_changed = adapter.last_web_search_needed != Some(snapshot.web_search_needed);
    if loop_step_changed || web_search_changed {
        adapter.last_loop_step = Some(snapshot.loop_step);
        adapter.last_web_search_needed = Some(snapshot.web_search_needed);
        events.push(StreamEvent::WorkflowStep(WorkflowStepPayload {
            loop_step: snapshot.loop_step,
            web_search_needed: snapshot.web_search_needed,
        }));
    }

    if let Some(generation) = &snapshot.generation {
        if generation != &adapter.last_generation {
            let chunk = if let Some(suffix) = generation.strip_prefix(&adapter.last_generation) {
                suffix.to_string()
            } else {
                // Shorter or otherwise non-extending generation: a full
                // retry. Emit the whole new generation as one chunk.
                generation.clone()
            };
            adapter.last_generation = generation.clone();
            events.push(StreamEvent::Chunk(ChunkPayload { text: escape(&chunk) }));
        }
    }

    events
}

/// Serialize a [`StreamEvent`] to the JSON body used in the SSE wire format
/// (see [`crate::sse::format_sse`]).
pub fn event_payload_json(event: &StreamEvent) -> Value {
    serde_json::to_value(event).unwrap_or(Value::Null)
}
