//! The executor: drives the compiled graph through its supersteps, emitting
//! a pull-driven, one-snapshot-ahead stream of [`RunStateSnapshot`]s and
//! optionally checkpointing after each transition.
//!
//! Grounded on the teacher's Pregel-style `pregel::executor`/`loop_impl`
//! superstep loop and its streaming backpressure contract: the run executes
//! as its own spawned task that hands snapshots to the consumer over a
//! `bounded(1)` channel. This gives cancellation exactly the semantics a
//! cooperative single-task run needs — when the consumer drops its
//! receiver, the task's next `send` fails and the loop exits, but whatever
//! external call was already in flight for that step is allowed to finish;
//! its result is computed and then simply never delivered.

use std::pin::Pin;
use std::sync::Arc;

use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use rag_checkpoint::{Checkpoint, CheckpointMetadata, CheckpointSaver, CheckpointSource};

use crate::collaborators::RunContext;
use crate::error::{GraphError, Result};
use crate::graph::{CompiledGraph, NodeId};
use crate::nodes;
use crate::routers::{decide_to_generate, route_question, DecideLabel, GenerationLabel, RouteLabel};
use crate::state::{RunState, RunStateSnapshot};

/// A snapshot sequence item: `Ok` for every successful transition, at most
/// one terminal `Err` for a fatal failure — exactly one of `done`/`error`
/// reaches the consumer, and it is last; the streaming adapter in
/// [`crate::stream`] is what turns this into those two named events.
pub type SnapshotStream = Pin<Box<dyn Stream<Item = Result<RunStateSnapshot>> + Send>>;

/// Drives one compiled graph. Stateless and cheap to share across runs —
/// all per-run state lives in the `RunState`/`RunContext` passed to
/// [`Executor::stream`], not in the executor itself.
pub struct Executor {
    graph: CompiledGraph,
    checkpoint: Option<Arc<dyn CheckpointSaver>>,
}

impl Executor {
    /// An executor with no checkpoint store: `history` always returns an
    /// empty history and transitions are simply not persisted.
    pub fn new() -> Self {
        Self {
            graph: CompiledGraph::build(),
            checkpoint: None,
        }
    }

    /// An executor that persists every transition through `saver`.
    pub fn with_checkpoint_saver(saver: Arc<dyn CheckpointSaver>) -> Self {
        Self {
            graph: CompiledGraph::build(),
            checkpoint: Some(saver),
        }
    }

    /// Read-only accessor to the fixed topology, for introspection and
    /// tests.
    pub fn graph(&self) -> &CompiledGraph {
        &self.graph
    }

    /// Run the graph for `initial_state`, returning a lazy, pull-driven
    /// sequence of snapshots. The caller must poll the stream to make
    /// progress; dropping it before exhaustion cancels the run at the next
    /// suspension point.
    pub fn stream(&self, initial_state: RunState, ctx: RunContext) -> SnapshotStream {
        let (tx, rx) = mpsc::channel(1);
        let checkpoint = self.checkpoint.clone();
        tokio::spawn(run_loop(initial_state, ctx, checkpoint, tx));
        Box::pin(ReceiverStream::new(rx))
    }

    /// Read a session's checkpointed history in ascending step order
    /// (spec.md §4.F, "History"; SPEC_FULL.md §9, "History replay").
    /// Returns an empty vector if this executor has no checkpoint store.
    pub async fn history(&self, session_key: &str) -> Result<Vec<(u64, RunStateSnapshot)>> {
        let Some(saver) = &self.checkpoint else {
            return Ok(Vec::new());
        };
        let checkpoints = saver.get_history(&session_key.to_string()).await?;
        checkpoints
            .into_iter()
            .map(|cp| {
                let snapshot: RunStateSnapshot = serde_json::from_value(cp.snapshot)
                    .map_err(|e| GraphError::Execution(format!("corrupt checkpoint snapshot: {e}")))?;
                Ok((cp.step_index, snapshot))
            })
            .collect()
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_loop(
    mut state: RunState,
    ctx: RunContext,
    checkpoint: Option<Arc<dyn CheckpointSaver>>,
    tx: mpsc::Sender<Result<RunStateSnapshot>>,
) {
    let mut next = match route_question(&state.question, &ctx).await {
        RouteLabel::Vectorstore => NodeId::Retrieve,
        RouteLabel::Websearch => NodeId::WebSearch,
    };
    let mut step_index: u64 = 0;

    loop {
        let delta = match next {
            NodeId::Retrieve => nodes::retrieve(&state, &ctx).await,
            NodeId::GradeDocuments => nodes::grade_documents(&state, &ctx).await,
            NodeId::Generate => nodes::generate(&state, &ctx).await,
            NodeId::WebSearch => nodes::web_search(&state, &ctx).await,
            NodeId::Terminal => unreachable!("loop exits before advancing onto Terminal"),
        };

        let delta = match delta {
            Ok(delta) => delta,
            Err(error) => {
                let _ = tx.send(Err(error)).await;
                return;
            }
        };
        state.apply(delta);

        if let Some(saver) = &checkpoint {
            let metadata = CheckpointMetadata {
                source: CheckpointSource::Loop,
                node: Some(next.to_string()),
            };
            match serde_json::to_value(state.snapshot()) {
                Ok(value) => {
                    let cp = Checkpoint::new(state.session_id.clone(), step_index, value, metadata);
                    if let Err(e) = saver.put(cp).await {
                        warn!(error = %e, session_id = %state.session_id, step_index, "checkpoint write failed, continuing run");
                    }
                }
                Err(e) => warn!(error = %e, "failed to serialize snapshot for checkpointing"),
            }
        }

        debug!(node = %next, loop_step = state.loop_step, "node transition complete");
        if tx.send(Ok(state.snapshot())).await.is_err() {
            debug!("consumer dropped the stream, abandoning run");
            return;
        }
        step_index += 1;

        next = match next {
            NodeId::Retrieve => NodeId::GradeDocuments,
            NodeId::GradeDocuments => match decide_to_generate(&state) {
                DecideLabel::Websearch => NodeId::WebSearch,
                DecideLabel::Generate => NodeId::Generate,
            },
            NodeId::WebSearch => NodeId::Generate,
            NodeId::Generate => {
                let label = match crate::routers::grade_generation(&state, &ctx).await {
                    Ok(label) => label,
                    Err(error) => {
                        let _ = tx.send(Err(error)).await;
                        return;
                    }
                };
                match label {
                    GenerationLabel::Useful | GenerationLabel::MaxRetries => NodeId::Terminal,
                    GenerationLabel::NotSupported => NodeId::Generate,
                    GenerationLabel::NotUseful => NodeId::WebSearch,
                }
            }
            NodeId::Terminal => unreachable!(),
        };

        if next == NodeId::Terminal {
            return;
        }
    }
}
