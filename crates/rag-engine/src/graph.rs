//! Graph builder: the fixed topology of five states plus a terminal marker,
//! assembled once and reused by every run.
//!
//! The teacher's `StateGraph<S>` is fully generic — nodes and edges are
//! registered at runtime into a `Graph` that the executor walks. This
//! engine's topology never varies (exactly five nodes and three routers),
//! so the "builder" here is a `const fn`-shaped constructor that returns an
//! already-fixed [`CompiledGraph`] rather than a mutable graph under
//! construction — there is nothing to misconfigure.

use std::fmt;

/// A node in the fixed topology, plus the synthetic `Terminal` marker (the
/// teacher's `END`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    Retrieve,
    GradeDocuments,
    Generate,
    WebSearch,
    Terminal,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeId::Retrieve => "retrieve",
            NodeId::GradeDocuments => "grade_documents",
            NodeId::Generate => "generate",
            NodeId::WebSearch => "web_search",
            NodeId::Terminal => "[terminal]",
        };
        f.write_str(name)
    }
}

/// A read-only description of the graph's topology, exposed for
/// introspection and tests — not a generic visualization layer, just the
/// fixed node/edge lists themselves.
#[derive(Debug, Clone, Copy)]
pub struct CompiledGraph;

impl CompiledGraph {
    /// Build the one and only topology this engine runs. There is no
    /// fallible construction path — the topology is fixed at compile time —
    /// so unlike the teacher's `StateGraph::compile()` this never returns a
    /// `Result`.
    pub const fn build() -> Self {
        CompiledGraph
    }

    /// All non-terminal nodes, in execution order.
    pub fn nodes(&self) -> &'static [NodeId] {
        &[NodeId::Retrieve, NodeId::GradeDocuments, NodeId::Generate, NodeId::WebSearch]
    }

    /// The graph's unconditional edges: `retrieve -> grade_documents` and
    /// `web_search -> generate`. Conditional edges are resolved at runtime
    /// by the executor calling the router functions directly rather than
    /// being listed here as data — the routers already hold their own full
    /// decision tables, so duplicating them as edge data would just be a
    /// second, driftable copy of the same logic.
    pub fn static_edges(&self) -> &'static [(NodeId, NodeId)] {
        &[(NodeId::Retrieve, NodeId::GradeDocuments), (NodeId::WebSearch, NodeId::Generate)]
    }
}
