//! External collaborator traits (spec.md §6): the Retriever, LanguageModel,
//! and web-search tool the engine consumes but does not implement.
//!
//! Grounded on the teacher's `llm::traits` seam (an async trait object the
//! graph calls without knowing which provider backs it) and on
//! `original_source/llm/base.py`'s `BaseLlmModel`, which exposes exactly the
//! two methods kept here (`llm_chat_response` / `llm_json_response` →
//! [`LanguageModel::chat`] / [`LanguageModel::chat_structured`]). None of
//! these traits live on [`crate::state::RunState`] directly — only
//! `retriever` is part of the data model per spec.md §3; the language model
//! and web-search tool are bundled alongside it in [`RunContext`], which the
//! executor threads through node calls without storing in the checkpointed
//! state.

use async_trait::async_trait;

use crate::error::Result;

/// A document retrieved from the private corpus, before it's wrapped into a
/// [`crate::state::Document`] by the `retrieve` node.
#[derive(Debug, Clone)]
pub struct RetrievedDocument {
    pub text: String,
}

/// The private-corpus retriever. Implementations wrap whatever vector store
/// client the host application uses; this crate only ever calls `retrieve`.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return documents relevant to `question`, ranked best-first. The
    /// number of documents returned is entirely up to the retriever's own
    /// configured top-k (spec.md §4.C, `retrieve`).
    async fn retrieve(&self, question: &str) -> Result<Vec<RetrievedDocument>>;
}

/// The language model. Two entry points mirror
/// `original_source/llm/base.py`'s `BaseLlmModel`: free-text chat for
/// generation, and a "structured" variant that *asks* for JSON but, per
/// spec.md §4.B/§6, makes no promise the response actually parses as such —
/// every caller of `chat_structured` must apply its own fallback.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Free-text completion, used only by the `generate` node.
    async fn chat(&self, system_prompt: &str, human_prompt: &str) -> Result<String>;

    /// Completion requested in structured (JSON) form. May return anything;
    /// callers must parse defensively (spec.md §9, "parse-then-validate").
    async fn chat_structured(&self, system_prompt: &str, human_prompt: &str) -> Result<String>;
}

/// Result of a web search: concatenated content plus the URLs it came from.
#[derive(Debug, Clone)]
pub struct WebSearchResult {
    pub content: String,
    pub sources: Vec<String>,
}

/// The web-search fallback tool, used only by the `web_search` node.
#[async_trait]
pub trait WebSearchTool: Send + Sync {
    async fn search(&self, query: &str, top_k: u32) -> Result<WebSearchResult>;
}

/// The collaborators a single run shares across every node invocation.
/// Constructed once by the caller and handed to the executor; not part of
/// [`crate::state::RunState`] and never checkpointed (spec.md §3,
/// "Ownership"; §9, "Checkpointing cyclic/shared references").
///
/// Cloning an `Arc`-backed `RunContext` is cheap and is how the same
/// collaborators are shared across concurrently-executing runs (spec.md §5,
/// "Across runs").
#[derive(Clone)]
pub struct RunContext {
    pub retriever: std::sync::Arc<dyn Retriever>,
    pub language_model: std::sync::Arc<dyn LanguageModel>,
    pub web_search: std::sync::Arc<dyn WebSearchTool>,
    /// Number of documents the web-search tool should return per call.
    /// Not part of spec.md's data model; a fixed engine-level constant
    /// would have been equally faithful, but making it explicit here keeps
    /// `RunContext` the single place a caller configures collaborator
    /// behavior.
    pub web_search_top_k: u32,
}

impl RunContext {
    pub fn new(
        retriever: std::sync::Arc<dyn Retriever>,
        language_model: std::sync::Arc<dyn LanguageModel>,
        web_search: std::sync::Arc<dyn WebSearchTool>,
    ) -> Self {
        Self {
            retriever,
            language_model,
            web_search,
            web_search_top_k: 3,
        }
    }
}
