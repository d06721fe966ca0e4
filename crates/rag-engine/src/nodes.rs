//! The four node functions (spec.md §4.C). Each takes the current
//! [`RunState`] and [`RunContext`] and returns a [`StateDelta`]; none of them
//! mutate the state directly (spec.md §3, "Ownership").

use tracing::{debug, instrument, warn};

use crate::collaborators::RunContext;
use crate::error::{GraphError, Result};
use crate::judge::parse_binary_score;
use crate::prompts::{self, DOC_GRADER_SYSTEM, RAG_ANSWER_SYSTEM};
use crate::state::{Document, RunState, StateDelta};

/// `retrieve`: fetch documents for `question` from the corpus. Any
/// retriever failure is fatal (spec.md §4.C).
#[instrument(skip(state, ctx), fields(question = %state.question))]
pub async fn retrieve(state: &RunState, ctx: &RunContext) -> Result<StateDelta> {
    let retrieved = ctx
        .retriever
        .retrieve(&state.question)
        .await
        .map_err(|e| GraphError::retrieval(e))?;
    debug!(count = retrieved.len(), "retrieve returned documents");
    let documents = retrieved.into_iter().map(|d| Document::new(d.text)).collect();
    Ok(StateDelta::documents(documents))
}

/// `grade_documents`: keep only documents the grader marks relevant,
/// fail-open on an unparseable grader response (spec.md §4.C).
#[instrument(skip(state, ctx), fields(input_count = state.documents.len()))]
pub async fn grade_documents(state: &RunState, ctx: &RunContext) -> Result<StateDelta> {
    let mut kept = Vec::with_capacity(state.documents.len());
    for document in &state.documents {
        let human_prompt = prompts::render_doc_grader(&document.text, &state.question);
        let raw = ctx
            .language_model
            .chat_structured(DOC_GRADER_SYSTEM, &human_prompt)
            .await
            .map_err(|e| GraphError::language_model(e))?;
        match parse_binary_score(&raw) {
            Some(true) => kept.push(document.clone()),
            Some(false) => debug!(text = %document.text, "document graded irrelevant"),
            None => {
                warn!(text = %document.text, "doc grader response unparseable, keeping document (fail-open)");
                kept.push(document.clone());
            }
        }
    }
    let web_search_needed = kept.is_empty();
    Ok(StateDelta {
        documents: Some(kept),
        web_search_needed: Some(web_search_needed),
        ..StateDelta::none()
    })
}

/// `generate`: the only node that advances `loop_step`. A language-model
/// failure here is fatal — there is no fallback generation (spec.md §4.C,
/// §7).
#[instrument(skip(state, ctx), fields(loop_step = state.loop_step))]
pub async fn generate(state: &RunState, ctx: &RunContext) -> Result<StateDelta> {
    let context = state
        .documents
        .iter()
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let human_prompt = prompts::render_rag_answer(&context, &state.question);
    let generation = ctx
        .language_model
        .chat(RAG_ANSWER_SYSTEM, &human_prompt)
        .await
        .map_err(|e| GraphError::language_model(e))?;
    Ok(StateDelta {
        generation: Some(generation),
        loop_step_delta: Some(1),
        ..StateDelta::none()
    })
}

/// `web_search`: append one synthesized Document from the web-search tool's
/// result. A web-search failure is fatal — there is no recovery path from
/// here (spec.md §4.C).
#[instrument(skip(state, ctx))]
pub async fn web_search(state: &RunState, ctx: &RunContext) -> Result<StateDelta> {
    let result = ctx
        .web_search
        .search(&state.question, ctx.web_search_top_k)
        .await
        .map_err(|e| GraphError::web_search(e))?;
    let mut documents = state.documents.clone();
    documents.push(Document::with_metadata(result.content, "source", "web_search"));
    Ok(StateDelta::documents(documents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{LanguageModel, Retriever, RetrievedDocument, WebSearchResult, WebSearchTool};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedRetriever(Vec<&'static str>);

    #[async_trait]
    impl Retriever for FixedRetriever {
        async fn retrieve(&self, _question: &str) -> Result<Vec<RetrievedDocument>> {
            Ok(self.0.iter().map(|t| RetrievedDocument { text: t.to_string() }).collect())
        }
    }

    struct ScriptedLlm {
        structured: Vec<String>,
        chat: String,
    }

    #[async_trait]
    impl LanguageModel for ScriptedLlm {
        async fn chat(&self, _system: &str, _human: &str) -> Result<String> {
            Ok(self.chat.clone())
        }
        async fn chat_structured(&self, _system: &str, _human: &str) -> Result<String> {
            Ok(self.structured.clone().into_iter().next().unwrap_or_default())
        }
    }

    struct FailingWebSearch;

    #[async_trait]
    impl WebSearchTool for FailingWebSearch {
        async fn search(&self, _query: &str, _top_k: u32) -> Result<WebSearchResult> {
            Err(GraphError::web_search("boom"))
        }
    }

    fn ctx_with(llm_structured: &str, llm_chat: &str) -> RunContext {
        RunContext::new(
            Arc::new(FixedRetriever(vec!["doc-a", "doc-b"])),
            Arc::new(ScriptedLlm {
                structured: vec![llm_structured.to_string()],
                chat: llm_chat.to_string(),
            }),
            Arc::new(FailingWebSearch),
        )
    }

    #[tokio::test]
    async fn retrieve_populates_documents_in_order() {
        let state = RunState::new("q", 3, "s1");
        let ctx = ctx_with("{}", "");
        let delta = retrieve(&state, &ctx).await.unwrap();
        let docs = delta.documents.unwrap();
        assert_eq!(docs[0].text, "doc-a");
        assert_eq!(docs[1].text, "doc-b");
    }

    #[tokio::test]
    async fn grade_documents_fails_open_on_unparseable_response() {
        let mut state = RunState::new("q", 3, "s1");
        state.documents = vec![Document::new("doc-a")];
        let ctx = ctx_with("not json", "");
        let delta = grade_documents(&state, &ctx).await.unwrap();
        assert_eq!(delta.documents.unwrap().len(), 1);
        assert_eq!(delta.web_search_needed, Some(false));
    }

    #[tokio::test]
    async fn grade_documents_sets_web_search_needed_when_all_filtered() {
        let mut state = RunState::new("q", 3, "s1");
        state.documents = vec![Document::new("doc-a")];
        let ctx = ctx_with(r#"{"binary_score": "no"}"#, "");
        let delta = grade_documents(&state, &ctx).await.unwrap();
        assert_eq!(delta.documents.unwrap().len(), 0);
        assert_eq!(delta.web_search_needed, Some(true));
    }

    #[tokio::test]
    async fn generate_advances_loop_step_by_one() {
        let state = RunState::new("q", 3, "s1");
        let ctx = ctx_with("", "an answer");
        let delta = generate(&state, &ctx).await.unwrap();
        assert_eq!(delta.loop_step_delta, Some(1));
        assert_eq!(delta.generation.as_deref(), Some("an answer"));
    }

    #[tokio::test]
    async fn web_search_failure_is_fatal() {
        let state = RunState::new("q", 3, "s1");
        let ctx = ctx_with("", "");
        let err = web_search(&state, &ctx).await.unwrap_err();
        assert!(matches!(err, GraphError::WebSearchFailure(_)));
    }
}
