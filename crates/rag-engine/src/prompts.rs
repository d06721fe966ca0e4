//! The prompt catalogue: five fixed templates with named `{placeholder}`
//! slots, resolved by pure string substitution (spec.md §3, §4.B).
//!
//! No templating engine is pulled in for this — the teacher's own prompt
//! assembly (`llm::traits`/`llm::config` call sites) does the same plain
//! `format!`/`replace` substitution rather than reaching for a crate like
//! `handlebars`, and five fixed placeholders don't warrant one here either.

/// System prompt for the `generate` node. Placeholders: none — this is the
/// fixed instruction; the per-call content goes in the human prompt built by
/// [`render_rag_answer`].
pub const RAG_ANSWER_SYSTEM: &str = "You are an assistant for question-answering tasks. \
Use the following pieces of retrieved context to answer the question. If you \
don't know the answer, just say that you don't know. Use three sentences \
maximum and keep the answer concise.";

/// System prompt for `grade_documents`. Expects a JSON object
/// `{\"binary_score\": \"yes\"|\"no\"}`.
pub const DOC_GRADER_SYSTEM: &str = "You are a grader assessing relevance of a \
retrieved document to a user question. If the document contains keyword(s) or \
semantic meaning related to the question, grade it as relevant. Give a binary \
score 'yes' or 'no' as a JSON with a single key 'binary_score' and no \
premable or explanation.";

/// System prompt for `route_question`. Expects a JSON object
/// `{\"datasource\": \"vectorstore\"|\"websearch\"}`.
pub const ROUTER_SYSTEM: &str = "You are an expert at routing a user question \
to a vectorstore or web search. The vectorstore contains documents related to \
the indexed corpus. Use the vectorstore for questions on these topics. \
Otherwise, use web-search. Return a JSON with a single key 'datasource' and \
no premable or explanation.";

/// System prompt for the hallucination-check phase of `grade_generation`.
/// Expects a JSON object `{\"binary_score\": \"yes\"|\"no\"}`.
pub const HALLUCINATION_GRADER_SYSTEM: &str = "You are a grader assessing \
whether an LLM generation is grounded in / supported by a set of retrieved \
facts. Give a binary score 'yes' or 'no'. 'Yes' means that the answer is \
grounded in / supported by the set of facts. Return a JSON with a single key \
'binary_score' and no preamble or explanation.";

/// System prompt for the answer-quality phase of `grade_generation`. Expects
/// a JSON object `{\"binary_score\": \"yes\"|\"no\"}`.
pub const ANSWER_GRADER_SYSTEM: &str = "You are a grader assessing whether an \
answer addresses / resolves a question. Give a binary score 'yes' or 'no'. \
'Yes' means that the answer resolves the question. Return a JSON with a \
single key 'binary_score' and no preamble or explanation.";

/// Fill `RAG_ANSWER`'s human turn: `{context}`, `{question}`.
pub fn render_rag_answer(context: &str, question: &str) -> String {
    format!("Question: {question}\nContext: {context}\nAnswer:")
}

/// Fill `DOC_GRADER`'s human turn: `{document}`, `{question}`.
pub fn render_doc_grader(document: &str, question: &str) -> String {
    format!("Retrieved document: \n\n{document}\n\nUser question: {question}")
}

/// Fill `ROUTER`'s human turn. No placeholders other than the question
/// itself, which is the entire human turn (spec.md §4.B).
pub fn render_router(question: &str) -> String {
    question.to_string()
}

/// Fill `HALLUCINATION_GRADER`'s human turn: `{documents}`, `{generation}`.
pub fn render_hallucination_grader(documents: &str, generation: &str) -> String {
    format!("Set of facts: \n\n{documents}\n\nLLM generation: {generation}")
}

/// Fill `ANSWER_GRADER`'s human turn: `{question}`, `{generation}`.
pub fn render_answer_grader(question: &str, generation: &str) -> String {
    format!("User question: \n\n{question}\n\nLLM generation: {generation}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rag_answer_interpolates_both_placeholders() {
        let rendered = render_rag_answer("ctx-A", "what is rag?");
        assert!(rendered.contains("ctx-A"));
        assert!(rendered.contains("what is rag?"));
    }

    #[test]
    fn router_human_turn_is_the_bare_question() {
        assert_eq!(render_router("hello"), "hello");
    }
}
