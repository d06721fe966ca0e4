//! Defensive parsing of structured LanguageModel output.
//!
//! Grounded on spec.md §9 ("parse-then-validate... do not rely on the
//! language model to produce valid JSON") and on the teacher's general
//! practice of never trusting an external call's output shape without a
//! fallback. Every grader/router in [`crate::nodes`] and [`crate::routers`]
//! goes through [`parse_binary_score`] or [`parse_datasource`] rather than
//! inlining its own `serde_json::from_str`, so the "what counts as
//! unparseable" rule lives in exactly one place.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct BinaryScoreResponse {
    binary_score: String,
}

#[derive(Debug, Deserialize)]
struct DatasourceResponse {
    datasource: String,
}

/// Parse a `{"binary_score": "yes"|"no"}` response. Returns `None` if the
/// text isn't JSON, lacks the key, or the value isn't exactly `"yes"`/`"no"` —
/// callers treat `None` as the soft `LMParseFailure` of spec.md §7 and apply
/// their own node-local default.
pub fn parse_binary_score(raw: &str) -> Option<bool> {
    let parsed: BinaryScoreResponse = serde_json::from_str(raw.trim()).ok()?;
    match parsed.binary_score.trim().to_ascii_lowercase().as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

/// Which corpus `route_question` should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datasource {
    Vectorstore,
    Websearch,
}

/// Parse a `{"datasource": "vectorstore"|"websearch"}` response.
pub fn parse_datasource(raw: &str) -> Option<Datasource> {
    let parsed: DatasourceResponse = serde_json::from_str(raw.trim()).ok()?;
    match parsed.datasource.trim().to_ascii_lowercase().as_str() {
        "vectorstore" => Some(Datasource::Vectorstore),
        "websearch" => Some(Datasource::Websearch),
        _ => None,
    }
}
