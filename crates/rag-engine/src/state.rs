//! The run state: a single typed record threaded through every node, plus
//! the delta type nodes return and the merge rule that folds a delta back
//! into the state.
//!
//! Grounded on the teacher's dynamic-typed-state-to-product-type translation
//! (`langgraph-core::state`/`channel` reducer pattern): in the general
//! library, channels are pluggable and reducers are configurable per field;
//! here there is exactly one channel (the whole state) and exactly one
//! non-default reducer (`loop_step` accumulates by addition), so the merge is
//! inlined as a single method rather than a generic reducer registry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An immutable retrieved or synthesized chunk of text plus arbitrary
/// string-keyed metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub metadata: HashMap<String, String>,
}

impl Document {
    /// A document with no metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: HashMap::new(),
        }
    }

    /// A document tagged with a single metadata key, the common case (e.g.
    /// `source = "web_search"`).
    pub fn with_metadata(text: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert(key.into(), value.into());
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// The live run state. Held exclusively by the executor; nodes receive a
/// shared reference and return a [`StateDelta`], never a mutated copy of
/// this type.
#[derive(Debug, Clone)]
pub struct RunState {
    pub question: String,
    pub documents: Vec<Document>,
    pub generation: Option<String>,
    pub web_search_needed: bool,
    pub max_retries: u32,
    pub loop_step: u32,
    pub session_id: String,
}

impl RunState {
    /// Construct the initial state for a run. `documents`, `generation` and
    /// `web_search_needed` start empty/absent/false; `loop_step` starts at 0.
    pub fn new(question: impl Into<String>, max_retries: u32, session_id: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            documents: Vec::new(),
            generation: None,
            web_search_needed: false,
            max_retries,
            loop_step: 0,
            session_id: session_id.into(),
        }
    }

    /// Fold a node's delta into this state. Every field the delta sets
    /// replaces the current value, except `loop_step`, which accumulates.
    pub fn apply(&mut self, delta: StateDelta) {
        if let Some(documents) = delta.documents {
            self.documents = documents;
        }
        if let Some(generation) = delta.generation {
            self.generation = Some(generation);
        }
        if let Some(web_search_needed) = delta.web_search_needed {
            self.web_search_needed = web_search_needed;
        }
        if let Some(loop_step_delta) = delta.loop_step_delta {
            self.loop_step += loop_step_delta;
        }
    }

    /// A serializable, retriever-free view of this state suitable for
    /// checkpointing and for the streaming adapter. The live collaborator
    /// handles (`Retriever`, `LanguageModel`, `WebSearchTool`) never appear
    /// in `RunState` itself — see [`crate::collaborators::RunContext`] — so
    /// there is nothing non-serializable to strip here; this exists mainly
    /// to pin a stable, explicit wire shape independent of field order.
    pub fn snapshot(&self) -> RunStateSnapshot {
        RunStateSnapshot {
            question: self.question.clone(),
            documents: self.documents.clone(),
            generation: self.generation.clone(),
            web_search_needed: self.web_search_needed,
            max_retries: self.max_retries,
            loop_step: self.loop_step,
            session_id: self.session_id.clone(),
        }
    }
}

/// Serializable snapshot of a [`RunState`] at a point in time. This is what
/// gets checkpointed and what the streaming adapter diffs against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStateSnapshot {
    pub question: String,
    pub documents: Vec<Document>,
    pub generation: Option<String>,
    pub web_search_needed: bool,
    pub max_retries: u32,
    pub loop_step: u32,
    pub session_id: String,
}

/// A node's return value: each field is `Some` iff that node is updating it.
/// `None` means "leave unchanged". `loop_step_delta` is the one field merged
/// by addition rather than replacement; all current nodes other than
/// `generate` leave it `None`.
#[derive(Debug, Clone, Default)]
pub struct StateDelta {
    pub documents: Option<Vec<Document>>,
    pub generation: Option<String>,
    pub web_search_needed: Option<bool>,
    pub loop_step_delta: Option<u32>,
}

impl StateDelta {
    /// The empty delta: no field changes.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn documents(documents: Vec<Document>) -> Self {
        Self {
            documents: Some(documents),
            ..Self::default()
        }
    }

    pub fn web_search_needed(flag: bool) -> Self {
        Self {
            web_search_needed: Some(flag),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_delta_fields_leave_state_unchanged() {
        let mut state = RunState::new("q", 3, "s1");
        state.documents = vec![Document::new("doc-1")];
        state.apply(StateDelta::none());
        assert_eq!(state.documents.len(), 1);
        assert_eq!(state.loop_step, 0);
    }

    #[test]
    fn loop_step_accumulates_by_addition() {
        let mut state = RunState::new("q", 3, "s1");
        state.apply(StateDelta {
            loop_step_delta: Some(1),
            ..StateDelta::none()
        });
        state.apply(StateDelta {
            loop_step_delta: Some(1),
            ..StateDelta::none()
        });
        assert_eq!(state.loop_step, 2);
    }

    #[test]
    fn documents_replace_not_append() {
        let mut state = RunState::new("q", 3, "s1");
        state.documents = vec![Document::new("a"), Document::new("b")];
        state.apply(StateDelta::documents(vec![Document::new("a")]));
        assert_eq!(state.documents.len(), 1);
    }
}
