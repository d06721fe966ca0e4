//! The three router functions (spec.md §4.D). Each reads the run state and
//! returns a closed, exhaustively-matched label enum rather than a free
//! string (spec.md §9, "Conditional routing → tagged enum") — the graph
//! builder (`crate::graph`) maps each label to its successor node.

use tracing::{instrument, warn};

use crate::collaborators::RunContext;
use crate::error::{GraphError, Result};
use crate::judge::{parse_binary_score, parse_datasource, Datasource};
use crate::prompts::{self, ANSWER_GRADER_SYSTEM, HALLUCINATION_GRADER_SYSTEM, ROUTER_SYSTEM};
use crate::state::RunState;

/// Label returned by the conditional entry router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteLabel {
    Vectorstore,
    Websearch,
}

/// Label returned after `grade_documents`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecideLabel {
    Websearch,
    Generate,
}

/// Label returned after `generate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationLabel {
    Useful,
    NotSupported,
    NotUseful,
    MaxRetries,
}

/// `route_question`: picks the entry node. Defaults to `Vectorstore` on any
/// parse or transport failure — the private corpus is the safer default
/// (spec.md §4.D).
#[instrument(skip(ctx), fields(question = %question))]
pub async fn route_question(question: &str, ctx: &RunContext) -> RouteLabel {
    let human_prompt = prompts::render_router(question);
    let raw = match ctx.language_model.chat_structured(ROUTER_SYSTEM, &human_prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "router LM call failed, defaulting to vectorstore");
            return RouteLabel::Vectorstore;
        }
    };
    match parse_datasource(&raw) {
        Some(Datasource::Vectorstore) => RouteLabel::Vectorstore,
        Some(Datasource::Websearch) => RouteLabel::Websearch,
        None => {
            warn!(response = %raw, "router response unparseable, defaulting to vectorstore");
            RouteLabel::Vectorstore
        }
    }
}

/// `decide_to_generate`: a pure function of `web_search_needed`, no LM call
/// and no fallback needed (spec.md §4.D).
pub fn decide_to_generate(state: &RunState) -> DecideLabel {
    if state.web_search_needed {
        DecideLabel::Websearch
    } else {
        DecideLabel::Generate
    }
}

/// `grade_generation`: the two-phase hallucination-then-answer-quality check
/// (spec.md §4.D). On a grader parse failure at either phase, the label is
/// `MaxRetries` — the defensive choice that prevents a runaway loop when the
/// grader itself is misbehaving, per spec.md's explicit fallback rule.
#[instrument(skip(state, ctx), fields(loop_step = state.loop_step, max_retries = state.max_retries))]
pub async fn grade_generation(state: &RunState, ctx: &RunContext) -> Result<GenerationLabel> {
    let generation = state
        .generation
        .as_deref()
        .ok_or_else(|| GraphError::Execution("grade_generation called before generate produced output".into()))?;
    let documents = state
        .documents
        .iter()
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let hallucination_prompt = prompts::render_hallucination_grader(&documents, generation);
    let hallucination_raw = ctx
        .language_model
        .chat_structured(HALLUCINATION_GRADER_SYSTEM, &hallucination_prompt)
        .await
        .map_err(|e| GraphError::language_model(e))?;

    let grounded = match parse_binary_score(&hallucination_raw) {
        Some(score) => score,
        None => {
            warn!("hallucination grader response unparseable, defaulting to max retries");
            return Ok(GenerationLabel::MaxRetries);
        }
    };

    if !grounded {
        return Ok(if state.loop_step <= state.max_retries {
            GenerationLabel::NotSupported
        } else {
            GenerationLabel::MaxRetries
        });
    }

    let answer_prompt = prompts::render_answer_grader(&state.question, generation);
    let answer_raw = ctx
        .language_model
        .chat_structured(ANSWER_GRADER_SYSTEM, &answer_prompt)
        .await
        .map_err(|e| GraphError::language_model(e))?;

    match parse_binary_score(&answer_raw) {
        Some(true) => Ok(GenerationLabel::Useful),
        Some(false) => Ok(if state.loop_step <= state.max_retries {
            GenerationLabel::NotUseful
        } else {
            GenerationLabel::MaxRetries
        }),
        None => {
            warn!("answer grader response unparseable, defaulting to max retries");
            Ok(GenerationLabel::MaxRetries)
        }
    }
}
