//! Reasoning-trace extraction.
//!
//! Models may wrap their deliberation in `<think>` / `</think>`. Closed pairs are matched
//! non-greedily and may occur several times. An opener without a closer turns the rest of
//! the output into a trace; a closer without an opener turns the text before it into a trace.
//! The cleaned answer never contains either marker.

use std::sync::LazyLock;

use regex::Regex;

pub const THINK_OPEN: &str = "<think>";
pub const THINK_CLOSE: &str = "</think>";

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>(.*?)</think>").expect("valid think-block regex"));

/// Model output split into the user-facing answer and its reasoning traces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReasonedText {
    pub answer: String,
    pub reasoning: Vec<String>,
}

pub fn split_reasoning(raw: &str) -> ReasonedText {
    let mut reasoning = Vec::new();

    for caps in THINK_BLOCK.captures_iter(raw) {
        push_trace(&mut reasoning, &caps[1]);
    }
    let mut rest = THINK_BLOCK.replace_all(raw, "").into_owned();

    while let Some(idx) = rest.find(THINK_CLOSE) {
        push_trace(&mut reasoning, &rest[..idx]);
        rest = rest[idx + THINK_CLOSE.len()..].to_string();
    }

    if let Some(idx) = rest.find(THINK_OPEN) {
        push_trace(&mut reasoning, &rest[idx + THINK_OPEN.len()..]);
        rest.truncate(idx);
    }

    ReasonedText {
        answer: rest.trim().to_string(),
        reasoning,
    }
}

fn push_trace(reasoning: &mut Vec<String>, segment: &str) {
    let trace = segment.replace(THINK_OPEN, "");
    let trace = trace.trim();
    if !trace.is_empty() {
        reasoning.push(trace.to_string());
    }
}
