//! Recovery of a JSON object from freeform model output.
//!
//! Models are asked for JSON but often wrap it in prose or code fences. Two
//! ways of locating the object are supported:
//!
//! * [`ExtractionStrategy::Greedy`] takes everything from the first `{` to
//!   the last `}`. Two objects separated by prose are captured together and
//!   then fail to parse.
//! * [`ExtractionStrategy::Balanced`] takes the first brace-balanced object
//!   starting at the first `{`, skipping braces inside string literals.
//!
//! No repair is attempted on the span. It parses or it doesn't.

use common::models::AnalysisResult;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    #[default]
    Greedy,
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("no JSON object found in model output")]
    NoJsonFound,
    #[error("malformed JSON in model output: {0}")]
    MalformedJson(String),
}

pub fn extract(
    text: &str,
    strategy: ExtractionStrategy,
) -> Result<AnalysisResult, ExtractionError> {
    let span = match strategy {
        ExtractionStrategy::Greedy => greedy_span(text),
        ExtractionStrategy::Balanced => balanced_span(text),
    }
    .ok_or(ExtractionError::NoJsonFound)?;

    serde_json::from_str(span).map_err(|e| ExtractionError::MalformedJson(e.to_string()))
}

fn greedy_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn balanced_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
