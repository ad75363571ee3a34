//! Loose JSON extraction from model completions
//!
//! Models do not reliably emit bare JSON: completions arrive wrapped in
//! prose, code fences or both. Extraction strips fences, then decodes the
//! span from the first `{`/`[` to the last `}`/`]`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Leading code fence, optionally tagged `json` (any case)
static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^`{2,3}(?:json)?\s*").expect("leading fence regex"));

/// Trailing code fence
static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`{2,3}\s*$").expect("trailing fence regex"));

/// Completion could not be reduced to the expected shape
#[derive(Debug, Error)]
pub enum ParseError {
    /// No `{`..`}` / `[`..`]` span anywhere in the completion
    #[error("no JSON found in completion")]
    NoJsonFound,

    /// The extracted span is not valid JSON
    #[error("completion JSON does not decode: {0}")]
    Decode(String),

    /// Decoded JSON carries no `predictions` object
    #[error("completion JSON carries no 'predictions' object")]
    MissingPredictions,
}

/// Topic/sentiment lists recovered from one completion
///
/// Entries are kept as raw JSON values; the output formatter coerces them
/// to strings. The two lists are independent: nothing guarantees that
/// `topics[i]` and `sentiments[i]` describe the same aspect.
#[derive(Debug, Clone, Default)]
pub struct ModelPrediction {
    pub topics: Vec<Value>,
    pub sentiments: Vec<Value>,
}

/// Extract the `{topics, sentiments}` lists from a raw completion
///
/// Fields that are present but not list-shaped coerce to empty lists
/// rather than failing.
pub fn parse_completion(raw: &str) -> Result<ModelPrediction, ParseError> {
    let text = raw.trim();
    let text = LEADING_FENCE.replace(text, "");
    let text = TRAILING_FENCE.replace(&text, "");

    let span = extract_json_span(&text).ok_or(ParseError::NoJsonFound)?;

    let value: Value =
        serde_json::from_str(span).map_err(|e| ParseError::Decode(e.to_string()))?;

    let envelope = value
        .get("predictions")
        .and_then(Value::as_object)
        .ok_or(ParseError::MissingPredictions)?;

    let as_list = |key: &str| -> Vec<Value> {
        envelope
            .get(key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    };

    Ok(ModelPrediction {
        topics: as_list("topics"),
        sentiments: as_list("sentiments"),
    })
}

/// Greedy span from the first opening bracket to the last closing bracket
///
/// Known limitation: a completion containing several independent JSON
/// fragments yields one span covering all of them, which then fails to
/// decode.
fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let end = text.rfind(['}', ']'])?;
    if start >= end {
        return None;
    }
    Some(&text[start..=end])
}
