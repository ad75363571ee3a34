//! Assembly of the batch response payload
//!
//! Converts raw per-unit results into the `{predictions, warnings}` shape.
//! Every input id gets exactly one prediction, failed or not; diagnostics
//! accumulate into a single semicolon-joined warnings string.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pipeline::classifier::{RawModelResult, TaskOutcome};
use crate::pipeline::input::ValidationError;
use crate::pipeline::response;

/// Structured result for one review
///
/// `topics` and `sentiments` are independent lists; same-index entries are
/// not guaranteed to describe the same aspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: i64,
    pub topics: Vec<String>,
    pub sentiments: Vec<String>,
}

impl Prediction {
    /// Placeholder emitted for units that produced nothing usable
    pub fn empty(id: i64) -> Self {
        Self {
            id,
            topics: Vec::new(),
            sentiments: Vec::new(),
        }
    }
}

/// Externally visible result of one batch call
///
/// Prediction order is completion order, not input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub predictions: Vec<Prediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<String>,
}

/// Outcome for input that never reached the worker pool
pub fn invalid_input(error: &ValidationError) -> BatchOutcome {
    BatchOutcome {
        predictions: Vec::new(),
        warnings: Some(format!("Invalid input: {error}")),
    }
}

/// Convert raw unit results into the final payload
pub fn format_results(results: Vec<RawModelResult>) -> BatchOutcome {
    let mut predictions = Vec::with_capacity(results.len());
    let mut warnings: Vec<String> = Vec::new();

    for result in results {
        match result.outcome {
            TaskOutcome::Failed(error) => {
                warnings.push(format!("item_id={}: {}", result.id, error));
                predictions.push(Prediction::empty(result.id));
            }
            TaskOutcome::Completed(text) if text.trim().is_empty() => {
                // An explicitly empty model answer is not an error.
                predictions.push(Prediction::empty(result.id));
            }
            TaskOutcome::Completed(text) => match response::parse_completion(&text) {
                Ok(parsed) => predictions.push(Prediction {
                    id: result.id,
                    topics: parsed.topics.iter().map(coerce_to_string).collect(),
                    sentiments: parsed.sentiments.iter().map(coerce_to_string).collect(),
                }),
                Err(e) => {
                    warnings.push(format!("parsing failed for id={}: {}", result.id, e));
                    predictions.push(Prediction::empty(result.id));
                }
            },
        }
    }

    BatchOutcome {
        predictions,
        warnings: if warnings.is_empty() {
            None
        } else {
            Some(warnings.join("; "))
        },
    }
}

/// Coerce one list entry to a string, mirroring how dynamic upstreams
/// stringify scalars
fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
