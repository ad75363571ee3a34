//! Batch input validation
//!
//! Reduces an arbitrary JSON request body to the canonical `id → text`
//! mapping the classifier fans out over. Pure transform, no side effects.

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Rejected batch input
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Body decoded as JSON but does not match the `{"data": [{id, text}]}` schema
    #[error("request body does not match the expected schema: {0}")]
    Schema(String),

    /// The `data` list is present but empty
    #[error("batch contains no review items")]
    EmptyBatch,

    /// A review item carries no text
    #[error("review {id} has empty text")]
    EmptyText { id: i64 },
}

/// Expected request body
#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    data: Vec<ReviewItem>,
}

/// One review to classify
#[derive(Debug, Deserialize)]
struct ReviewItem {
    id: i64,
    text: String,
}

/// Validate a raw batch body into an `id → text` mapping
///
/// Duplicate ids collapse, last occurrence winning (mapping semantics).
/// Result order carries no meaning; concurrent classification reorders
/// results anyway.
pub fn validate(raw: &serde_json::Value) -> Result<BTreeMap<i64, String>, ValidationError> {
    let request: AnalyzeRequest = serde_json::from_value(raw.clone())
        .map_err(|e| ValidationError::Schema(e.to_string()))?;

    if request.data.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }

    let mut items = BTreeMap::new();
    for item in request.data {
        if item.text.trim().is_empty() {
            return Err(ValidationError::EmptyText { id: item.id });
        }
        items.insert(item.id, item.text);
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_batch() {
        let raw = json!({
            "data": [
                {"id": 1, "text": "Не могу дозвониться до поддержки"},
                {"id": 2, "text": "Карта не работает за границей"},
            ]
        });

        let items = validate(&raw).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[&1], "Не могу дозвониться до поддержки");
        assert_eq!(items[&2], "Карта не работает за границей");
    }

    #[test]
    fn rejects_empty_batch() {
        let raw = json!({"data": []});
        assert!(matches!(validate(&raw), Err(ValidationError::EmptyBatch)));
    }

    #[test]
    fn rejects_missing_data_field() {
        let raw = json!({"reviews": [{"id": 1, "text": "x"}]});
        assert!(matches!(validate(&raw), Err(ValidationError::Schema(_))));
    }

    #[test]
    fn rejects_non_integer_id() {
        let raw = json!({"data": [{"id": "1", "text": "x"}]});
        assert!(matches!(validate(&raw), Err(ValidationError::Schema(_))));

        let raw = json!({"data": [{"id": 1.5, "text": "x"}]});
        assert!(matches!(validate(&raw), Err(ValidationError::Schema(_))));
    }

    #[test]
    fn rejects_empty_text() {
        let raw = json!({"data": [{"id": 7, "text": "   "}]});
        assert!(matches!(
            validate(&raw),
            Err(ValidationError::EmptyText { id: 7 })
        ));
    }

    #[test]
    fn duplicate_ids_collapse_last_wins() {
        let raw = json!({
            "data": [
                {"id": 1, "text": "первый"},
                {"id": 1, "text": "второй"},
            ]
        });

        let items = validate(&raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[&1], "второй");
    }

    #[test]
    fn rejects_non_object_body() {
        let raw = json!(["not", "an", "object"]);
        assert!(matches!(validate(&raw), Err(ValidationError::Schema(_))));
    }
}
