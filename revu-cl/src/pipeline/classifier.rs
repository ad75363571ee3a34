//! Bounded fan-out of classification units
//!
//! One unit = one completion call for one review. Up to `max_concurrency`
//! units run at once; results are collected as units finish, in completion
//! order. A failing unit becomes a [`RawModelResult`] carrying its error
//! string; it never aborts the batch and never cancels its siblings.

use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::llm::CompletionGateway;
use crate::pipeline::{input, output, output::BatchOutcome};

/// Worker-pool size used when the caller does not configure one
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Outcome of one classification unit
#[derive(Debug, Clone)]
pub enum TaskOutcome {
    /// The completion text, possibly empty
    Completed(String),
    /// Short description of why the unit failed
    Failed(String),
}

/// Outcome of one unit, tagged with its review id
#[derive(Debug, Clone)]
pub struct RawModelResult {
    pub id: i64,
    pub outcome: TaskOutcome,
}

/// Executes one batch request against a completion gateway
pub struct BatchClassifier {
    gateway: Arc<dyn CompletionGateway>,
    max_concurrency: usize,
}

impl BatchClassifier {
    pub fn new(gateway: Arc<dyn CompletionGateway>, max_concurrency: usize) -> Self {
        Self {
            gateway,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Run the full pipeline for one raw batch body
    ///
    /// Never fails: invalid input short-circuits to an outcome with zero
    /// predictions and a batch-level warning, and per-unit failures are
    /// absorbed into the result. The only way out of here without a
    /// [`BatchOutcome`] is a panic, i.e. a programming defect.
    pub async fn classify_batch(
        &self,
        raw: &serde_json::Value,
        system_prompt: &str,
    ) -> BatchOutcome {
        let items = match input::validate(raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "Batch input failed validation");
                return output::invalid_input(&e);
            }
        };

        tracing::info!(
            items = items.len(),
            max_concurrency = self.max_concurrency,
            "Dispatching classification batch"
        );

        let results = self.run_units(items, system_prompt).await;
        output::format_results(results)
    }

    /// Fan out one unit per review and drain them in completion order
    async fn run_units(
        &self,
        items: BTreeMap<i64, String>,
        system_prompt: &str,
    ) -> Vec<RawModelResult> {
        let total = items.len();

        let mut units = stream::iter(items)
            .map(|(id, text)| {
                let gateway = Arc::clone(&self.gateway);
                async move {
                    match gateway.complete(system_prompt, &text).await {
                        Ok(completion) => {
                            tracing::debug!(id, "Classification unit completed");
                            RawModelResult {
                                id,
                                outcome: TaskOutcome::Completed(completion),
                            }
                        }
                        Err(e) => {
                            tracing::error!(id, error = %e, "Classification unit failed");
                            RawModelResult {
                                id,
                                outcome: TaskOutcome::Failed(e.to_string()),
                            }
                        }
                    }
                }
            })
            .buffer_unordered(self.max_concurrency);

        // Append each result as its unit finishes rather than waiting for
        // the pool to drain; completed results are never held in flight.
        let mut results = Vec::with_capacity(total);
        while let Some(result) = units.next().await {
            results.push(result);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::GatewayError;
    use async_trait::async_trait;

    /// Gateway that fails every call
    struct AlwaysFails;

    #[async_trait]
    impl CompletionGateway for AlwaysFails {
        async fn complete(&self, _: &str, _: &str) -> Result<String, GatewayError> {
            Err(GatewayError::RateLimited)
        }
    }

    /// Gateway that echoes a fixed valid completion
    struct AlwaysSucceeds;

    #[async_trait]
    impl CompletionGateway for AlwaysSucceeds {
        async fn complete(&self, _: &str, _: &str) -> Result<String, GatewayError> {
            Ok(r#"{"predictions": {"topics": ["Карты"], "sentiments": ["негатив"]}}"#.to_string())
        }
    }

    #[tokio::test]
    async fn invalid_input_short_circuits_with_warning() {
        let classifier = BatchClassifier::new(Arc::new(AlwaysSucceeds), 2);
        let outcome = classifier
            .classify_batch(&serde_json::json!({"data": []}), "prompt")
            .await;

        assert!(outcome.predictions.is_empty());
        let warnings = outcome.warnings.unwrap();
        assert!(warnings.starts_with("Invalid input:"), "{warnings}");
    }

    #[tokio::test]
    async fn every_unit_failing_still_yields_full_coverage() {
        let classifier = BatchClassifier::new(Arc::new(AlwaysFails), 3);
        let raw = serde_json::json!({
            "data": [
                {"id": 1, "text": "а"},
                {"id": 2, "text": "б"},
                {"id": 3, "text": "в"},
            ]
        });

        let outcome = classifier.classify_batch(&raw, "prompt").await;

        assert_eq!(outcome.predictions.len(), 3);
        assert!(outcome.predictions.iter().all(|p| p.topics.is_empty()));
        let warnings = outcome.warnings.unwrap();
        for id in 1..=3 {
            assert!(warnings.contains(&format!("item_id={id}")), "{warnings}");
        }
    }

    #[tokio::test]
    async fn zero_concurrency_is_clamped_to_one() {
        let classifier = BatchClassifier::new(Arc::new(AlwaysSucceeds), 0);
        let raw = serde_json::json!({"data": [{"id": 1, "text": "отзыв"}]});

        let outcome = classifier.classify_batch(&raw, "prompt").await;
        assert_eq!(outcome.predictions.len(), 1);
        assert!(outcome.warnings.is_none());
    }
}
