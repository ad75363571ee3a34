//! End-to-end pipeline tests with scripted completion gateways
//!
//! Covers total coverage, per-unit failure isolation, warnings
//! accumulation and the worker-pool bound without touching the network.

use async_trait::async_trait;
use revu_cl::llm::{CompletionGateway, GatewayError};
use revu_cl::pipeline::BatchClassifier;
use serde_json::json;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const VALID_COMPLETION: &str =
    r#"{"predictions": {"topics": ["Служба поддержки"], "sentiments": ["негатив"]}}"#;

/// Scripted reply for one review text
enum Reply {
    /// Return this completion text
    Completion(&'static str),
    /// Fail the unit with an upstream error
    Upstream,
}

/// Gateway that answers by looking up the review text
struct ScriptedGateway {
    replies: HashMap<&'static str, Reply>,
}

impl ScriptedGateway {
    fn new(replies: Vec<(&'static str, Reply)>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
        }
    }
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    async fn complete(&self, _: &str, user_text: &str) -> Result<String, GatewayError> {
        match self.replies.get(user_text) {
            Some(Reply::Completion(text)) => Ok(text.to_string()),
            Some(Reply::Upstream) => Err(GatewayError::Api {
                status: 500,
                message: "upstream unavailable".to_string(),
            }),
            None => panic!("no scripted reply for review text: {user_text}"),
        }
    }
}

/// Gateway that records the highest number of in-flight calls
struct ConcurrencyProbe {
    in_flight: AtomicUsize,
    max_observed: AtomicUsize,
}

impl ConcurrencyProbe {
    fn new() -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            max_observed: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CompletionGateway for ConcurrencyProbe {
    async fn complete(&self, _: &str, _: &str) -> Result<String, GatewayError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_observed.fetch_max(current, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(25)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(VALID_COMPLETION.to_string())
    }
}

fn prediction_ids(outcome: &revu_cl::pipeline::BatchOutcome) -> BTreeSet<i64> {
    outcome.predictions.iter().map(|p| p.id).collect()
}

#[tokio::test]
async fn two_review_scenario_yields_populated_predictions_and_no_warnings() {
    let gateway = ScriptedGateway::new(vec![
        (
            "Не могу дозвониться до поддержки",
            Reply::Completion(VALID_COMPLETION),
        ),
        (
            "Карта не работает за границей",
            Reply::Completion(
                r#"{"predictions": {"topics": ["Карты"], "sentiments": ["негатив"]}}"#,
            ),
        ),
    ]);
    let classifier = BatchClassifier::new(Arc::new(gateway), 2);

    let raw = json!({
        "data": [
            {"id": 1, "text": "Не могу дозвониться до поддержки"},
            {"id": 2, "text": "Карта не работает за границей"},
        ]
    });

    let outcome = classifier.classify_batch(&raw, "prompt").await;

    assert!(outcome.warnings.is_none());
    assert_eq!(prediction_ids(&outcome), BTreeSet::from([1, 2]));
    for prediction in &outcome.predictions {
        assert!(!prediction.topics.is_empty());
        assert!(!prediction.sentiments.is_empty());
    }

    // No warnings key at all in the serialized payload when all units succeed
    let serialized = serde_json::to_value(&outcome).unwrap();
    assert!(serialized.get("warnings").is_none());
}

#[tokio::test]
async fn prediction_ids_cover_input_exactly_despite_failures() {
    let gateway = ScriptedGateway::new(vec![
        ("один", Reply::Completion(VALID_COMPLETION)),
        ("два", Reply::Upstream),
        ("три", Reply::Completion(VALID_COMPLETION)),
        ("четыре", Reply::Upstream),
        ("пять", Reply::Completion("ответ без структуры")),
    ]);
    let classifier = BatchClassifier::new(Arc::new(gateway), 3);

    let raw = json!({
        "data": [
            {"id": 10, "text": "один"},
            {"id": 20, "text": "два"},
            {"id": 30, "text": "три"},
            {"id": 40, "text": "четыре"},
            {"id": 50, "text": "пять"},
        ]
    });

    let outcome = classifier.classify_batch(&raw, "prompt").await;

    assert_eq!(outcome.predictions.len(), 5);
    assert_eq!(prediction_ids(&outcome), BTreeSet::from([10, 20, 30, 40, 50]));
}

#[tokio::test]
async fn one_failing_unit_does_not_block_the_others() {
    let gateway = ScriptedGateway::new(vec![
        ("хороший отзыв", Reply::Completion(VALID_COMPLETION)),
        ("сломанный отзыв", Reply::Upstream),
    ]);
    let classifier = BatchClassifier::new(Arc::new(gateway), 2);

    let raw = json!({
        "data": [
            {"id": 1, "text": "хороший отзыв"},
            {"id": 2, "text": "сломанный отзыв"},
        ]
    });

    let outcome = classifier.classify_batch(&raw, "prompt").await;

    let successful = outcome
        .predictions
        .iter()
        .find(|p| p.id == 1)
        .expect("prediction for id 1");
    assert_eq!(successful.topics, vec!["Служба поддержки".to_string()]);

    let failed = outcome
        .predictions
        .iter()
        .find(|p| p.id == 2)
        .expect("prediction for id 2");
    assert!(failed.topics.is_empty());
    assert!(failed.sentiments.is_empty());
}

#[tokio::test]
async fn mixed_batch_reports_both_failure_kinds_in_warnings() {
    // A succeeds, B hits an upstream error, C's completion is unparsable
    let gateway = ScriptedGateway::new(vec![
        ("отзыв А", Reply::Completion(VALID_COMPLETION)),
        ("отзыв Б", Reply::Upstream),
        ("отзыв В", Reply::Completion("никакого JSON здесь нет")),
    ]);
    let classifier = BatchClassifier::new(Arc::new(gateway), 2);

    let raw = json!({
        "data": [
            {"id": 1, "text": "отзыв А"},
            {"id": 2, "text": "отзыв Б"},
            {"id": 3, "text": "отзыв В"},
        ]
    });

    let outcome = classifier.classify_batch(&raw, "prompt").await;

    assert_eq!(outcome.predictions.len(), 3);
    let by_id: HashMap<i64, _> = outcome.predictions.iter().map(|p| (p.id, p)).collect();
    assert!(!by_id[&1].topics.is_empty());
    assert!(by_id[&2].topics.is_empty());
    assert!(by_id[&3].topics.is_empty());

    let warnings = outcome.warnings.unwrap();
    assert!(warnings.contains("item_id=2"), "{warnings}");
    assert!(warnings.contains("parsing failed for id=3"), "{warnings}");
}

#[tokio::test]
async fn all_units_failing_yields_one_warning_mention_per_id() {
    struct AllFail;

    #[async_trait]
    impl CompletionGateway for AllFail {
        async fn complete(&self, _: &str, _: &str) -> Result<String, GatewayError> {
            Err(GatewayError::Network("connection refused".to_string()))
        }
    }

    let classifier = BatchClassifier::new(Arc::new(AllFail), 4);
    let raw = json!({
        "data": (1..=4)
            .map(|id| json!({"id": id, "text": format!("отзыв {id}")}))
            .collect::<Vec<_>>()
    });

    let outcome = classifier.classify_batch(&raw, "prompt").await;

    assert_eq!(outcome.predictions.len(), 4);
    assert!(outcome.predictions.iter().all(|p| p.topics.is_empty()));

    let warnings = outcome.warnings.unwrap();
    for id in 1..=4 {
        assert_eq!(
            warnings.matches(&format!("item_id={id}:")).count(),
            1,
            "{warnings}"
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn worker_pool_never_exceeds_the_configured_bound() {
    let probe = Arc::new(ConcurrencyProbe::new());
    let classifier = BatchClassifier::new(probe.clone(), 3);

    let raw = json!({
        "data": (1..=12)
            .map(|id| json!({"id": id, "text": format!("отзыв {id}")}))
            .collect::<Vec<_>>()
    });

    let outcome = classifier.classify_batch(&raw, "prompt").await;

    assert_eq!(outcome.predictions.len(), 12);
    let max_observed = probe.max_observed.load(Ordering::SeqCst);
    assert!(max_observed <= 3, "observed {max_observed} concurrent units");
    assert!(max_observed >= 2, "pool never ran units concurrently");
}
