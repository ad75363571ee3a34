//! Request and response types for the dashboard API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive date range filter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    /// Start of the period (ISO 8601)
    pub from: DateTime<Utc>,
    /// End of the period (ISO 8601)
    pub to: DateTime<Utc>,
}

/// Dashboard filters; empty lists mean "all"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
}

/// POST /dashboard/overview request body
#[derive(Debug, Clone, Deserialize)]
pub struct OverviewRequest {
    pub date_range: DateRange,
    #[serde(default)]
    pub filters: Filters,
}

/// Response metadata
#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub date_range: DateRange,
    pub filters_applied: Filters,
    pub last_updated: DateTime<Utc>,
}

/// Trend direction relative to the previous period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
}

/// Comparison of the current period against the previous one
///
/// `change` and `change_percent` are always non-negative; the sign lives
/// in `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub change: i64,
    pub change_percent: i64,
}

/// One dashboard metric with trend and sparkline
#[derive(Debug, Clone, Serialize)]
pub struct Metric {
    pub current: i64,
    /// Share of all annotations; only set for sentiment metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<i64>,
    pub trend: Trend,
    /// Daily values for the trailing week
    pub sparkline: Vec<i64>,
}

/// The four overview metrics
#[derive(Debug, Clone, Serialize)]
pub struct Metrics {
    pub total_reviews: Metric,
    pub positive_reviews: Metric,
    pub neutral_reviews: Metric,
    pub negative_reviews: Metric,
}

/// Sentiment distribution for one day, percentages summing to 100
#[derive(Debug, Clone, Serialize)]
pub struct SentimentDay {
    /// Date in YYYY-MM-DD format
    pub date: String,
    pub positive: i64,
    pub neutral: i64,
    pub negative: i64,
    /// Top-3 topics mentioned that day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
}

/// POST /dashboard/overview response body
#[derive(Debug, Clone, Serialize)]
pub struct OverviewResponse {
    pub meta: Meta,
    pub metrics: Metrics,
    pub sentiment_dynamics: Vec<SentimentDay>,
}
