//! Dashboard overview assembly
//!
//! Coordinates filter mapping, metric retrieval for the current and
//! previous periods, sparkline shaping and the per-day sentiment
//! dynamics with top topics.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use sqlx::SqlitePool;

use revu_common::db::{SENTIMENT_NEGATIVE, SENTIMENT_NEUTRAL, SENTIMENT_POSITIVE};

use crate::db::dashboard::{self, ReviewMetrics};
use crate::mappings;
use crate::models::{
    Meta, Metric, Metrics, OverviewRequest, OverviewResponse, SentimentDay,
};
use crate::services::aggregation;

/// Sparkline width in days
const SPARKLINE_DAYS: usize = 7;

/// Top topics shown per day in the dynamics chart
const TOP_TOPICS_LIMIT: i64 = 3;

/// Service for the dashboard overview endpoint
pub struct DashboardService {
    db: SqlitePool,
}

impl DashboardService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Build the complete overview response
    pub async fn overview(&self, request: &OverviewRequest) -> Result<OverviewResponse> {
        // API filters → DB dimension values; empty list = no filter
        let sources = mappings::db_source_names(&request.filters.sources);
        let categories = mappings::categories_for_products(&request.filters.products);
        let sources = non_empty(&sources);
        let categories = non_empty(&categories);

        let from = request.date_range.from.date_naive();
        let to = request.date_range.to.date_naive();

        let current = dashboard::review_metrics(&self.db, from, to, sources, categories)
            .await
            .context("current period metrics")?;

        let (prev_from, prev_to) = aggregation::previous_period(from, to);
        let previous = dashboard::review_metrics(&self.db, prev_from, prev_to, sources, categories)
            .await
            .context("previous period metrics")?;

        let metrics = self
            .build_metrics(&current, &previous, to, sources, categories)
            .await?;

        let sentiment_dynamics = self
            .build_sentiment_dynamics(from, to, sources, categories)
            .await?;

        Ok(OverviewResponse {
            meta: Meta {
                date_range: request.date_range.clone(),
                filters_applied: request.filters.clone(),
                last_updated: Utc::now(),
            },
            metrics,
            sentiment_dynamics,
        })
    }

    /// All four metrics with trends and sparklines
    async fn build_metrics(
        &self,
        current: &ReviewMetrics,
        previous: &ReviewMetrics,
        to: NaiveDate,
        sources: Option<&[String]>,
        categories: Option<&[String]>,
    ) -> Result<Metrics> {
        // Percentage base for the sentiment metrics
        let total_annotations = current.positive + current.neutral + current.negative;

        let total_reviews = self
            .build_metric(
                current.total_reviews,
                previous.total_reviews,
                to,
                sources,
                categories,
                None,
                None,
            )
            .await?;

        let positive_reviews = self
            .build_metric(
                current.positive,
                previous.positive,
                to,
                sources,
                categories,
                Some(SENTIMENT_POSITIVE),
                Some(total_annotations),
            )
            .await?;

        let neutral_reviews = self
            .build_metric(
                current.neutral,
                previous.neutral,
                to,
                sources,
                categories,
                Some(SENTIMENT_NEUTRAL),
                Some(total_annotations),
            )
            .await?;

        let negative_reviews = self
            .build_metric(
                current.negative,
                previous.negative,
                to,
                sources,
                categories,
                Some(SENTIMENT_NEGATIVE),
                Some(total_annotations),
            )
            .await?;

        Ok(Metrics {
            total_reviews,
            positive_reviews,
            neutral_reviews,
            negative_reviews,
        })
    }

    /// One metric: trend against the previous period plus a trailing-week
    /// sparkline
    ///
    /// Sentiment metrics count annotations carrying that sentiment; the
    /// total-reviews metric counts unique reviews.
    async fn build_metric(
        &self,
        current_value: i64,
        previous_value: i64,
        to: NaiveDate,
        sources: Option<&[String]>,
        categories: Option<&[String]>,
        sentiment_name: Option<&str>,
        total_for_percentage: Option<i64>,
    ) -> Result<Metric> {
        let trend = aggregation::calculate_trend(current_value, previous_value);

        let sparkline_from = to - Duration::days(SPARKLINE_DAYS as i64 - 1);
        let points = match sentiment_name {
            Some(name) => {
                dashboard::daily_sentiment_counts(
                    &self.db,
                    sparkline_from,
                    to,
                    name,
                    sources,
                    categories,
                )
                .await
                .context("sentiment sparkline")?
            }
            None => dashboard::daily_review_counts(&self.db, sparkline_from, to, sources, categories)
                .await
                .context("review sparkline")?,
        };
        let sparkline = aggregation::format_sparkline(&points, SPARKLINE_DAYS);

        let percentage =
            total_for_percentage.map(|total| aggregation::percentage(current_value, total));

        Ok(Metric {
            current: current_value,
            percentage,
            trend,
            sparkline,
        })
    }

    /// Per-day sentiment percentages (normalized to 100) with top topics
    async fn build_sentiment_dynamics(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        sources: Option<&[String]>,
        categories: Option<&[String]>,
    ) -> Result<Vec<SentimentDay>> {
        let rows = dashboard::sentiment_dynamics(&self.db, from, to, sources, categories)
            .await
            .context("sentiment dynamics")?;

        let mut dynamics = Vec::with_capacity(rows.len());
        for row in rows {
            let day = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
                .with_context(|| format!("review_date '{}' is not YYYY-MM-DD", row.date))?;

            let (positive, neutral, negative) = if row.total_count > 0 {
                aggregation::normalize_percentages(
                    aggregation::percentage(row.positive_count, row.total_count),
                    aggregation::percentage(row.neutral_count, row.total_count),
                    aggregation::percentage(row.negative_count, row.total_count),
                )
            } else {
                (0, 0, 0)
            };

            let topics =
                dashboard::top_topics_for_date(&self.db, day, sources, categories, TOP_TOPICS_LIMIT)
                    .await
                    .context("top topics")?;

            dynamics.push(SentimentDay {
                date: row.date,
                positive,
                neutral,
                negative,
                topics: if topics.is_empty() { None } else { Some(topics) },
            });
        }

        Ok(dynamics)
    }
}

/// `None` for an empty filter list, so queries skip the predicate entirely
fn non_empty(values: &[String]) -> Option<&[String]> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
