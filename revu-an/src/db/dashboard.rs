//! Dashboard metric queries
//!
//! All queries join reviews to their annotations and apply the same two
//! optional filters: source names and category names. An absent filter
//! means the corresponding JOIN and predicate are not emitted at all.
//!
//! Review counts use COUNT(DISTINCT review_id) because one review can
//! carry several annotations.

use revu_common::db::{SENTIMENT_NEGATIVE, SENTIMENT_NEUTRAL, SENTIMENT_POSITIVE};
use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Aggregate counts for one period
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct ReviewMetrics {
    pub total_reviews: i64,
    pub positive: i64,
    pub neutral: i64,
    pub negative: i64,
}

/// One day of a daily-count series
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DailyCount {
    pub date: String,
    pub value: i64,
}

/// Per-day sentiment annotation counts
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SentimentDayRow {
    pub date: String,
    pub positive_count: i64,
    pub neutral_count: i64,
    pub negative_count: i64,
    pub total_count: i64,
}

/// Append the optional source/category JOINs
fn push_filter_joins(
    qb: &mut QueryBuilder<'_, Sqlite>,
    sources: Option<&[String]>,
    categories: Option<&[String]>,
) {
    if sources.is_some() {
        qb.push(" JOIN sources src ON src.id = r.source_id");
    }
    if categories.is_some() {
        qb.push(" JOIN categories c ON c.category_id = a.category_id");
    }
}

/// Append the optional source/category IN predicates
fn push_filter_predicates(
    qb: &mut QueryBuilder<'_, Sqlite>,
    sources: Option<&[String]>,
    categories: Option<&[String]>,
) {
    if let Some(names) = sources {
        qb.push(" AND src.name IN (");
        let mut separated = qb.separated(", ");
        for name in names {
            separated.push_bind(name.clone());
        }
        separated.push_unseparated(")");
    }
    if let Some(names) = categories {
        qb.push(" AND c.name IN (");
        let mut separated = qb.separated(", ");
        for name in names {
            separated.push_bind(name.clone());
        }
        separated.push_unseparated(")");
    }
}

/// Review and sentiment counts for a period
pub async fn review_metrics(
    pool: &SqlitePool,
    from: NaiveDate,
    to: NaiveDate,
    sources: Option<&[String]>,
    categories: Option<&[String]>,
) -> sqlx::Result<ReviewMetrics> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT COUNT(DISTINCT r.review_id) AS total_reviews, \
         COALESCE(SUM(CASE WHEN s.name = '{SENTIMENT_POSITIVE}' THEN 1 ELSE 0 END), 0) AS positive, \
         COALESCE(SUM(CASE WHEN s.name = '{SENTIMENT_NEUTRAL}' THEN 1 ELSE 0 END), 0) AS neutral, \
         COALESCE(SUM(CASE WHEN s.name = '{SENTIMENT_NEGATIVE}' THEN 1 ELSE 0 END), 0) AS negative \
         FROM reviews r \
         JOIN annotations a ON a.review_id = r.review_id \
         JOIN sentiments s ON s.sentiment_id = a.sentiment_id"
    ));
    push_filter_joins(&mut qb, sources, categories);

    qb.push(" WHERE r.review_date >= ");
    qb.push_bind(from);
    qb.push(" AND r.review_date <= ");
    qb.push_bind(to);
    push_filter_predicates(&mut qb, sources, categories);

    qb.build_query_as::<ReviewMetrics>().fetch_one(pool).await
}

/// Unique reviews per day, for the total-reviews sparkline
pub async fn daily_review_counts(
    pool: &SqlitePool,
    from: NaiveDate,
    to: NaiveDate,
    sources: Option<&[String]>,
    categories: Option<&[String]>,
) -> sqlx::Result<Vec<DailyCount>> {
    let mut qb = QueryBuilder::new(
        "SELECT r.review_date AS date, COUNT(DISTINCT r.review_id) AS value \
         FROM reviews r \
         JOIN annotations a ON a.review_id = r.review_id",
    );
    push_filter_joins(&mut qb, sources, categories);

    qb.push(" WHERE r.review_date >= ");
    qb.push_bind(from);
    qb.push(" AND r.review_date <= ");
    qb.push_bind(to);
    push_filter_predicates(&mut qb, sources, categories);

    qb.push(" GROUP BY r.review_date ORDER BY r.review_date");

    qb.build_query_as::<DailyCount>().fetch_all(pool).await
}

/// Annotations with one sentiment per day, for the sentiment sparklines
///
/// Unlike [`daily_review_counts`] this counts annotations, not unique
/// reviews.
pub async fn daily_sentiment_counts(
    pool: &SqlitePool,
    from: NaiveDate,
    to: NaiveDate,
    sentiment_name: &str,
    sources: Option<&[String]>,
    categories: Option<&[String]>,
) -> sqlx::Result<Vec<DailyCount>> {
    let mut qb = QueryBuilder::new(
        "SELECT r.review_date AS date, COUNT(a.annotation_id) AS value \
         FROM reviews r \
         JOIN annotations a ON a.review_id = r.review_id \
         JOIN sentiments s ON s.sentiment_id = a.sentiment_id",
    );
    push_filter_joins(&mut qb, sources, categories);

    qb.push(" WHERE s.name = ");
    qb.push_bind(sentiment_name.to_string());
    qb.push(" AND r.review_date >= ");
    qb.push_bind(from);
    qb.push(" AND r.review_date <= ");
    qb.push_bind(to);
    push_filter_predicates(&mut qb, sources, categories);

    qb.push(" GROUP BY r.review_date ORDER BY r.review_date");

    qb.build_query_as::<DailyCount>().fetch_all(pool).await
}

/// Per-day sentiment counts for the dynamics chart
pub async fn sentiment_dynamics(
    pool: &SqlitePool,
    from: NaiveDate,
    to: NaiveDate,
    sources: Option<&[String]>,
    categories: Option<&[String]>,
) -> sqlx::Result<Vec<SentimentDayRow>> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT r.review_date AS date, \
         COALESCE(SUM(CASE WHEN s.name = '{SENTIMENT_POSITIVE}' THEN 1 ELSE 0 END), 0) AS positive_count, \
         COALESCE(SUM(CASE WHEN s.name = '{SENTIMENT_NEUTRAL}' THEN 1 ELSE 0 END), 0) AS neutral_count, \
         COALESCE(SUM(CASE WHEN s.name = '{SENTIMENT_NEGATIVE}' THEN 1 ELSE 0 END), 0) AS negative_count, \
         COUNT(a.annotation_id) AS total_count \
         FROM reviews r \
         JOIN annotations a ON a.review_id = r.review_id \
         JOIN sentiments s ON s.sentiment_id = a.sentiment_id"
    ));
    push_filter_joins(&mut qb, sources, categories);

    qb.push(" WHERE r.review_date >= ");
    qb.push_bind(from);
    qb.push(" AND r.review_date <= ");
    qb.push_bind(to);
    push_filter_predicates(&mut qb, sources, categories);

    qb.push(" GROUP BY r.review_date ORDER BY r.review_date");

    qb.build_query_as::<SentimentDayRow>().fetch_all(pool).await
}

/// Most-mentioned categories on one day, mention count descending
pub async fn top_topics_for_date(
    pool: &SqlitePool,
    date: NaiveDate,
    sources: Option<&[String]>,
    categories: Option<&[String]>,
    limit: i64,
) -> sqlx::Result<Vec<String>> {
    let mut qb = QueryBuilder::new(
        "SELECT c.name AS name, COUNT(a.annotation_id) AS mention_count \
         FROM categories c \
         JOIN annotations a ON a.category_id = c.category_id \
         JOIN reviews r ON r.review_id = a.review_id",
    );
    if sources.is_some() {
        qb.push(" JOIN sources src ON src.id = r.source_id");
    }

    qb.push(" WHERE r.review_date = ");
    qb.push_bind(date);

    if let Some(names) = sources {
        qb.push(" AND src.name IN (");
        let mut separated = qb.separated(", ");
        for name in names {
            separated.push_bind(name.clone());
        }
        separated.push_unseparated(")");
    }
    if let Some(names) = categories {
        qb.push(" AND c.name IN (");
        let mut separated = qb.separated(", ");
        for name in names {
            separated.push_bind(name.clone());
        }
        separated.push_unseparated(")");
    }

    qb.push(" GROUP BY c.category_id, c.name ORDER BY mention_count DESC");
    qb.push(" LIMIT ");
    qb.push_bind(limit);

    let rows: Vec<(String, i64)> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(|(name, _)| name).collect())
}
