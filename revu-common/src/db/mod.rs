//! SQLite database access shared by the revu services
//!
//! The classifier and analytics services read and write the same database
//! file; each calls [`init_database_pool`] at startup, which creates the
//! schema when it does not exist yet.

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Canonical sentiment dimension values, as stored in the database
pub const SENTIMENT_POSITIVE: &str = "позитив";
pub const SENTIMENT_NEUTRAL: &str = "нейтральный";
pub const SENTIMENT_NEGATIVE: &str = "негатив";

/// Initialize database connection pool
///
/// Connects to the SQLite file at `db_path`, creating the file and the
/// parent directory when missing, then ensures the schema exists.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Create the review store schema when absent
///
/// Tables: sources, reviews, categories, sentiments, annotations.
/// One review carries zero or more annotations; an annotation ties a
/// review to one category and one sentiment with a short summary.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sources (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            review_id INTEGER PRIMARY KEY,
            review_date TEXT NOT NULL,
            text TEXT NOT NULL,
            source_id INTEGER NOT NULL REFERENCES sources(id),
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            category_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sentiments (
            sentiment_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS annotations (
            annotation_id INTEGER PRIMARY KEY AUTOINCREMENT,
            review_id INTEGER NOT NULL REFERENCES reviews(review_id) ON DELETE CASCADE,
            category_id INTEGER NOT NULL REFERENCES categories(category_id),
            sentiment_id INTEGER NOT NULL REFERENCES sentiments(sentiment_id),
            summary TEXT NOT NULL,
            UNIQUE (review_id, category_id, summary)
        )
        "#,
    )
    .execute(pool)
    .await?;

    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_reviews_date ON reviews(review_date)",
        "CREATE INDEX IF NOT EXISTS idx_reviews_source ON reviews(source_id)",
        "CREATE INDEX IF NOT EXISTS idx_annotations_review ON annotations(review_id)",
        "CREATE INDEX IF NOT EXISTS idx_annotations_category ON annotations(category_id)",
        "CREATE INDEX IF NOT EXISTS idx_annotations_sentiment ON annotations(sentiment_id)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    // Seed the sentiment dimension
    sqlx::query("INSERT OR IGNORE INTO sentiments(name) VALUES (?), (?), (?)")
        .bind(SENTIMENT_POSITIVE)
        .bind(SENTIMENT_NEGATIVE)
        .bind(SENTIMENT_NEUTRAL)
        .execute(pool)
        .await?;

    tracing::info!("Database schema initialized (sources, reviews, categories, sentiments, annotations)");

    Ok(())
}
