//! revu-import - load a reviews-and-annotations JSON dataset into SQLite
//!
//! Input is a JSON array of records:
//!
//! ```json
//! [{"id": 1, "text": "...", "date": "2025-01-01", "source": "Banki.ru",
//!   "annotations": [{"category": "Карты", "sentiment": "негатив", "summary": "..."}]}]
//! ```
//!
//! Dimension rows (sources, categories, sentiments) are created on
//! demand; re-importing the same file is a no-op thanks to the schema's
//! uniqueness constraints.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use revu_an::AnalyticsConfig;

#[derive(Parser)]
#[command(name = "revu-import", about = "Load reviews and annotations JSON into SQLite")]
struct Args {
    /// JSON dataset file (array of review records)
    #[arg(long)]
    input: PathBuf,

    /// SQLite database path (defaults to the service configuration)
    #[arg(long)]
    database: Option<PathBuf>,
}

/// One review in the dataset file
#[derive(Debug, Deserialize)]
struct ReviewRecord {
    id: i64,
    text: String,
    date: String,
    source: String,
    #[serde(default)]
    annotations: Vec<AnnotationRecord>,
}

/// One annotation attached to a review
#[derive(Debug, Deserialize)]
struct AnnotationRecord {
    category: String,
    sentiment: String,
    summary: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let database_path = match args.database {
        Some(path) => path,
        None => {
            let config_path = revu_common::config::config_file_path();
            let toml_config = revu_common::config::load_toml_config(&config_path)?;
            AnalyticsConfig::resolve(&toml_config).database_path
        }
    };

    tracing::info!("Database: {}", database_path.display());
    let pool = revu_common::db::init_database_pool(&database_path).await?;

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let records: Vec<ReviewRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    tracing::info!(records = records.len(), "Importing dataset");

    let mut reviews_loaded = 0usize;
    let mut annotations_loaded = 0usize;
    let mut skipped = 0usize;

    for record in &records {
        if NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").is_err() {
            tracing::warn!(id = record.id, date = %record.date, "Skipping review with bad date");
            skipped += 1;
            continue;
        }

        let source_id = dimension_id(&pool, "sources", "id", &record.source).await?;

        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO reviews(review_id, review_date, text, source_id) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(record.id)
        .bind(&record.date)
        .bind(&record.text)
        .bind(source_id)
        .execute(&pool)
        .await?
        .rows_affected();
        reviews_loaded += inserted as usize;

        for annotation in &record.annotations {
            let category_id =
                dimension_id(&pool, "categories", "category_id", &annotation.category).await?;
            let sentiment_id =
                dimension_id(&pool, "sentiments", "sentiment_id", &annotation.sentiment).await?;

            let inserted = sqlx::query(
                "INSERT OR IGNORE INTO annotations(review_id, category_id, sentiment_id, summary) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(record.id)
            .bind(category_id)
            .bind(sentiment_id)
            .bind(&annotation.summary)
            .execute(&pool)
            .await?
            .rows_affected();
            annotations_loaded += inserted as usize;
        }
    }

    tracing::info!(
        reviews = reviews_loaded,
        annotations = annotations_loaded,
        skipped,
        "Import finished"
    );

    Ok(())
}

/// Get-or-create a dimension row by name, returning its id
async fn dimension_id(
    pool: &SqlitePool,
    table: &str,
    id_column: &str,
    name: &str,
) -> Result<i64> {
    sqlx::query(&format!("INSERT OR IGNORE INTO {table}(name) VALUES (?)"))
        .bind(name)
        .execute(pool)
        .await?;

    let (id,): (i64,) = sqlx::query_as(&format!("SELECT {id_column} FROM {table} WHERE name = ?"))
        .bind(name)
        .fetch_one(pool)
        .await?;

    Ok(id)
}
