use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use tracing::{debug, info};

use crate::store::models::{KnowledgeEntry, NewKnowledgeEntry, Suggestion};
use crate::store::queries::{KnowledgeQueries, SuggestionQueries};


pub mod models;
pub mod queries;

pub type DbPool = Pool<Sqlite>;

/// SQLite-backed store for knowledge entries and suggestions.
///
/// This is the durable source of truth; the vector index is derived from it
/// and can always be rebuilt from `list_entries`.
#[derive(Debug, Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    #[inline]
    pub async fn new<P: AsRef<Path>>(database_url: P) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(database_url)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .context("Failed to create database connection pool")?;

        let database = Self { pool };
        database.run_migrations().await?;

        Ok(database)
    }

    #[inline]
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    #[inline]
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations");

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS knowledge_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                query_text TEXT NOT NULL,
                response_text TEXT NOT NULL,
                tags TEXT NOT NULL DEFAULT '[]',
                created_at DATETIME NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create knowledge_entries table")?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS suggestions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                query_text TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at DATETIME NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create suggestions table")?;

        debug!("Database migrations completed successfully");
        Ok(())
    }

    /// Open the database at `db_path`, creating missing parent directories.
    /// The path itself comes from the configuration layer.
    #[inline]
    pub async fn initialize_at(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        Self::new(db_path).await
    }

    // Knowledge entry operations
    #[inline]
    pub async fn add_entry(&self, new_entry: NewKnowledgeEntry) -> Result<KnowledgeEntry> {
        KnowledgeQueries::create(&self.pool, new_entry).await
    }

    #[inline]
    pub async fn get_entry(&self, id: i64) -> Result<Option<KnowledgeEntry>> {
        KnowledgeQueries::get_by_id(&self.pool, id).await
    }

    #[inline]
    pub async fn list_entries(&self) -> Result<Vec<KnowledgeEntry>> {
        KnowledgeQueries::list_all(&self.pool).await
    }

    #[inline]
    pub async fn entry_count(&self) -> Result<i64> {
        KnowledgeQueries::count(&self.pool).await
    }

    #[inline]
    pub async fn delete_entry(&self, id: i64) -> Result<bool> {
        KnowledgeQueries::delete(&self.pool, id).await
    }

    // Suggestion operations
    #[inline]
    pub async fn record_suggestion(&self, query_text: &str) -> Result<Suggestion> {
        SuggestionQueries::record(&self.pool, query_text).await
    }

    #[inline]
    pub async fn list_suggestions(&self) -> Result<Vec<Suggestion>> {
        SuggestionQueries::list_all(&self.pool).await
    }

    #[inline]
    pub async fn delete_suggestion(&self, id: i64) -> Result<bool> {
        SuggestionQueries::delete(&self.pool, id).await
    }

    #[inline]
    pub async fn clear_suggestions(&self) -> Result<u64> {
        SuggestionQueries::clear(&self.pool).await
    }
}
