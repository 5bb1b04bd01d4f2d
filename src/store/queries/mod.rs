#[cfg(test)]
mod tests;

use super::models::{KnowledgeEntry, NewKnowledgeEntry, Suggestion};
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

pub struct KnowledgeQueries;

impl KnowledgeQueries {
    #[inline]
    pub async fn create(pool: &SqlitePool, new_entry: NewKnowledgeEntry) -> Result<KnowledgeEntry> {
        let now = Utc::now().naive_utc();
        let tags = serde_json::to_string(&new_entry.tags).context("Failed to serialize tags")?;

        let id = sqlx::query(
            "INSERT INTO knowledge_entries (query_text, response_text, tags, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(&new_entry.query_text)
        .bind(&new_entry.response_text)
        .bind(&tags)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create knowledge entry")?
        .last_insert_rowid();

        debug!("Created knowledge entry {}", id);

        Self::get_by_id(pool, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created knowledge entry"))
    }

    #[inline]
    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<KnowledgeEntry>> {
        let result = sqlx::query_as::<_, KnowledgeEntry>(
            "SELECT id, query_text, response_text, tags, created_at \
             FROM knowledge_entries WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get knowledge entry by id")?;

        Ok(result)
    }

    #[inline]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<KnowledgeEntry>> {
        let entries = sqlx::query_as::<_, KnowledgeEntry>(
            "SELECT id, query_text, response_text, tags, created_at \
             FROM knowledge_entries ORDER BY id",
        )
        .fetch_all(pool)
        .await
        .context("Failed to list knowledge entries")?;

        Ok(entries)
    }

    #[inline]
    pub async fn count(pool: &SqlitePool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM knowledge_entries")
            .fetch_one(pool)
            .await
            .context("Failed to count knowledge entries")?;

        Ok(count)
    }

    /// Delete an entry by id. Returns whether a row was actually removed.
    #[inline]
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM knowledge_entries WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .context("Failed to delete knowledge entry")?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct SuggestionQueries;

impl SuggestionQueries {
    #[inline]
    pub async fn record(pool: &SqlitePool, query_text: &str) -> Result<Suggestion> {
        let now = Utc::now().naive_utc();

        let id = sqlx::query(
            "INSERT INTO suggestions (query_text, status, created_at) VALUES (?, 'pending', ?)",
        )
        .bind(query_text)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to record suggestion")?
        .last_insert_rowid();

        debug!("Recorded suggestion {}", id);

        Self::get_by_id(pool, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve recorded suggestion"))
    }

    #[inline]
    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Suggestion>> {
        let result = sqlx::query_as::<_, Suggestion>(
            "SELECT id, query_text, status, created_at FROM suggestions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get suggestion by id")?;

        Ok(result)
    }

    #[inline]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Suggestion>> {
        let suggestions = sqlx::query_as::<_, Suggestion>(
            "SELECT id, query_text, status, created_at FROM suggestions ORDER BY id",
        )
        .fetch_all(pool)
        .await
        .context("Failed to list suggestions")?;

        Ok(suggestions)
    }

    /// Delete a suggestion by id. Returns whether a row was actually removed.
    #[inline]
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM suggestions WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .context("Failed to delete suggestion")?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every suggestion. Returns the number of rows removed.
    #[inline]
    pub async fn clear(pool: &SqlitePool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM suggestions")
            .execute(pool)
            .await
            .context("Failed to clear suggestions")?;

        Ok(result.rows_affected())
    }
}
