use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::{Config, get_config_dir};
use crate::embeddings::OllamaClient;
use crate::engine::RetrievalEngine;
use crate::store::Database;

async fn init_engine() -> Result<RetrievalEngine> {
    let config_dir = get_config_dir()?;
    let config = Config::load(&config_dir).context("Failed to load configuration")?;

    let database = Database::initialize_at(&config.database_path())
        .await
        .context("Failed to initialize database")?;

    let client = OllamaClient::new(&config).context("Failed to initialize Ollama client")?;

    let engine = RetrievalEngine::new(database, Arc::new(client), config.retrieval)
        .await
        .context("Failed to build retrieval engine")?;

    let seeded = engine.seed_default_entries().await?;
    if seeded > 0 {
        info!("Seeded {} starter knowledge entries", seeded);
    }

    Ok(engine)
}

/// Ask a question against the knowledge base
#[inline]
pub async fn ask(query: &str) -> Result<()> {
    let engine = init_engine().await?;
    let answer = engine.answer(query).await?;

    println!("{}", answer.response);
    println!();
    if answer.matched {
        match answer.source_entry_id {
            Some(id) => println!("Matched entry {} (score: {:.3})", id, answer.score),
            None => println!("Matched a built-in intent"),
        }
    } else {
        println!(
            "No good match (best score: {:.3}); your question was noted for review.",
            answer.score
        );
    }

    Ok(())
}

/// Add a knowledge entry
#[inline]
pub async fn add_entry(query_text: &str, response_text: &str, tags: Vec<String>) -> Result<()> {
    let engine = init_engine().await?;
    let entry = engine.add_entry(query_text, response_text, tags).await?;

    println!("Created entry {} ({})", entry.id, entry.query_text);
    if !entry.tags.is_empty() {
        println!("  tags: {}", entry.tags.join(", "));
    }

    Ok(())
}

/// Delete a knowledge entry by id
#[inline]
pub async fn remove_entry(id: i64) -> Result<()> {
    let engine = init_engine().await?;
    engine.delete_entry(id).await?;

    println!("Deleted entry {}", id);

    Ok(())
}

/// List all knowledge entries
#[inline]
pub async fn list_entries() -> Result<()> {
    let engine = init_engine().await?;
    let entries = engine.list_entries().await?;

    if entries.is_empty() {
        println!("No knowledge entries yet.");
        return Ok(());
    }

    println!("Knowledge entries ({}):", entries.len());
    for entry in entries {
        println!("  [{}] {}", entry.id, entry.query_text);
        println!("      {}", entry.response_text);
        if !entry.tags.is_empty() {
            println!("      tags: {}", entry.tags.join(", "));
        }
    }

    Ok(())
}

/// List recorded suggestions
#[inline]
pub async fn list_suggestions() -> Result<()> {
    let engine = init_engine().await?;
    let suggestions = engine.list_suggestions().await?;

    if suggestions.is_empty() {
        println!("No suggestions recorded.");
        return Ok(());
    }

    println!("Suggestions ({}):", suggestions.len());
    for suggestion in suggestions {
        println!(
            "  [{}] {} ({}, {})",
            suggestion.id, suggestion.query_text, suggestion.status, suggestion.created_at
        );
    }

    Ok(())
}

/// Delete a suggestion by id
#[inline]
pub async fn remove_suggestion(id: i64) -> Result<()> {
    let engine = init_engine().await?;
    engine.delete_suggestion(id).await?;

    println!("Deleted suggestion {}", id);

    Ok(())
}

/// Delete every recorded suggestion
#[inline]
pub async fn clear_suggestions() -> Result<()> {
    let engine = init_engine().await?;
    let removed = engine.clear_suggestions().await?;

    println!("Cleared {} suggestions", removed);

    Ok(())
}
