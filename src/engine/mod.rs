
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::RetrievalConfig;
use crate::embeddings::Embedder;
use crate::index::IndexSnapshot;
use crate::store::Database;
use crate::store::models::{KnowledgeEntry, NewKnowledgeEntry, Suggestion};
use crate::{AnswerBoxError, Result};

const GREETING_KEYWORDS: &[&str] = &["hello", "hi", "hey"];
const THANKS_KEYWORDS: &[&str] = &["thank", "thanks"];
const FAREWELL_KEYWORDS: &[&str] = &["bye", "goodbye"];

const GREETING_RESPONSE: &str = "Hello! How can I help you today?";
const THANKS_RESPONSE: &str = "You're welcome! Is there anything else I can help with?";
const FAREWELL_RESPONSE: &str = "Goodbye! Feel free to come back if you have more questions.";

/// Starter knowledge for a fresh install, mirroring a typical first-run
/// corpus so the assistant can answer something before an admin adds entries.
const SEED_ENTRIES: &[(&str, &str, &[&str])] = &[
    (
        "Welcome",
        "Hello! I'm Answerbox, your personal assistant. How can I help you today?",
        &["greeting", "welcome"],
    ),
    (
        "About Answerbox",
        "Answerbox is a smart assistant that learns from our conversations and helps you find \
         information quickly.",
        &["about", "purpose"],
    ),
    (
        "Goodbye",
        "Goodbye! Feel free to come back anytime you need help.",
        &["farewell", "closing"],
    ),
    (
        "Thanks",
        "You're welcome! I'm happy to help.",
        &["gratitude", "response"],
    ),
];

/// The engine's final decision for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub response: String,
    pub matched: bool,
    pub score: f32,
    pub source_entry_id: Option<i64>,
}

/// Orchestrates query embedding, similarity search, the threshold decision,
/// and suggestion capture, and keeps the vector index synchronized with the
/// knowledge store.
///
/// The index is published as an immutable snapshot behind a single pointer
/// swap: readers clone the `Arc` and search a fully-built index, never an
/// intermediate state. Rebuilds serialize on `reindex_lock` and re-read the
/// store while holding it, so a rebuild queued behind another always reflects
/// the latest mutation.
pub struct RetrievalEngine {
    database: Database,
    embedder: Arc<dyn Embedder>,
    index: RwLock<Arc<IndexSnapshot>>,
    reindex_lock: Mutex<()>,
    options: RetrievalConfig,
}

impl RetrievalEngine {
    /// Create an engine and build the initial index from the store.
    #[inline]
    pub async fn new(
        database: Database,
        embedder: Arc<dyn Embedder>,
        options: RetrievalConfig,
    ) -> Result<Self> {
        let engine = Self {
            database,
            embedder,
            index: RwLock::new(Arc::new(IndexSnapshot::empty())),
            reindex_lock: Mutex::new(()),
            options,
        };

        engine.rebuild_index().await?;

        Ok(engine)
    }

    /// Answer a free-text query.
    ///
    /// Blank input is rejected outright. Canned intents short-circuit before
    /// any embedding work. Otherwise the query is embedded and matched
    /// against the index; a score strictly above the configured threshold is
    /// a hit, anything else records a suggestion and returns the fallback
    /// response. Embedder failures degrade to the fallback path rather than
    /// surfacing as errors.
    #[inline]
    pub async fn answer(&self, query: &str) -> Result<Answer> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AnswerBoxError::EmptyInput);
        }

        if let Some(response) = canned_response(query) {
            debug!("Canned intent matched, skipping semantic search");
            return Ok(Answer {
                response: response.to_string(),
                matched: true,
                score: 1.0,
                source_entry_id: None,
            });
        }

        let query_texts = [query.to_string()];
        let query_vector = match self.embedder.embed(&query_texts) {
            Ok(mut vectors) if !vectors.is_empty() => vectors.swap_remove(0),
            Ok(_) => {
                warn!("Embedder returned no vector for query, degrading to fallback");
                return self.miss(query, 0.0).await;
            }
            Err(e) => {
                warn!("Query embedding failed, degrading to fallback: {}", e);
                return self.miss(query, 0.0).await;
            }
        };

        let snapshot = Arc::clone(&*self.index.read().await);

        let hit = snapshot.search(&query_vector);
        debug!("Search over {} entries: {:?}", snapshot.len(), hit);

        match hit {
            // Strict comparison: a score exactly at the threshold is a miss.
            Some(hit) if hit.score > self.options.match_threshold => {
                match snapshot.entry(hit.entry_id) {
                    Some(entry) => Ok(Answer {
                        response: entry.response_text.clone(),
                        matched: true,
                        score: hit.score,
                        source_entry_id: Some(entry.id),
                    }),
                    None => {
                        warn!("Search returned id {} missing from snapshot", hit.entry_id);
                        self.miss(query, hit.score).await
                    }
                }
            }
            Some(hit) => self.miss(query, hit.score).await,
            None => self.miss(query, 0.0).await,
        }
    }

    /// Add a knowledge entry and reindex. The entry is persisted first; if
    /// the persist fails the index is left untouched.
    #[inline]
    pub async fn add_entry(
        &self,
        query_text: &str,
        response_text: &str,
        tags: Vec<String>,
    ) -> Result<KnowledgeEntry> {
        let query_text = query_text.trim();
        let response_text = response_text.trim();
        if query_text.is_empty() || response_text.is_empty() {
            return Err(AnswerBoxError::EmptyInput);
        }

        let entry = self
            .database
            .add_entry(NewKnowledgeEntry {
                query_text: query_text.to_string(),
                response_text: response_text.to_string(),
                tags,
            })
            .await
            .map_err(|e| AnswerBoxError::Database(format!("{:#}", e)))?;

        info!("Added knowledge entry {}", entry.id);
        self.rebuild_index().await?;

        Ok(entry)
    }

    /// Delete a knowledge entry and reindex.
    #[inline]
    pub async fn delete_entry(&self, id: i64) -> Result<()> {
        let found = self
            .database
            .delete_entry(id)
            .await
            .map_err(|e| AnswerBoxError::Database(format!("{:#}", e)))?;

        if !found {
            return Err(AnswerBoxError::NotFound(format!("knowledge entry {}", id)));
        }

        info!("Deleted knowledge entry {}", id);
        self.rebuild_index().await?;

        Ok(())
    }

    #[inline]
    pub async fn list_entries(&self) -> Result<Vec<KnowledgeEntry>> {
        self.database
            .list_entries()
            .await
            .map_err(|e| AnswerBoxError::Database(format!("{:#}", e)))
    }

    #[inline]
    pub async fn list_suggestions(&self) -> Result<Vec<Suggestion>> {
        self.database
            .list_suggestions()
            .await
            .map_err(|e| AnswerBoxError::Database(format!("{:#}", e)))
    }

    #[inline]
    pub async fn delete_suggestion(&self, id: i64) -> Result<()> {
        let found = self
            .database
            .delete_suggestion(id)
            .await
            .map_err(|e| AnswerBoxError::Database(format!("{:#}", e)))?;

        if !found {
            return Err(AnswerBoxError::NotFound(format!("suggestion {}", id)));
        }

        Ok(())
    }

    /// Remove every recorded suggestion, returning how many were removed.
    #[inline]
    pub async fn clear_suggestions(&self) -> Result<u64> {
        self.database
            .clear_suggestions()
            .await
            .map_err(|e| AnswerBoxError::Database(format!("{:#}", e)))
    }

    /// Seed the starter corpus if the knowledge base is empty. Returns how
    /// many entries were created.
    #[inline]
    pub async fn seed_default_entries(&self) -> Result<usize> {
        let existing = self
            .database
            .entry_count()
            .await
            .map_err(|e| AnswerBoxError::Database(format!("{:#}", e)))?;
        if existing > 0 {
            return Ok(0);
        }

        info!("Knowledge base is empty, seeding default entries");

        for (query_text, response_text, tags) in SEED_ENTRIES {
            self.database
                .add_entry(NewKnowledgeEntry {
                    query_text: (*query_text).to_string(),
                    response_text: (*response_text).to_string(),
                    tags: tags.iter().map(|t| (*t).to_string()).collect(),
                })
                .await
                .map_err(|e| AnswerBoxError::Database(format!("{:#}", e)))?;
        }

        self.rebuild_index().await?;

        Ok(SEED_ENTRIES.len())
    }

    /// Rebuild the index from the current store contents and publish the new
    /// snapshot atomically. Concurrent rebuild requests queue here; each one
    /// re-reads the store, so the last writer's state always wins.
    #[inline]
    pub async fn rebuild_index(&self) -> Result<()> {
        let _guard = self.reindex_lock.lock().await;

        let entries = self
            .database
            .list_entries()
            .await
            .map_err(|e| AnswerBoxError::Database(format!("{:#}", e)))?;

        let snapshot = IndexSnapshot::build(entries, self.embedder.as_ref())?;
        let count = snapshot.len();

        *self.index.write().await = Arc::new(snapshot);
        debug!("Published index snapshot with {} entries", count);

        Ok(())
    }

    /// Number of entries in the currently published index.
    #[inline]
    pub async fn indexed_entries(&self) -> usize {
        self.index.read().await.len()
    }

    async fn miss(&self, query: &str, score: f32) -> Result<Answer> {
        if let Err(e) = self.database.record_suggestion(query).await {
            // A failed suggestion write must not turn a chat response into a
            // hard error; the miss is still answered with the fallback.
            warn!("Failed to record suggestion: {:#}", e);
        } else {
            debug!("Recorded suggestion for unanswered query");
        }

        Ok(Answer {
            response: self.options.fallback_response.clone(),
            matched: false,
            score,
            source_entry_id: None,
        })
    }
}

/// Check a query against the fixed canned intents. Matching is on whole
/// words, case-insensitive, so "this" does not trigger the "hi" greeting.
fn canned_response(query: &str) -> Option<&'static str> {
    let lowered = query.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let contains_any = |keywords: &[&str]| words.iter().any(|w| keywords.contains(w));

    if contains_any(GREETING_KEYWORDS) {
        Some(GREETING_RESPONSE)
    } else if contains_any(THANKS_KEYWORDS) {
        Some(THANKS_RESPONSE)
    } else if contains_any(FAREWELL_KEYWORDS) {
        Some(FAREWELL_RESPONSE)
    } else {
        None
    }
}
