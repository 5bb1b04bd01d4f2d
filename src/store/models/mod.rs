
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// One question/answer pair in the knowledge base.
///
/// Entries are immutable once created; the only lifecycle events are
/// creation and deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct KnowledgeEntry {
    pub id: i64,
    pub query_text: String,
    pub response_text: String,
    #[sqlx(json)]
    pub tags: Vec<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewKnowledgeEntry {
    pub query_text: String,
    pub response_text: String,
    pub tags: Vec<String>,
}

/// An unanswered query captured for human triage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Suggestion {
    pub id: i64,
    pub query_text: String,
    pub status: SuggestionStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    Resolved,
}

impl std::fmt::Display for SuggestionStatus {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            SuggestionStatus::Pending => write!(f, "Pending"),
            SuggestionStatus::Resolved => write!(f, "Resolved"),
        }
    }
}

impl KnowledgeEntry {
    /// The text the index embeds for this entry. Combining the question with
    /// its answer lets queries match either side.
    #[inline]
    pub fn matchable_text(&self) -> String {
        format!("{} {}", self.query_text, self.response_text)
    }
}

impl Suggestion {
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == SuggestionStatus::Pending
    }
}
