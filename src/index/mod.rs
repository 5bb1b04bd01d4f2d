
use tracing::{debug, warn};

use crate::embeddings::Embedder;
use crate::store::models::KnowledgeEntry;
use crate::{AnswerBoxError, Result};

/// Best match found by a similarity search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub entry_id: i64,
    pub score: f32,
}

#[derive(Debug, Clone)]
struct IndexedEntry {
    entry: KnowledgeEntry,
    vector: Vec<f32>,
}

/// An immutable in-memory vector index over the knowledge base.
///
/// A snapshot pairs every knowledge entry with exactly one embedding and is
/// never mutated after `build`; the engine replaces the whole snapshot on
/// reindex so readers always see a structurally consistent index. Search is a
/// brute-force cosine scan, which is plenty at knowledge-base scale and keeps
/// the interface free to swap in an ANN structure later.
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    entries: Vec<IndexedEntry>,
}

impl IndexSnapshot {
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Embed every entry's matchable text in one batched call and build a
    /// fresh snapshot. An empty corpus yields a logically empty index.
    #[inline]
    pub fn build(mut entries: Vec<KnowledgeEntry>, embedder: &dyn Embedder) -> Result<Self> {
        if entries.is_empty() {
            debug!("Building empty index snapshot (no knowledge entries)");
            return Ok(Self::empty());
        }

        // Ascending id order makes the max-score scan deterministic: on a
        // tie the lowest entry id wins.
        entries.sort_by_key(|entry| entry.id);

        let texts: Vec<String> = entries
            .iter()
            .map(|entry| entry.matchable_text())
            .collect();

        let vectors = embedder.embed(&texts)?;

        if vectors.len() != entries.len() {
            return Err(AnswerBoxError::Embedding(format!(
                "Embedder returned {} vectors for {} entries",
                vectors.len(),
                entries.len()
            )));
        }

        let dimension = vectors.first().map_or(0, Vec::len);
        if vectors.iter().any(|v| v.len() != dimension) {
            return Err(AnswerBoxError::Embedding(
                "Embedder returned vectors of mixed dimensionality".to_string(),
            ));
        }

        let indexed = entries
            .into_iter()
            .zip(vectors)
            .map(|(entry, vector)| IndexedEntry { entry, vector })
            .collect::<Vec<_>>();

        debug!(
            "Built index snapshot: {} entries, {} dimensions",
            indexed.len(),
            dimension
        );

        Ok(Self { entries: indexed })
    }

    /// Find the entry most similar to `query`, or `None` on an empty index.
    #[inline]
    pub fn search(&self, query: &[f32]) -> Option<SearchHit> {
        let mut best: Option<SearchHit> = None;

        for indexed in &self.entries {
            let score = cosine_similarity(query, &indexed.vector);
            let replace = match best {
                None => true,
                // Strict comparison keeps the lowest-id entry on score ties.
                Some(current) => score > current.score,
            };
            if replace {
                best = Some(SearchHit {
                    entry_id: indexed.entry.id,
                    score,
                });
            }
        }

        best
    }

    #[inline]
    pub fn entry(&self, id: i64) -> Option<&KnowledgeEntry> {
        self.entries
            .iter()
            .map(|indexed| &indexed.entry)
            .find(|entry| entry.id == id)
    }

    #[cfg(test)]
    fn entry_ids(&self) -> Vec<i64> {
        self.entries.iter().map(|indexed| indexed.entry.id).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cosine similarity between two vectors, in [-1, 1].
///
/// A zero-norm vector (or a dimensionality mismatch) scores 0 rather than
/// dividing by zero.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        warn!(
            "Cosine similarity over mismatched dimensions: {} vs {}",
            a.len(),
            b.len()
        );
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
