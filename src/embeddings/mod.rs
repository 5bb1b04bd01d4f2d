// Embeddings module
// Defines the embedding boundary the engine depends on, plus the Ollama-backed client

pub mod ollama;

pub use ollama::OllamaClient;

/// Maps text to fixed-dimensionality vectors.
///
/// Implementations must return exactly one vector per input text, in input
/// order, all with the same dimensionality. The engine treats any failure as
/// an embedding-backend outage and degrades to its fallback response.
pub trait Embedder: Send + Sync {
    fn embed(&self, texts: &[String]) -> crate::Result<Vec<Vec<f32>>>;
}
