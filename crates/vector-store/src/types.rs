use rag_code_chunker::CodeChunk;
use serde::{Deserialize, Serialize};

/// A chunk stored in a collection together with its vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    /// Point id within the collection
    pub id: usize,
    pub chunk: CodeChunk,
    pub vector: Vec<f32>,
}

/// One search hit
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub chunk: CodeChunk,
    /// Cosine similarity against the query vector
    pub score: f32,
    pub id: usize,
}
