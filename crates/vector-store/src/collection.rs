use crate::error::{Result, VectorStoreError};
use crate::index::CosineIndex;
use crate::types::{SearchResult, StoredChunk};
use rag_code_chunker::CodeChunk;

/// Points per upsert batch
pub const UPSERT_BATCH_SIZE: usize = 100;

/// A named set of chunks with their vectors, searchable by cosine
/// similarity. The analog of one vector-database collection per
/// repository.
pub struct Collection {
    name: String,
    index: CosineIndex,
    points: Vec<StoredChunk>,
    next_id: usize,
}

impl Collection {
    #[must_use]
    pub fn new(name: impl Into<String>, dimension: usize) -> Self {
        Self {
            name: name.into(),
            index: CosineIndex::new(dimension),
            points: Vec::new(),
            next_id: 0,
        }
    }

    /// Collection name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store chunks with their vectors, in batches.
    ///
    /// Chunks and vectors must align one-to-one; ids are assigned in
    /// insertion order.
    pub fn upsert_chunks(
        &mut self,
        chunks: Vec<CodeChunk>,
        vectors: Vec<Vec<f32>>,
    ) -> Result<usize> {
        if chunks.len() != vectors.len() {
            return Err(VectorStoreError::CountMismatch {
                chunks: chunks.len(),
                vectors: vectors.len(),
            });
        }

        let total = chunks.len();
        let paired: Vec<(CodeChunk, Vec<f32>)> = chunks.into_iter().zip(vectors).collect();
        for batch in paired.chunks(UPSERT_BATCH_SIZE) {
            log::debug!("{}: upserting batch of {}", self.name, batch.len());
            for (chunk, vector) in batch {
                let id = self.next_id;
                self.next_id += 1;
                self.index.add(id, vector)?;
                self.points.push(StoredChunk {
                    id,
                    chunk: chunk.clone(),
                    vector: vector.clone(),
                });
            }
        }

        log::info!("{}: stored {} chunks (total {})", self.name, total, self.len());
        Ok(total)
    }

    /// Search by a pre-embedded query vector
    pub fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let neighbors = self.index.search(query, limit)?;
        let results = neighbors
            .into_iter()
            .filter_map(|(id, score)| {
                self.points.iter().find(|p| p.id == id).map(|p| SearchResult {
                    chunk: p.chunk.clone(),
                    score,
                    id,
                })
            })
            .collect();
        Ok(results)
    }

    /// Drop every point, keeping the collection itself
    pub fn clear(&mut self) {
        self.points.clear();
        self.index.clear();
        self.next_id = 0;
    }

    /// Number of stored chunks
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the collection holds no chunks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
