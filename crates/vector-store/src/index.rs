use crate::error::{Result, VectorStoreError};
use std::collections::HashMap;

/// Brute-force cosine similarity index.
///
/// O(n) per query, which is fine at per-repository collection sizes; the
/// interface leaves room for an ANN structure behind it.
pub struct CosineIndex {
    dimension: usize,
    vectors: HashMap<usize, Vec<f32>>,
}

impl CosineIndex {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: HashMap::new(),
        }
    }

    /// Add a vector to the index
    pub fn add(&mut self, id: usize, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(VectorStoreError::InvalidDimension {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        self.vectors.insert(id, vector.to_vec());
        Ok(())
    }

    /// Search for the k nearest vectors, returning (id, score) sorted by
    /// score descending
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if query.len() != self.dimension {
            return Err(VectorStoreError::InvalidDimension {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scores: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .map(|(id, vector)| (*id, Self::cosine_similarity(query, vector)))
            .collect();

        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scores.truncate(k);
        Ok(scores)
    }

    /// Cosine similarity of two equal-length vectors
    #[must_use]
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot / (norm_a * norm_b)
    }

    /// Number of vectors in the index
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Check if index is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Remove all vectors
    pub fn clear(&mut self) {
        self.vectors.clear();
    }
}
