use crate::collection::Collection;
use crate::error::{Result, VectorStoreError};
use crate::types::SearchResult;
use std::collections::HashMap;

/// In-memory set of named collections, one per indexed repository
pub struct CollectionStore {
    collections: HashMap<String, Collection>,
    dimension: usize,
}

impl CollectionStore {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            collections: HashMap::new(),
            dimension,
        }
    }

    /// Vector width used by every collection in this store
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Create an empty collection; creating an existing name is an error
    pub fn create_collection(&mut self, name: &str) -> Result<()> {
        if self.collections.contains_key(name) {
            return Err(VectorStoreError::CollectionExists(name.to_string()));
        }
        log::info!("Creating collection '{name}'");
        self.collections
            .insert(name.to_string(), Collection::new(name, self.dimension));
        Ok(())
    }

    /// Delete a collection and everything in it
    pub fn delete_collection(&mut self, name: &str) -> Result<()> {
        if self.collections.remove(name).is_none() {
            return Err(VectorStoreError::CollectionNotFound(name.to_string()));
        }
        log::info!("Deleted collection '{name}'");
        Ok(())
    }

    /// Get a collection by name
    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    /// Get a mutable collection by name
    pub fn collection_mut(&mut self, name: &str) -> Option<&mut Collection> {
        self.collections.get_mut(name)
    }

    /// Check if a collection exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Sorted collection names
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.keys().cloned().collect();
        names.sort();
        names
    }

    /// Search one collection by a pre-embedded query vector
    pub fn search(&self, name: &str, query: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let collection = self
            .collection(name)
            .ok_or_else(|| VectorStoreError::CollectionNotFound(name.to_string()))?;
        collection.search(query, limit)
    }
}
