use crate::error::{IndexerError, Result};
use rag_code_chunker::Language;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// One managed repository
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoConfig {
    /// Collection name the repository indexes into
    pub name: String,

    /// Repository root on disk
    pub path: PathBuf,

    /// Language the repository is indexed as
    pub language: Language,
}

/// In-memory registry of managed repositories, keyed by name
#[derive(Debug, Default)]
pub struct RepoRegistry {
    repos: HashMap<String, RepoConfig>,
}

impl RepoRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository; a duplicate name is an error
    pub fn add(&mut self, config: RepoConfig) -> Result<()> {
        if self.repos.contains_key(&config.name) {
            return Err(IndexerError::RepoExists(config.name));
        }
        log::info!(
            "Registered repository '{}' at {} ({})",
            config.name,
            config.path.display(),
            config.language
        );
        self.repos.insert(config.name.clone(), config);
        Ok(())
    }

    /// Remove a repository, returning its config; unknown names are an error
    pub fn remove(&mut self, name: &str) -> Result<RepoConfig> {
        self.repos
            .remove(name)
            .ok_or_else(|| IndexerError::RepoNotFound(name.to_string()))
    }

    /// Look up a repository by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RepoConfig> {
        self.repos.get(name)
    }

    /// Check if a repository is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.repos.contains_key(name)
    }

    /// Sorted repository names
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.repos.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered repositories
    #[must_use]
    pub fn len(&self) -> usize {
        self.repos.len()
    }

    /// Check if no repositories are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }
}
