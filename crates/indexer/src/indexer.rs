use crate::error::{IndexerError, Result};
use crate::registry::RepoConfig;
use crate::scanner::FileScanner;
use crate::stats::IndexStats;
use rag_code_chunker::{Chunker, CodeChunk};
use rag_vector_store::{CollectionStore, EmbeddingClient};
use std::time::Instant;

/// Scan → chunk → embed → upsert pipeline for one repository at a time
#[derive(Clone)]
pub struct RepoIndexer {
    embedder: EmbeddingClient,
}

impl RepoIndexer {
    #[must_use]
    pub fn new(embedder: EmbeddingClient) -> Self {
        Self { embedder }
    }

    /// Embedding client this indexer embeds with
    #[must_use]
    pub const fn embedder(&self) -> &EmbeddingClient {
        &self.embedder
    }

    /// Index a repository into its collection, creating the collection if
    /// needed. Appends to whatever the collection already holds; use
    /// [`RepoIndexer::reindex`] to rebuild from scratch.
    pub async fn index(
        &self,
        config: &RepoConfig,
        store: &mut CollectionStore,
    ) -> Result<IndexStats> {
        if !config.path.is_dir() {
            return Err(IndexerError::InvalidPath(
                config.path.display().to_string(),
            ));
        }

        let started = Instant::now();
        let mut stats = IndexStats::new();

        let files = FileScanner::new(&config.path, config.language).scan();
        let mut chunker = Chunker::new(config.language)?;

        let mut chunks: Vec<CodeChunk> = Vec::new();
        for file in files {
            stats.add_file();
            match chunker.chunk_file(&file) {
                Ok(file_chunks) => chunks.extend(file_chunks),
                Err(e) => {
                    log::warn!("Error processing {}: {e}", file.display());
                    stats.add_skipped();
                }
            }
        }

        // Blank chunks would embed as zero vectors; drop them up front so
        // chunk and vector lists stay aligned
        chunks.retain(|c| !c.is_blank());

        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let vectors = self.embedder.embed_batch(&contents).await?;

        if !store.contains(&config.name) {
            store.create_collection(&config.name)?;
        }
        let collection = store
            .collection_mut(&config.name)
            .expect("collection exists after create");
        let stored = collection.upsert_chunks(chunks, vectors)?;
        stats.add_chunks(stored);

        stats.time_ms = started.elapsed().as_millis() as u64;
        log::info!(
            "Indexed '{}': {} files, {} chunks in {}ms",
            config.name,
            stats.files,
            stats.chunks,
            stats.time_ms
        );
        Ok(stats)
    }

    /// Rebuild a repository's collection from scratch
    pub async fn reindex(
        &self,
        config: &RepoConfig,
        store: &mut CollectionStore,
    ) -> Result<IndexStats> {
        if let Some(collection) = store.collection_mut(&config.name) {
            collection.clear();
        }
        self.index(config, store).await
    }
}
