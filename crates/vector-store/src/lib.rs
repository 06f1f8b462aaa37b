//! # RAG Vector Store
//!
//! Embeddings and in-memory vector collections for code search.
//!
//! ## Architecture
//!
//! ```text
//! CodeChunk[]
//!     │
//!     ├──> EmbeddingClient (remote API, batched; offline stub mode)
//!     │      └─> Vector[1536]
//!     │
//!     └──> CollectionStore
//!            └─> Collection per repository ─> cosine top-k search
//! ```
//!
//! ## Example
//!
//! ```
//! use rag_vector_store::{CollectionStore, EmbeddingClient};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), rag_vector_store::VectorStoreError> {
//! let embedder = EmbeddingClient::stub();
//! let mut store = CollectionStore::new(embedder.dimension());
//! store.create_collection("my-repo")?;
//!
//! let query = embedder.embed("parse configuration").await?;
//! let hits = store.search("my-repo", &query, 5)?;
//! assert!(hits.is_empty()); // nothing indexed yet
//! # Ok(())
//! # }
//! ```

mod collection;
mod embeddings;
mod error;
mod index;
mod store;
mod types;

pub use collection::{Collection, UPSERT_BATCH_SIZE};
pub use embeddings::{
    EmbeddingClient, EmbeddingMode, DEFAULT_ENDPOINT, DEFAULT_MODEL, EMBEDDING_DIMENSION,
    REQUEST_BATCH_SIZE,
};
pub use error::{Result, VectorStoreError};
pub use index::CosineIndex;
pub use store::CollectionStore;
pub use types::{SearchResult, StoredChunk};

// Re-export code chunker types for convenience
pub use rag_code_chunker::{ChunkType, CodeChunk, Language};
