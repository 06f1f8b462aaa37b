//! # RAG Indexer
//!
//! Repository registry, scanning, and the index pipeline.
//!
//! ## Pipeline
//!
//! ```text
//! Repository (name, path, language)
//!     │
//!     ├──> File Scanner (.gitignore aware)
//!     │      └─> Source files
//!     │
//!     ├──> Chunker (tree-sitter)
//!     │      └─> Code chunks
//!     │
//!     └──> Embed + upsert into the repository's collection
//! ```
//!
//! A [`RepoWatcher`] watches a directory of repositories and yields
//! debounced batches of repository names to reindex.

mod error;
mod indexer;
mod registry;
mod scanner;
mod stats;
mod watcher;

pub use error::{IndexerError, Result};
pub use indexer::RepoIndexer;
pub use registry::{RepoConfig, RepoRegistry};
pub use scanner::FileScanner;
pub use stats::IndexStats;
pub use watcher::{
    repo_for_event, DebouncedChanges, RepoWatcher, DEBOUNCE_WINDOW, POLL_INTERVAL,
};
