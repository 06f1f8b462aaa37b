use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Repository already exists: {0}")]
    RepoExists(String),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Invalid repository path: {0}")]
    InvalidPath(String),

    #[error("Chunker error: {0}")]
    Chunker(#[from] rag_code_chunker::ChunkerError),

    #[error("Vector store error: {0}")]
    Store(#[from] rag_vector_store::VectorStoreError),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
