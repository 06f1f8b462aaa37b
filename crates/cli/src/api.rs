//! Wire types shared by the HTTP service and the client subcommands.
//!
//! The surface mirrors the repository API: `/repositories`, `/reindex`,
//! `/search`, `/collections`, `/health`.

use serde::{Deserialize, Serialize};

/// Results returned per search unless the request says otherwise
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// `POST /repositories` request; `action` is `add` or `remove`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryActionRequest {
    pub action: String,
    pub repo_name: String,
    #[serde(default)]
    pub repo_path: String,
    #[serde(default)]
    pub language: String,
}

/// `POST /reindex` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReindexRequest {
    pub repo_name: String,
}

/// `POST /search` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub text: String,
    pub collection_name: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// One `POST /search` hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultBody {
    pub file_path: String,
    pub code: String,
    pub chunk_type: String,
    pub similarity: f32,
}

/// Success payload with a human-readable message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `GET /collections` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsResponse {
    pub collections: Vec<String>,
}

/// `GET /health` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub repositories: usize,
}

/// Error payload: `{"detail": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
