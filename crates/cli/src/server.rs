use crate::api::{
    CollectionsResponse, HealthResponse, MessageResponse, ReindexRequest,
    RepositoryActionRequest, SearchRequest, SearchResultBody, DEFAULT_SEARCH_LIMIT,
};
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rag_code_chunker::Language;
use rag_indexer::{RepoConfig, RepoIndexer, RepoRegistry};
use rag_vector_store::{CollectionStore, EmbeddingClient};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// API error carrying the HTTP status and a `{"detail": ...}` payload
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "detail": self.detail });
        (self.status, Json(body)).into_response()
    }
}

struct ServiceInner {
    registry: RepoRegistry,
    store: CollectionStore,
}

/// The repository service: registry + collections + index pipeline.
///
/// Registry mutations and (re)indexing take the write lock; searches and
/// listings take the read lock.
pub struct Service {
    inner: RwLock<ServiceInner>,
    indexer: RepoIndexer,
}

impl Service {
    pub fn new(embedder: EmbeddingClient) -> Self {
        let store = CollectionStore::new(embedder.dimension());
        Self {
            inner: RwLock::new(ServiceInner {
                registry: RepoRegistry::new(),
                store,
            }),
            indexer: RepoIndexer::new(embedder),
        }
    }

    /// `POST /repositories` — dispatch on the requested action
    pub async fn manage_repository(
        &self,
        request: RepositoryActionRequest,
    ) -> Result<MessageResponse, ApiError> {
        match request.action.as_str() {
            "add" => self.add_repository(request).await,
            "remove" => self.remove_repository(&request.repo_name).await,
            _ => Err(ApiError::bad_request("Invalid action")),
        }
    }

    async fn add_repository(
        &self,
        request: RepositoryActionRequest,
    ) -> Result<MessageResponse, ApiError> {
        let language = Language::from_name(&request.language).ok_or_else(|| {
            ApiError::bad_request(format!("Unsupported language: {}", request.language))
        })?;
        let path = PathBuf::from(&request.repo_path);
        if !path.is_dir() {
            return Err(ApiError::bad_request(format!(
                "Invalid repository path: {}",
                request.repo_path
            )));
        }

        let mut inner = self.inner.write().await;
        if inner.registry.contains(&request.repo_name) {
            return Err(ApiError::bad_request("Repository already exists"));
        }

        inner
            .store
            .create_collection(&request.repo_name)
            .map_err(|e| ApiError::internal(e.to_string()))?;

        let config = RepoConfig {
            name: request.repo_name.clone(),
            path,
            language,
        };
        if let Err(e) = self.indexer.index(&config, &mut inner.store).await {
            // Roll the collection back so a retry starts clean
            let _ = inner.store.delete_collection(&request.repo_name);
            return Err(ApiError::internal(format!("Indexing failed: {e}")));
        }
        inner
            .registry
            .add(config)
            .map_err(|e| ApiError::internal(e.to_string()))?;

        Ok(MessageResponse {
            message: format!(
                "Repository '{}' added and indexed successfully",
                request.repo_name
            ),
        })
    }

    async fn remove_repository(&self, name: &str) -> Result<MessageResponse, ApiError> {
        let mut inner = self.inner.write().await;
        inner
            .registry
            .remove(name)
            .map_err(|_| ApiError::not_found("Repository not found"))?;
        if let Err(e) = inner.store.delete_collection(name) {
            log::warn!("Removed '{name}' from registry but not the store: {e}");
        }
        Ok(MessageResponse {
            message: format!("Repository '{name}' removed successfully"),
        })
    }

    /// `POST /reindex` — rebuild one repository's collection
    pub async fn reindex(&self, request: ReindexRequest) -> Result<MessageResponse, ApiError> {
        let mut inner = self.inner.write().await;
        let config = inner
            .registry
            .get(&request.repo_name)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Repository not found"))?;

        self.indexer
            .reindex(&config, &mut inner.store)
            .await
            .map_err(|e| ApiError::internal(format!("Reindexing failed: {e}")))?;

        Ok(MessageResponse {
            message: format!("Repository '{}' reindexed successfully", request.repo_name),
        })
    }

    /// `POST /search` — embed the query and rank one collection
    pub async fn search(
        &self,
        request: SearchRequest,
    ) -> Result<Vec<SearchResultBody>, ApiError> {
        let inner = self.inner.read().await;
        if !inner.registry.contains(&request.collection_name) {
            return Err(ApiError::bad_request("Invalid collection name"));
        }

        let query = self
            .indexer
            .embedder()
            .embed(&request.text)
            .await
            .map_err(|e| ApiError::internal(format!("Embedding failed: {e}")))?;

        let limit = request.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        let hits = inner
            .store
            .search(&request.collection_name, &query, limit)
            .map_err(|e| ApiError::internal(e.to_string()))?;

        Ok(hits
            .into_iter()
            .map(|hit| SearchResultBody {
                file_path: hit.chunk.file_path.clone(),
                code: hit.chunk.content.clone(),
                chunk_type: hit.chunk.chunk_type.as_str().to_string(),
                similarity: hit.score,
            })
            .collect())
    }

    /// `GET /collections` — names of managed repositories
    pub async fn collections(&self) -> CollectionsResponse {
        let inner = self.inner.read().await;
        CollectionsResponse {
            collections: inner.registry.names(),
        }
    }

    /// `GET /health` — liveness plus a repository count
    pub async fn health(&self) -> HealthResponse {
        let inner = self.inner.read().await;
        HealthResponse {
            status: "ok".to_string(),
            repositories: inner.registry.len(),
        }
    }
}

pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/repositories", post(manage_repository))
        .route("/reindex", post(reindex))
        .route("/search", post(search))
        .route("/collections", get(collections))
        .route("/health", get(health))
        .with_state(service)
}

/// Bind and serve the repository API
pub async fn serve(bind: &str, service: Arc<Service>) -> Result<()> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    println!("Serving repository API on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn manage_repository(
    State(service): State<Arc<Service>>,
    Json(request): Json<RepositoryActionRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    service.manage_repository(request).await.map(Json)
}

async fn reindex(
    State(service): State<Arc<Service>>,
    Json(request): Json<ReindexRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    service.reindex(request).await.map(Json)
}

async fn search(
    State(service): State<Arc<Service>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<SearchResultBody>>, ApiError> {
    service.search(request).await.map(Json)
}

async fn collections(State(service): State<Arc<Service>>) -> Json<CollectionsResponse> {
    Json(service.collections().await)
}

async fn health(State(service): State<Arc<Service>>) -> Json<HealthResponse> {
    Json(service.health().await)
}
