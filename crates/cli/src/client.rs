use crate::api::{
    CollectionsResponse, ErrorBody, MessageResponse, ReindexRequest, RepositoryActionRequest,
    SearchRequest, SearchResultBody,
};
use anyhow::Result;
use std::path::Path;

/// Where client subcommands and the watcher expect the service
pub const DEFAULT_API_URL: &str = "http://localhost:7779";

/// Thin HTTP client for the repository API
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Register and index a repository; returns the service's message
    pub async fn add_repository(
        &self,
        name: &str,
        path: &Path,
        language: &str,
    ) -> Result<String> {
        let request = RepositoryActionRequest {
            action: "add".to_string(),
            repo_name: name.to_string(),
            repo_path: path.to_string_lossy().into_owned(),
            language: language.to_string(),
        };
        let response = self
            .http
            .post(format!("{}/repositories", self.base_url))
            .json(&request)
            .send()
            .await?;
        let body: MessageResponse = Self::expect_ok(response).await?;
        Ok(body.message)
    }

    /// Remove a repository; returns the service's message
    pub async fn remove_repository(&self, name: &str) -> Result<String> {
        let request = RepositoryActionRequest {
            action: "remove".to_string(),
            repo_name: name.to_string(),
            repo_path: String::new(),
            language: String::new(),
        };
        let response = self
            .http
            .post(format!("{}/repositories", self.base_url))
            .json(&request)
            .send()
            .await?;
        let body: MessageResponse = Self::expect_ok(response).await?;
        Ok(body.message)
    }

    /// List managed repositories
    pub async fn collections(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(format!("{}/collections", self.base_url))
            .send()
            .await?;
        let body: CollectionsResponse = Self::expect_ok(response).await?;
        Ok(body.collections)
    }

    /// Search one repository
    pub async fn search(
        &self,
        text: &str,
        collection_name: &str,
        limit: usize,
    ) -> Result<Vec<SearchResultBody>> {
        let request = SearchRequest {
            text: text.to_string(),
            collection_name: collection_name.to_string(),
            limit: Some(limit),
        };
        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .json(&request)
            .send()
            .await?;
        Self::expect_ok(response).await
    }

    /// Rebuild a repository's index; returns the service's message
    pub async fn reindex(&self, name: &str) -> Result<String> {
        let request = ReindexRequest {
            repo_name: name.to_string(),
        };
        let response = self
            .http
            .post(format!("{}/reindex", self.base_url))
            .json(&request)
            .send()
            .await?;
        let body: MessageResponse = Self::expect_ok(response).await?;
        Ok(body.message)
    }

    /// Parse a success body, or surface the service's `detail` message
    async fn expect_ok<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let detail = match response.json::<ErrorBody>().await {
            Ok(body) => body.detail,
            Err(_) => format!("service returned {status}"),
        };
        anyhow::bail!("{detail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:7779/");
        assert_eq!(client.base_url, "http://localhost:7779");
    }
}
