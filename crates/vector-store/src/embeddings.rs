use crate::error::{Result, VectorStoreError};
use serde::{Deserialize, Serialize};
use std::env;

/// Embedding model used by the remote API
pub const DEFAULT_MODEL: &str = "voyage-code-2";

/// Remote embeddings endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.voyageai.com/v1/embeddings";

/// Vector width of the default model
pub const EMBEDDING_DIMENSION: usize = 1536;

/// Inputs per remote request
pub const REQUEST_BATCH_SIZE: usize = 32;

/// Embedding backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingMode {
    /// Call the remote embeddings API
    Remote,
    /// Deterministic offline vectors (tests, air-gapped runs)
    Stub,
}

impl EmbeddingMode {
    /// Read the mode from `RR_EMBEDDING_MODE` (default: remote)
    pub fn from_env() -> Self {
        match env::var("RR_EMBEDDING_MODE") {
            Ok(value) if value.eq_ignore_ascii_case("stub") => Self::Stub,
            _ => Self::Remote,
        }
    }
}

/// Client for turning text into embedding vectors.
///
/// Remote mode batches inputs (32 per request) against a Voyage-style
/// embeddings endpoint. Blank inputs never reach the API: they embed as
/// zero vectors in place, so outputs always align one-to-one with inputs.
#[derive(Clone)]
pub struct EmbeddingClient {
    mode: EmbeddingMode,
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl EmbeddingClient {
    /// Build a client from `RR_EMBEDDING_MODE`, `RR_EMBEDDING_URL`,
    /// `RR_EMBEDDING_MODEL` and `VOYAGE_API_KEY`
    pub fn from_env() -> Self {
        let mode = EmbeddingMode::from_env();
        let endpoint =
            env::var("RR_EMBEDDING_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let model = env::var("RR_EMBEDDING_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let api_key = env::var("VOYAGE_API_KEY").ok();
        Self::new(mode, endpoint, model, api_key)
    }

    /// Build an offline stub client
    pub fn stub() -> Self {
        Self::new(
            EmbeddingMode::Stub,
            DEFAULT_ENDPOINT.to_string(),
            DEFAULT_MODEL.to_string(),
            None,
        )
    }

    /// Build a client with explicit settings
    pub fn new(
        mode: EmbeddingMode,
        endpoint: String,
        model: String,
        api_key: Option<String>,
    ) -> Self {
        Self {
            mode,
            http: reqwest::Client::new(),
            endpoint,
            model,
            api_key,
        }
    }

    /// Active backend mode
    #[must_use]
    pub const fn mode(&self) -> EmbeddingMode {
        self.mode
    }

    /// Vector width this client produces
    #[must_use]
    pub const fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }

    /// Embed a single text
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text]).await?;
        Ok(vectors.pop().expect("one vector per input"))
    }

    /// Embed many texts, one vector per input in order
    pub async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        match self.mode {
            EmbeddingMode::Stub => Ok(texts.iter().map(|t| stub_vector(t)).collect()),
            EmbeddingMode::Remote => self.embed_remote(texts).await,
        }
    }

    async fn embed_remote(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            VectorStoreError::embedding("VOYAGE_API_KEY is not set but remote mode is active")
        })?;

        // Keep positions of blank inputs so outputs stay aligned
        let mut vectors = vec![None; texts.len()];
        let non_blank: Vec<(usize, &str)> = texts
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.trim().is_empty())
            .map(|(i, t)| (i, *t))
            .collect();

        for batch in non_blank.chunks(REQUEST_BATCH_SIZE) {
            let input: Vec<&str> = batch.iter().map(|(_, t)| *t).collect();
            log::debug!("Embedding batch of {} inputs", input.len());

            let response = self
                .http
                .post(&self.endpoint)
                .bearer_auth(api_key)
                .json(&EmbeddingRequest {
                    model: &self.model,
                    input: &input,
                })
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(VectorStoreError::embedding(format!(
                    "embedding service returned {status}: {body}"
                )));
            }

            let parsed: EmbeddingResponse = response.json().await?;
            if parsed.data.len() != input.len() {
                return Err(VectorStoreError::embedding(format!(
                    "embedding service returned {} vectors for {} inputs",
                    parsed.data.len(),
                    input.len()
                )));
            }

            for ((position, _), data) in batch.iter().zip(parsed.data) {
                if data.embedding.len() != EMBEDDING_DIMENSION {
                    return Err(VectorStoreError::InvalidDimension {
                        expected: EMBEDDING_DIMENSION,
                        actual: data.embedding.len(),
                    });
                }
                vectors[*position] = Some(data.embedding);
            }
        }

        Ok(vectors
            .into_iter()
            .map(|v| v.unwrap_or_else(|| vec![0.0; EMBEDDING_DIMENSION]))
            .collect())
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Deterministic unit vector derived from the text bytes.
///
/// Not semantically meaningful; equal texts map to equal vectors, which is
/// all the offline pipeline and the tests need.
fn stub_vector(text: &str) -> Vec<f32> {
    if text.trim().is_empty() {
        return vec![0.0; EMBEDDING_DIMENSION];
    }

    // FNV-1a over the bytes seeds a splitmix-style generator
    let mut state: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in text.bytes() {
        state ^= u64::from(byte);
        state = state.wrapping_mul(0x0000_0100_0000_01b3);
    }

    let mut vector = Vec::with_capacity(EMBEDDING_DIMENSION);
    for _ in 0..EMBEDDING_DIMENSION {
        state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^= z >> 31;
        vector.push(((z >> 40) as f32 / 8_388_608.0) - 1.0);
    }

    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in &mut vector {
            *value /= norm;
        }
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stub_vectors_are_deterministic() {
        let a = stub_vector("fn main() {}");
        let b = stub_vector("fn main() {}");
        let c = stub_vector("def main(): pass");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), EMBEDDING_DIMENSION);
    }

    #[test]
    fn stub_vectors_are_normalized() {
        let v = stub_vector("some code");
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4, "norm was {norm}");
    }

    #[test]
    fn blank_text_embeds_as_zero_vector() {
        let v = stub_vector("   \n\t");
        assert!(v.iter().all(|x| *x == 0.0));
        assert_eq!(v.len(), EMBEDDING_DIMENSION);
    }

    #[tokio::test]
    async fn stub_batch_aligns_with_inputs() {
        let client = EmbeddingClient::stub();
        let vectors = client
            .embed_batch(&["alpha", "", "gamma"])
            .await
            .unwrap();

        assert_eq!(vectors.len(), 3);
        assert!(vectors[1].iter().all(|x| *x == 0.0));
        assert_eq!(vectors[0], client.embed("alpha").await.unwrap());
    }

    #[tokio::test]
    async fn remote_mode_without_key_is_an_error() {
        let client = EmbeddingClient::new(
            EmbeddingMode::Remote,
            DEFAULT_ENDPOINT.to_string(),
            DEFAULT_MODEL.to_string(),
            None,
        );
        let err = client.embed("code").await.unwrap_err();
        assert!(err.to_string().contains("VOYAGE_API_KEY"));
    }
}
