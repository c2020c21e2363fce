//! HTTP embedding provider for Ollama-compatible services.
//!
//! POST `{endpoint}/api/embed` with `{model, input}` and read `{embeddings}`.
//! Uses the blocking client, so calls must run off the async executor.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use relata_core::config::EmbeddingConfig;
use relata_core::errors::{EmbeddingError, RelataResult};
use relata_core::traits::IEmbeddingProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How long a failed service is skipped before requests are tried again.
const RETRY_AFTER: Duration = Duration::from_secs(30);

pub struct HttpProvider {
    base_url: String,
    model: String,
    dimensions: usize,
    timeout: Duration,
    /// Set after a failed request or health check; cleared by the next success.
    down_until: Mutex<Option<Instant>>,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl HttpProvider {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dimensions: config.dimensions,
            timeout: Duration::from_millis(config.timeout_ms),
            down_until: Mutex::new(None),
        }
    }

    fn client(&self) -> RelataResult<reqwest::blocking::Client> {
        reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                EmbeddingError::InferenceFailed {
                    reason: format!("http client error: {e}"),
                }
                .into()
            })
    }

    /// Check `{endpoint}/api/tags` and record the result.
    pub fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        let ok = match self.client().map(|c| c.get(&url).send()) {
            Ok(Ok(resp)) if resp.status().is_success() => true,
            Ok(Ok(resp)) => {
                warn!(status = %resp.status(), "embedding service health check failed");
                false
            }
            Ok(Err(e)) => {
                warn!(error = %e, "embedding service unreachable");
                false
            }
            Err(e) => {
                warn!(error = %e, "embedding client unavailable");
                false
            }
        };
        self.record(ok);
        ok
    }

    fn record(&self, ok: bool) {
        let mut down_until = match self.down_until.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *down_until = if ok { None } else { Some(Instant::now() + RETRY_AFTER) };
    }

    fn request_embeddings(&self, texts: &[String]) -> RelataResult<Vec<Vec<f32>>> {
        let url = format!("{}/api/embed", self.base_url);
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };
        let result = self.send(&url, &request);
        self.record(result.is_ok());
        let embeddings = result?;

        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!(
                    "expected {} embeddings, service returned {}",
                    texts.len(),
                    embeddings.len()
                ),
            }
            .into());
        }
        for v in &embeddings {
            if v.len() != self.dimensions {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: v.len(),
                }
                .into());
            }
        }
        debug!(count = embeddings.len(), model = %self.model, "embeddings received");
        Ok(embeddings)
    }

    fn send(&self, url: &str, request: &EmbedRequest<'_>) -> RelataResult<Vec<Vec<f32>>> {
        let response = self
            .client()?
            .post(url)
            .json(request)
            .send()
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("embedding HTTP error: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("embedding service returned {status}: {body}"),
            }
            .into());
        }

        let parsed: EmbedResponse = response.json().map_err(|e| EmbeddingError::InferenceFailed {
            reason: format!("embedding JSON parse error: {e}"),
        })?;
        Ok(parsed.embeddings)
    }
}

impl IEmbeddingProvider for HttpProvider {
    fn embed(&self, text: &str) -> RelataResult<Vec<f32>> {
        let results = self.request_embeddings(&[text.to_string()])?;
        results.into_iter().next().ok_or_else(|| {
            EmbeddingError::InferenceFailed {
                reason: "empty embedding response".to_string(),
            }
            .into()
        })
    }

    fn embed_batch(&self, texts: &[String]) -> RelataResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request_embeddings(texts)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        let down_until = match self.down_until.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        };
        down_until.map_or(true, |until| Instant::now() >= until)
    }
}
