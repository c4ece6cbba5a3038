//! # HTTP Backend
//!
//! Concrete [`TransliterationBackend`] that talks JSON to a transliteration
//! service over HTTP.
//!
//! ## Wire Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Load:      GET  {base}/health          2xx → Loaded, else Failed       │
//! │                                                                         │
//! │  Call:      POST {base}/transliterate                                   │
//! │             { "scheme": "itrans", "target": "devanagari",               │
//! │               "text": "Mumbai", "nativize": true }                      │
//! │         ◄── { "text": "मुंबई" }                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::backend::{BackendLoader, TransliterateOptions, TransliterationBackend};
use crate::error::{LipiError, LipiResult};

#[derive(Debug, Serialize)]
struct TransliterateRequest<'a> {
    scheme: &'a str,
    target: &'a str,
    text: &'a str,
    nativize: bool,
}

#[derive(Debug, Deserialize)]
struct TransliterateResponse {
    text: String,
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

// =============================================================================
// Backend
// =============================================================================

/// Loaded HTTP backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
}

#[async_trait]
impl TransliterationBackend for HttpBackend {
    async fn transliterate(
        &self,
        scheme: &str,
        target: &str,
        text: &str,
        options: TransliterateOptions,
    ) -> LipiResult<String> {
        let body = TransliterateRequest {
            scheme,
            target,
            text,
            nativize: options.nativize,
        };

        let resp = self.client.post(&self.endpoint).json(&body).send().await?;

        if !resp.status().is_success() {
            return Err(LipiError::BackendRejected {
                status: resp.status().as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let parsed: TransliterateResponse = resp.json().await?;
        Ok(parsed.text)
    }
}

// =============================================================================
// Loader
// =============================================================================

/// Probes the service and hands out an [`HttpBackend`] when it answers.
#[derive(Debug, Clone)]
pub struct HttpBackendLoader {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackendLoader {
    /// Builds the loader with a per-request timeout.
    pub fn new(base_url: &str, request_timeout: Duration) -> LipiResult<Self> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(LipiError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("patrak-lipi/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpBackendLoader {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl BackendLoader for HttpBackendLoader {
    async fn load(&self) -> LipiResult<Arc<dyn TransliterationBackend>> {
        let health = join_url(&self.base_url, "health");
        debug!(url = %health, "Probing transliteration backend");

        let resp = self
            .client
            .get(&health)
            .send()
            .await
            .map_err(|e| LipiError::LoadFailed(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LipiError::LoadFailed(format!(
                "health check returned {}",
                resp.status()
            )));
        }

        Ok(Arc::new(HttpBackend {
            client: self.client.clone(),
            endpoint: join_url(&self.base_url, "transliterate"),
        }))
    }
}
