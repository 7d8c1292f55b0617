//! HTTP relay client
//!
//! The relay is the remote half of the single-read contract: it deletes an
//! object the moment a download succeeds, so a replayed link deterministically
//! 404s. Wire surface: `POST {base}/api/upload` (body = framed blob, response
//! `{"id": "..."}`), `GET {base}/api/download/{id}`.

use bytes::Bytes;
use futures::stream;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use async_trait::async_trait;
use ddrop_core::config::RelayConfig;
use ddrop_core::{ShareError, ShareResult};

use crate::store::{ObjectStore, ProgressFn};

/// Upload body chunk size; small enough that progress moves visibly on
/// ordinary file sizes.
const UPLOAD_CHUNK: usize = 64 * 1024;

#[derive(Debug)]
pub struct HttpStore {
    client: Client,
    base: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    id: String,
}

impl HttpStore {
    /// Build a relay client from config.
    ///
    /// If `enforce_tls` is set and the endpoint uses HTTP, this returns an
    /// error; otherwise a plain-HTTP endpoint only logs a warning.
    pub fn new(cfg: &RelayConfig) -> anyhow::Result<Self> {
        if cfg.endpoint.starts_with("http://") {
            if cfg.enforce_tls {
                anyhow::bail!(
                    "relay endpoint uses plaintext HTTP ({}), but enforce_tls is enabled. \
                     Use an HTTPS endpoint or set relay.enforce_tls = false for local development.",
                    cfg.endpoint
                );
            }
            tracing::warn!(
                endpoint = %cfg.endpoint,
                "relay endpoint uses plaintext HTTP; blobs are ciphertext but link replay \
                 protection depends on transport integrity"
            );
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("building HTTP client: {e}"))?;

        Ok(Self {
            client,
            base: cfg.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ObjectStore for HttpStore {
    async fn store(&self, blob: Bytes, progress: Option<ProgressFn>) -> ShareResult<String> {
        let url = format!("{}/api/upload", self.base);
        let total = blob.len();

        let body = match &progress {
            Some(progress) => {
                progress(0);
                let chunks: Vec<Bytes> = (0..blob.len())
                    .step_by(UPLOAD_CHUNK)
                    .map(|off| blob.slice(off..(off + UPLOAD_CHUNK).min(blob.len())))
                    .collect();
                let counter = progress.clone();
                let mut sent = 0usize;
                // The chunk list is empty when total == 0, so the division
                // below never sees a zero total
                let counted = stream::iter(chunks.into_iter().map(move |chunk| {
                    sent += chunk.len();
                    counter((sent * 100 / total) as u8);
                    Ok::<Bytes, std::io::Error>(chunk)
                }));
                reqwest::Body::wrap_stream(counted)
            }
            None => reqwest::Body::from(blob),
        };

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .await
            .map_err(|e| ShareError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ShareError::Upload(format!(
                "relay returned {}",
                response.status()
            )));
        }

        let UploadResponse { id } = response
            .json()
            .await
            .map_err(|e| ShareError::Upload(format!("bad relay response: {e}")))?;

        // Streamed chunks only reach 100 for non-empty blobs; the accepted
        // response is the completion signal either way
        if let Some(progress) = &progress {
            progress(100);
        }

        tracing::info!(%id, bytes = total, "blob uploaded to relay");
        Ok(id)
    }

    async fn retrieve(&self, id: &str) -> ShareResult<Bytes> {
        let url = format!("{}/api/download/{id}", self.base);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ShareError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::GONE => Err(ShareError::NotFoundOrAlreadyConsumed),
            status if !status.is_success() => {
                Err(ShareError::Network(format!("relay returned {status}")))
            }
            _ => response
                .bytes()
                .await
                .map_err(|e| ShareError::Network(e.to_string())),
        }
    }
}
