// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Blob uploads over the Firebase Storage REST API.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::Session;
use serde::Deserialize;
use std::future::Future;

/// A stored object, as returned by an upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobHandle {
    pub bucket: String,
    /// Object path within the bucket
    pub name: String,
    /// Comma-separated download tokens; the first one is used for URLs
    #[serde(default)]
    pub download_tokens: Option<String>,
}

/// Object storage seam used for profile pictures and report images.
pub trait BlobStore: Send + Sync + 'static {
    /// Store `bytes` at `path`, replacing any existing object.
    fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<BlobHandle>> + Send;

    /// Public download URL for a stored object.
    fn url(&self, handle: &BlobHandle) -> Result<String>;
}

/// Firebase Storage client, authenticated as the signed-in user.
#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
    id_token: String,
}

impl StorageClient {
    pub fn new(config: &Config, session: &Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.storage_base_url.clone(),
            bucket: config.storage_bucket.clone(),
            id_token: session.id_token.clone(),
        }
    }
}

impl BlobStore for StorageClient {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<BlobHandle> {
        let url = format!("{}/b/{}/o", self.base_url, self.bucket);
        let size = bytes.len();

        let response = self
            .http
            .post(&url)
            .query(&[("name", path)])
            .header(reqwest::header::AUTHORIZATION, format!("Firebase {}", self.id_token))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Upload request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!("HTTP {}: {}", status, body)));
        }

        let handle: BlobHandle = response
            .json()
            .await
            .map_err(|e| AppError::Storage(format!("Unexpected upload response: {}", e)))?;

        tracing::info!(path, size, "Blob uploaded");
        Ok(handle)
    }

    fn url(&self, handle: &BlobHandle) -> Result<String> {
        download_url(&self.base_url, handle)
    }
}

/// Tokenized download URL for an object.
pub fn download_url(base_url: &str, handle: &BlobHandle) -> Result<String> {
    let token = handle
        .download_tokens
        .as_deref()
        .and_then(|tokens| tokens.split(',').next())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Storage(format!("No download token for {}", handle.name)))?;

    Ok(format!(
        "{}/b/{}/o/{}?alt=media&token={}",
        base_url,
        handle.bucket,
        urlencoding::encode(&handle.name),
        token
    ))
}
