// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Text extraction with Google Cloud Vision.
//!
//! Dense document recognition is tried first; sparse text detection is the
//! fallback for photos where document mode finds nothing.

use crate::config::Config;
use crate::error::{AppError, Result};
use base64::Engine;
use serde::Deserialize;
use std::future::Future;

/// Recognition feature requested from the annotator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureMode {
    /// `DOCUMENT_TEXT_DETECTION`, for dense text
    Document,
    /// `TEXT_DETECTION`, for sparse text in photos
    Sparse,
}

impl FeatureMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureMode::Document => "DOCUMENT_TEXT_DETECTION",
            FeatureMode::Sparse => "TEXT_DETECTION",
        }
    }
}

/// One entry of an `images:annotate` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateResponse {
    #[serde(default)]
    pub full_text_annotation: Option<FullTextAnnotation>,
    #[serde(default)]
    pub text_annotations: Vec<TextAnnotation>,
    #[serde(default)]
    pub error: Option<ApiStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FullTextAnnotation {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextAnnotation {
    #[serde(default)]
    pub description: String,
}

/// Per-image error reported inside a successful HTTP response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    responses: Vec<AnnotateResponse>,
}

impl AnnotateResponse {
    /// Trimmed text for the given mode; empty if none was found.
    pub fn text(&self, mode: FeatureMode) -> &str {
        match mode {
            FeatureMode::Document => self
                .full_text_annotation
                .as_ref()
                .map(|a| a.text.trim())
                .unwrap_or(""),
            FeatureMode::Sparse => self
                .text_annotations
                .first()
                .map(|a| a.description.trim())
                .unwrap_or(""),
        }
    }
}

/// Image-to-text seam used by the reports screen.
pub trait TextAnnotator: Send + Sync + 'static {
    fn annotate(
        &self,
        image: &[u8],
        mode: FeatureMode,
    ) -> impl Future<Output = Result<AnnotateResponse>> + Send;
}

/// Recognize text in an image, falling back to sparse detection.
///
/// Returns [`AppError::NoTextFound`] when neither mode finds any text.
pub async fn extract_text<A: TextAnnotator>(annotator: &A, image: &[u8]) -> Result<String> {
    let document = annotator.annotate(image, FeatureMode::Document).await?;
    let text = document.text(FeatureMode::Document);
    if !text.is_empty() {
        return Ok(text.to_string());
    }

    tracing::debug!("Document detection found no text, trying sparse detection");
    let sparse = annotator.annotate(image, FeatureMode::Sparse).await?;
    let text = sparse.text(FeatureMode::Sparse);
    if !text.is_empty() {
        return Ok(text.to_string());
    }

    Err(AppError::NoTextFound)
}

/// Build the `images:annotate` request body for one image.
pub fn annotate_request(image: &[u8], mode: FeatureMode) -> serde_json::Value {
    serde_json::json!({
        "requests": [{
            "image": { "content": base64::engine::general_purpose::STANDARD.encode(image) },
            "features": [{ "type": mode.as_str() }],
            "imageContext": { "languageHints": ["en"] }
        }]
    })
}

/// Parse an `images:annotate` body into its first response.
pub fn parse_annotate_response(body: &str) -> Result<AnnotateResponse> {
    let batch: BatchResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Network(format!("Unexpected annotate response: {}", e)))?;
    let response = batch.responses.into_iter().next().unwrap_or_default();

    if let Some(status) = &response.error {
        return Err(AppError::Network(format!(
            "Vision error {}: {}",
            status.code, status.message
        )));
    }
    Ok(response)
}

/// Google Cloud Vision REST client.
#[derive(Clone)]
pub struct VisionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl VisionClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.vision_base_url.clone(),
            api_key: config.vision_api_key.clone(),
        }
    }
}

impl TextAnnotator for VisionClient {
    async fn annotate(&self, image: &[u8], mode: FeatureMode) -> Result<AnnotateResponse> {
        let url = format!("{}/images:annotate", self.base_url);
        let body = annotate_request(image, mode);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Network(format!("HTTP {}: {}", status, body)));
        }

        let body = response.text().await?;
        tracing::debug!(mode = mode.as_str(), bytes = image.len(), "Image annotated");
        parse_annotate_response(&body)
    }
}
