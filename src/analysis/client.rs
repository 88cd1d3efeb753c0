// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! HTTP client for the remote analysis endpoint

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{AnalysisResult, Analyzer, Feature, Visuals};
use crate::config::EndpointConfig;
use crate::intake::UploadFile;
use crate::{NotescopeError, Result};

/// Analysis endpoint client
pub struct AnalysisClient {
    client: Client,
    base_url: String,
    analyze_url: String,
    field_name: String,
    timeout: Option<Duration>,
    health_timeout: Duration,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    is_real: bool,
    confidence: f64,
    visuals: Visuals,
    #[serde(default)]
    ocr_text: Option<String>,
    features: Vec<WireFeature>,
}

#[derive(Deserialize)]
struct WireFeature {
    name: String,
    val: serde_json::Value,
    status: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

impl AnalysisClient {
    /// Create a new client for the configured endpoint
    pub fn new(endpoint: &EndpointConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = endpoint.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| NotescopeError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: endpoint.url.trim_end_matches('/').to_string(),
            analyze_url: endpoint.analyze_url(),
            field_name: endpoint.field_name.clone(),
            timeout: endpoint.timeout(),
            health_timeout: endpoint.health_timeout(),
        })
    }

    /// Check that the analysis service answers at all
    pub async fn health_check(&self) -> Result<()> {
        self.client
            .get(&self.base_url)
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|e| classify(e, Some(self.health_timeout)))?;

        Ok(())
    }

    pub fn analyze_url(&self) -> &str {
        &self.analyze_url
    }

    fn build_form(&self, file: &UploadFile) -> Result<Form> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.media_type)
            .map_err(|_| NotescopeError::InvalidFileType(file.media_type.clone()))?;
        Ok(Form::new().part(self.field_name.clone(), part))
    }
}

#[async_trait]
impl Analyzer for AnalysisClient {
    async fn analyze(&self, file: &UploadFile) -> Result<AnalysisResult> {
        let form = self.build_form(file)?;

        debug!("Posting {} to {}", file.name, self.analyze_url);

        let response = self.client
            .post(&self.analyze_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| classify(e, self.timeout))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| classify(e, self.timeout))?;

        if !status.is_success() {
            let reason = parse_error_message(&body);
            warn!("Analysis endpoint returned status {}: {:?}", status, reason);
            return Err(NotescopeError::Server(reason));
        }

        let result = parse_analysis_response(&body)?;
        info!(
            "Analysis complete: authentic={} confidence={:.1}",
            result.is_authentic, result.confidence_percent
        );
        Ok(result)
    }
}

/// Transport failure, reported against the limit that was in force
fn classify(e: reqwest::Error, limit: Option<Duration>) -> NotescopeError {
    if e.is_timeout() {
        NotescopeError::TimedOut(limit.map(|t| t.as_secs()).unwrap_or_default())
    } else {
        NotescopeError::Network(e.to_string())
    }
}

/// Parse a success body into an [`AnalysisResult`]
pub fn parse_analysis_response(body: &str) -> Result<AnalysisResult> {
    let wire: AnalyzeResponse = serde_json::from_str(body)
        .map_err(|e| NotescopeError::MalformedResponse(e.to_string()))?;

    Ok(AnalysisResult {
        is_authentic: wire.is_real,
        confidence_percent: wire.confidence,
        visuals: wire.visuals,
        // An empty string reads the same as no text at all
        ocr_text: wire.ocr_text.filter(|t| !t.is_empty()),
        features: wire
            .features
            .into_iter()
            .map(|f| Feature {
                name: f.name,
                value: scalar_text(f.val),
                status: f.status,
            })
            .collect(),
    })
}

/// The `error` string of a failure body, if there is one
pub fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .filter(|e| !e.is_empty())
}

fn scalar_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
