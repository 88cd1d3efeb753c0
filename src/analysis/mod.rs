// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Analysis results and the seam to the remote analyzer

pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::intake::UploadFile;
use crate::Result;

pub use client::AnalysisClient;

/// Status literal that counts as a passed check
pub const PASS: &str = "PASS";

/// Result of a remote forensic analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub is_authentic: bool,
    /// 0-100
    pub confidence_percent: f64,
    pub visuals: Visuals,
    pub ocr_text: Option<String>,
    /// In the analysis pipeline's own order
    pub features: Vec<Feature>,
}

/// Annotated renderings of the upload, each base64-encoded JPEG
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visuals {
    pub original: String,
    pub edges: String,
    pub hough: String,
    pub faces: String,
}

impl Visuals {
    /// `(label, payload)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("original", self.original.as_str()),
            ("edges", self.edges.as_str()),
            ("hough", self.hough.as_str()),
            ("faces", self.faces.as_str()),
        ]
        .into_iter()
    }
}

/// One named forensic check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub value: String,
    /// Literal status as reported, usually `PASS` or `FAIL`
    pub status: String,
}

impl Feature {
    pub fn new(name: impl Into<String>, value: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            status: status.into(),
        }
    }

    /// Anything other than exactly `PASS` counts as a failure
    pub fn passed(&self) -> bool {
        self.status == PASS
    }
}

/// Something that can turn an upload into an analysis result
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, file: &UploadFile) -> Result<AnalysisResult>;
}
