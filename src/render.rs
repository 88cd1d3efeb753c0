// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Projection of an analysis result onto the results panel

use serde::Serialize;

use crate::analysis::{AnalysisResult, Feature};

/// Shown in the OCR block when the analyzer found no text
pub const NO_TEXT_PLACEHOLDER: &str = "No text detected";

/// Verdict badge contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Genuine,
    Suspicious,
}

impl Verdict {
    pub fn from_authentic(is_authentic: bool) -> Self {
        if is_authentic { Self::Genuine } else { Self::Suspicious }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Genuine => "GENUINE",
            Self::Suspicious => "SUSPICIOUS",
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Self::Genuine => "result-badge real",
            Self::Suspicious => "result-badge fake",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Genuine => "fas fa-check-circle",
            Self::Suspicious => "fas fa-exclamation-triangle",
        }
    }
}

/// An `<img>` slot and the data URI bound to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSlot {
    pub id: &'static str,
    pub src: String,
}

impl ImageSlot {
    fn bind(id: &'static str, base64_jpeg: &str) -> Self {
        Self {
            id,
            src: format!("data:image/jpeg;base64,{}", base64_jpeg),
        }
    }

    /// Base64 payload without the data URI prefix
    pub fn payload(&self) -> &str {
        self.src.split_once(',').map(|(_, p)| p).unwrap_or_default()
    }
}

/// One row of the feature checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureRow {
    pub name: String,
    pub value: String,
    pub status: String,
    pub status_class: &'static str,
}

impl From<&Feature> for FeatureRow {
    fn from(feature: &Feature) -> Self {
        Self {
            name: feature.name.clone(),
            value: feature.value.clone(),
            status: feature.status.clone(),
            status_class: if feature.passed() { "status-pass" } else { "status-fail" },
        }
    }
}

/// Everything the results panel displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsPanel {
    pub verdict: Verdict,
    pub confidence: String,
    pub original: ImageSlot,
    pub edges: ImageSlot,
    pub hough: ImageSlot,
    pub faces: ImageSlot,
    pub ocr_text: String,
    pub features: Vec<FeatureRow>,
}

impl ResultsPanel {
    pub fn images(&self) -> [&ImageSlot; 4] {
        [&self.original, &self.edges, &self.hough, &self.faces]
    }
}

/// Confidence readout: one decimal place and a percent sign
///
/// Ties round away from zero, so 97.25 reads as 97.3%.
pub fn format_confidence(percent: f64) -> String {
    let rounded = (percent * 10.0).round() / 10.0;
    format!("{:.1}%", rounded)
}

/// Owns the results panel and rebuilds it from each result
#[derive(Debug, Default)]
pub struct ResultRenderer {
    panel: Option<ResultsPanel>,
}

impl ResultRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, result: &AnalysisResult) -> &ResultsPanel {
        let visuals = &result.visuals;
        let panel = self.panel.insert(ResultsPanel {
            verdict: Verdict::from_authentic(result.is_authentic),
            confidence: format_confidence(result.confidence_percent),
            original: ImageSlot::bind("orig-preview", &visuals.original),
            edges: ImageSlot::bind("edge-img", &visuals.edges),
            hough: ImageSlot::bind("hough-img", &visuals.hough),
            faces: ImageSlot::bind("face-img", &visuals.faces),
            ocr_text: result
                .ocr_text
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(NO_TEXT_PLACEHOLDER)
                .to_string(),
            features: Vec::with_capacity(result.features.len()),
        });

        panel.features.clear();
        panel.features.extend(result.features.iter().map(FeatureRow::from));
        panel
    }

    pub fn panel(&self) -> Option<&ResultsPanel> {
        self.panel.as_ref()
    }

    pub fn clear(&mut self) {
        self.panel = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Visuals;

    fn result(features: Vec<Feature>) -> AnalysisResult {
        AnalysisResult {
            is_authentic: true,
            confidence_percent: 97.456,
            visuals: Visuals {
                original: "T1JJRw==".into(),
                edges: "RURHRQ==".into(),
                hough: "SE9VR0g=".into(),
                faces: "RkFDRQ==".into(),
            },
            ocr_text: None,
            features,
        }
    }

    #[test]
    fn test_genuine_result() {
        let mut renderer = ResultRenderer::new();
        let panel = renderer.render(&result(Vec::new()));
        assert_eq!(panel.verdict, Verdict::Genuine);
        assert_eq!(panel.verdict.label(), "GENUINE");
        assert_eq!(panel.verdict.class(), "result-badge real");
        assert_eq!(panel.confidence, "97.5%");
        assert_eq!(panel.ocr_text, NO_TEXT_PLACEHOLDER);
        assert!(panel.features.is_empty());
    }

    #[test]
    fn test_suspicious_badge() {
        let mut input = result(Vec::new());
        input.is_authentic = false;
        let panel = ResultRenderer::new().render(&input).clone();
        assert_eq!(panel.verdict.label(), "SUSPICIOUS");
        assert_eq!(panel.verdict.class(), "result-badge fake");
        assert_eq!(panel.verdict.icon(), "fas fa-exclamation-triangle");
    }

    #[test]
    fn test_images_bound_to_their_slots() {
        let input = result(Vec::new());
        let mut renderer = ResultRenderer::new();
        let panel = renderer.render(&input);

        assert_eq!(panel.original.id, "orig-preview");
        assert_eq!(panel.original.src, "data:image/jpeg;base64,T1JJRw==");
        let payloads: Vec<_> = panel.images().iter().map(|s| s.payload().to_string()).collect();
        let expected: Vec<_> = input.visuals.iter().map(|(_, p)| p.to_string()).collect();
        assert_eq!(payloads, expected);
    }

    #[test]
    fn test_confidence_rounding() {
        assert_eq!(format_confidence(97.456), "97.5%");
        assert_eq!(format_confidence(100.0), "100.0%");
        assert_eq!(format_confidence(0.04), "0.0%");
        assert_eq!(format_confidence(42.0), "42.0%");
        assert_eq!(format_confidence(97.25), "97.3%");
        assert_eq!(format_confidence(0.25), "0.3%");
        assert_eq!(format_confidence(12.75), "12.8%");
    }

    #[test]
    fn test_ocr_text_verbatim() {
        let mut input = result(Vec::new());
        input.ocr_text = Some("  FEDERAL RESERVE NOTE\n".into());
        let mut renderer = ResultRenderer::new();
        assert_eq!(renderer.render(&input).ocr_text, "  FEDERAL RESERVE NOTE\n");
    }

    #[test]
    fn test_feature_order_and_styling() {
        let features = vec![
            Feature::new("Structural Grid", "3", "FAIL"),
            Feature::new("Forensic Anomaly", "0.0123", "OK"),
            Feature::new("Portrait Recognition", "1", "PASS"),
        ];
        let mut renderer = ResultRenderer::new();
        let panel = renderer.render(&result(features));

        let names: Vec<_> = panel.features.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Structural Grid", "Forensic Anomaly", "Portrait Recognition"]);

        let classes: Vec<_> = panel.features.iter().map(|r| r.status_class).collect();
        assert_eq!(classes, ["status-fail", "status-fail", "status-pass"]);
        assert_eq!(panel.features[1].status, "OK");
        assert_eq!(panel.features[1].value, "0.0123");
    }

    #[test]
    fn test_single_feature() {
        let mut renderer = ResultRenderer::new();
        let panel = renderer.render(&result(vec![Feature::new("Portrait Recognition", "2", "PASS")]));
        assert_eq!(panel.features.len(), 1);
        assert_eq!(panel.features[0].name, "Portrait Recognition");
    }

    #[test]
    fn test_rerender_replaces_previous_rows() {
        let mut renderer = ResultRenderer::new();
        renderer.render(&result(vec![
            Feature::new("A", "1", "PASS"),
            Feature::new("B", "2", "PASS"),
        ]));
        let panel = renderer.render(&result(vec![Feature::new("C", "3", "FAIL")]));
        assert_eq!(panel.features.len(), 1);
        assert_eq!(panel.features[0].name, "C");
    }

    #[test]
    fn test_clear() {
        let mut renderer = ResultRenderer::new();
        renderer.render(&result(Vec::new()));
        renderer.clear();
        assert!(renderer.panel().is_none());
    }
}
