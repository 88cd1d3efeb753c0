// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Text and HTML renderings of the UI state, and visual export

use base64::{engine::general_purpose, Engine as _};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::render::ResultsPanel;
use crate::state::{Phase, UiState};
use crate::Result;

/// Results panel as plain terminal text
pub fn render_text(panel: &ResultsPanel) -> String {
    let mut out = format!(
        "Verdict:    {}\nConfidence: {}\n\nFeatures:\n",
        panel.verdict.label(),
        panel.confidence
    );

    if panel.features.is_empty() {
        out.push_str("  (none)\n");
    }
    for row in &panel.features {
        let mark = if row.status_class == "status-pass" { '+' } else { '-' };
        out.push_str(&format!("  {} {:<24} {:>10}  {}\n", mark, row.name, row.value, row.status));
    }

    out.push_str("\nText found:\n");
    for line in panel.ocr_text.lines() {
        out.push_str(&format!("  {}\n", line));
    }
    out
}

/// Decode the four visuals and write them as `<stem>_<label>.jpg`
pub fn save_visuals(panel: &ResultsPanel, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let labels = ["original", "edges", "hough", "faces"];
    let mut written = Vec::with_capacity(labels.len());
    for (label, slot) in labels.iter().zip(panel.images()) {
        let bytes = general_purpose::STANDARD.decode(slot.payload())?;
        let path = dir.join(format!("{}_{}.jpg", stem, label));
        std::fs::write(&path, bytes)?;
        info!("Wrote {:?}", path);
        written.push(path);
    }
    Ok(written)
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn hidden(visible: bool) -> &'static str {
    if visible { "" } else { " hidden" }
}

fn active(is_active: bool) -> &'static str {
    if is_active { " active" } else { "" }
}

/// Static page snapshot of the whole interface
pub fn render_html(state: &UiState) -> String {
    let body_class: Vec<_> = state.theme().document().iter().collect();
    let phase = state.phase();
    let panel = state.results();

    let drop_zone = format!(
        r#"<div id="drop-zone" class="drop-zone{}{}{}">
            <p>Drop a banknote image here or click to choose one</p>
            <input type="file" id="file-input" accept="image/*" hidden>
        </div>
        <div id="scanner" class="scanner{}"></div>"#,
        if state.intake().is_armed() { " drag-over" } else { "" },
        if state.drop_zone_idle() { "" } else { " scanning" },
        hidden(panel.is_none()),
        hidden(phase == Phase::Scanning),
    );

    let results = match panel {
        Some(panel) => render_results_panel(state, panel),
        None => r#"<div id="results-panel" class="results-panel hidden"></div>"#.to_string(),
    };

    base_template(&body_class.join(" "), &format!("{}\n{}", drop_zone, results))
}

fn render_results_panel(state: &UiState, panel: &ResultsPanel) -> String {
    let tab_buttons: String = state
        .tabs()
        .entries()
        .map(|(binding, is_active)| {
            format!(
                r#"<button class="tab-btn{}" data-tab="{}">{}</button>"#,
                active(is_active),
                escape_html(&binding.tab),
                escape_html(&binding.tab)
            )
        })
        .collect();

    let feature_rows: String = panel
        .features
        .iter()
        .map(|row| {
            format!(
                r#"<div class="feature-item-row">
                    <span>{}</span>
                    <div class="feature-detail">
                        <span class="feature-value">{}</span>
                        <span class="feature-status {}">{}</span>
                    </div>
                </div>"#,
                escape_html(&row.name),
                escape_html(&row.value),
                row.status_class,
                escape_html(&row.status)
            )
        })
        .collect();

    // Content for each known pane; anything else stays empty
    let pane_body = |pane: &str| -> String {
        let image = |slot: &crate::render::ImageSlot| {
            let id = escape_html(slot.id);
            format!(r#"<img id="{}" src="{}" alt="{}">"#, id, escape_html(&slot.src), id)
        };
        match pane {
            "features-pane" => format!(r#"<div id="feature-list">{}</div>"#, feature_rows),
            "edges-pane" => image(&panel.edges),
            "hough-pane" => image(&panel.hough),
            "faces-pane" => image(&panel.faces),
            "ocr-pane" => format!(r#"<pre id="ocr-content">{}</pre>"#, escape_html(&panel.ocr_text)),
            _ => String::new(),
        }
    };

    let panes: String = state
        .tabs()
        .entries()
        .map(|(binding, is_active)| {
            format!(
                r#"<div id="{}" class="tab-pane{}">{}</div>"#,
                escape_html(&binding.pane),
                active(is_active),
                pane_body(&binding.pane)
            )
        })
        .collect();

    format!(
        r#"<div id="results-panel" class="results-panel">
            <div class="summary">
                <img id="{}" src="{}" alt="original">
                <div id="main-status" class="{}"><i class="{}"></i> <span>{}</span></div>
                <div class="confidence">Confidence <span id="confidence-val">{}</span></div>
            </div>
            <nav class="tabs">{}</nav>
            {}
        </div>"#,
        escape_html(panel.original.id),
        escape_html(&panel.original.src),
        panel.verdict.class(),
        panel.verdict.icon(),
        panel.verdict.label(),
        panel.confidence,
        tab_buttons,
        panes
    )
}

fn base_template(body_class: &str, content: &str) -> String {
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>notescope report</title>
    <style>
        .dark-theme {{ --bg: #0f172a; --card: #1e293b; --text: #e2e8f0; --muted: #94a3b8; }}
        .light-theme {{ --bg: #f8fafc; --card: #ffffff; --text: #0f172a; --muted: #64748b; }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: var(--bg);
            color: var(--text);
            padding: 20px;
        }}
        .hidden {{ display: none; }}
        .result-badge {{ display: inline-block; padding: 8px 16px; border-radius: 8px; font-weight: bold; }}
        .result-badge.real {{ background: #065f46; color: #d1fae5; }}
        .result-badge.fake {{ background: #7f1d1d; color: #fee2e2; }}
        .tab-btn {{ background: var(--card); color: var(--muted); border: none; padding: 8px 14px; }}
        .tab-btn.active {{ color: var(--text); border-bottom: 2px solid #38bdf8; }}
        .tab-pane {{ display: none; padding: 16px 0; }}
        .tab-pane.active {{ display: block; }}
        .feature-item-row {{ display: flex; justify-content: space-between; padding: 8px 0; }}
        .feature-detail {{ display: flex; align-items: center; gap: 10px; }}
        .feature-value {{ font-size: 0.8rem; color: var(--muted); }}
        .status-pass {{ color: #10b981; }}
        .status-fail {{ color: #ef4444; }}
        img {{ max-width: 100%; border-radius: 8px; }}
    </style>
</head>
<body class="{}">
    <main class="container">
        {}
    </main>
    <footer>Generated {}</footer>
</body>
</html>"#, body_class, content, Local::now().format("%Y-%m-%d %H:%M"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Feature;
    use crate::state::tests::{sample_result, state};
    use crate::state::UiEvent;

    fn results_state() -> UiState {
        let mut result = sample_result();
        result.features = vec![
            Feature::new("Forensic Anomaly", "0.0123", "OK"),
            Feature::new("Portrait <Recognition>", "1", "PASS"),
        ];
        let mut state = state();
        state.apply(UiEvent::AnalysisSucceeded(result)).unwrap();
        state
    }

    #[test]
    fn test_text_report() {
        let state = results_state();
        let text = render_text(state.results().unwrap());
        assert!(text.contains("Verdict:    GENUINE"));
        assert!(text.contains("Confidence: 97.5%"));
        assert!(text.contains("RESERVE BANK"));
        let anomaly = text.find("Forensic Anomaly").unwrap();
        let portrait = text.find("Portrait <Recognition>").unwrap();
        assert!(anomaly < portrait);
    }

    #[test]
    fn test_html_intake_snapshot() {
        let html = render_html(&state());
        assert!(html.contains(r#"<body class="dark-theme">"#));
        assert!(html.contains(r#"class="results-panel hidden""#));
        assert!(html.contains(r#"class="drop-zone""#));
    }

    #[test]
    fn test_html_results_snapshot() {
        let mut state = results_state();
        state.apply(UiEvent::TabSelected("ocr".into())).unwrap();
        let html = render_html(&state);

        assert!(html.contains(r#"class="drop-zone hidden""#));
        assert!(html.contains(r#"<div id="main-status" class="result-badge real">"#));
        assert!(html.contains(r#"<span id="confidence-val">97.5%</span>"#));
        assert!(html.contains(r#"<div id="ocr-pane" class="tab-pane active">"#));
        assert!(html.contains(r#"<div id="features-pane" class="tab-pane">"#));
        assert!(html.contains(r#"<button class="tab-btn active" data-tab="ocr">"#));
        assert!(html.contains("Portrait &lt;Recognition&gt;"));
        assert!(html.contains(r#"feature-status status-fail">OK<"#));
        assert!(html.contains("data:image/jpeg;base64,aG91Z2g="));
    }

    #[test]
    fn test_html_escapes_visual_payloads() {
        let mut result = sample_result();
        result.visuals.original = "x\"><script>alert(1)</script>".into();
        result.visuals.edges = "y\" onerror=\"alert(2)".into();
        let mut state = state();
        state.apply(UiEvent::AnalysisSucceeded(result)).unwrap();
        state.apply(UiEvent::TabSelected("edges".into())).unwrap();
        let html = render_html(&state);

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(!html.contains(r#"" onerror=""#));
        assert!(html.contains("x&quot;&gt;&lt;script&gt;"));
        assert!(html.contains(r#"src="data:image/jpeg;base64,y&quot; onerror=&quot;alert(2)""#));
    }

    #[test]
    fn test_save_visuals_decodes_payloads() {
        let state = results_state();
        let dir = tempfile::tempdir().unwrap();
        let written = save_visuals(state.results().unwrap(), dir.path(), "note").unwrap();

        assert_eq!(written.len(), 4);
        assert_eq!(written[2], dir.path().join("note_hough.jpg"));
        assert_eq!(std::fs::read(&written[0]).unwrap(), b"orig");
        assert_eq!(std::fs::read(&written[3]).unwrap(), b"face");
    }

    #[test]
    fn test_save_visuals_rejects_bad_base64() {
        let mut result = sample_result();
        result.visuals.edges = "not base64!".into();
        let mut state = state();
        state.apply(UiEvent::AnalysisSucceeded(result)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let err = save_visuals(state.results().unwrap(), dir.path(), "note").unwrap_err();
        assert!(matches!(err, crate::NotescopeError::Encoding(_)));
    }
}
