// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use libfuzzer_sys::fuzz_target;
use notescope::analysis::client::{parse_analysis_response, parse_error_message};
use notescope::render::ResultRenderer;

// Whatever the server sends, parsing and rendering must not panic
fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };

    let _ = parse_error_message(body);
    if let Ok(result) = parse_analysis_response(body) {
        let mut renderer = ResultRenderer::new();
        let panel = renderer.render(&result);
        assert_eq!(panel.features.len(), result.features.len());
    }
});
