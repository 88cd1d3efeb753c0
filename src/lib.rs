// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! notescope: banknote authenticity analysis client
//!
//! Takes an image from the user, sends it to a remote forensic analysis
//! service, and presents the verdict, confidence, annotated visuals, OCR
//! text and feature checklist. The interface is an explicit state machine
//! so the same controller drives the command line and the HTML report.

pub mod analysis;
pub mod config;
pub mod controller;
pub mod error;
pub mod intake;
pub mod render;
pub mod report;
pub mod state;
pub mod tabs;
pub mod theme;

pub use config::AppConfig;
pub use error::{NotescopeError, Result};
