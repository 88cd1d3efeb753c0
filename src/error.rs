// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for notescope

use thiserror::Error;

/// Result type alias for notescope operations
pub type Result<T> = std::result::Result<T, NotescopeError>;

/// Notification shown when the server fails without saying why
pub const GENERIC_ANALYSIS_FAILURE: &str = "Something went wrong during analysis.";

/// Notification shown for any transport-level failure
pub const CONNECTIVITY_FAILURE: &str = "Could not connect to the server.";

/// Notification shown when a non-image is offered to the drop zone
pub const INVALID_FILE_TYPE: &str = "Please upload an image file.";

/// notescope error types
#[derive(Error, Debug)]
pub enum NotescopeError {
    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0}s")]
    TimedOut(u64),

    #[error("Server error: {}", .0.as_deref().unwrap_or("no reason given"))]
    Server(Option<String>),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("An analysis is already in flight")]
    AnalysisInFlight,

    #[error("Analysis of {0} did not complete")]
    AnalysisIncomplete(String),

    #[error("Unknown tab: {0}")]
    UnknownTab(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] base64::DecodeError),
}

impl NotescopeError {
    /// Transport could not be completed (including timeouts)
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::TimedOut(_))
    }

    /// Text for the blocking notification shown to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidFileType(_) => INVALID_FILE_TYPE.to_string(),
            // A 2xx body that cannot be read fails the same way as no reply at all
            Self::Network(_) | Self::TimedOut(_) | Self::MalformedResponse(_) => {
                CONNECTIVITY_FAILURE.to_string()
            }
            Self::Server(Some(reason)) if !reason.is_empty() => reason.clone(),
            Self::Server(_) => GENERIC_ANALYSIS_FAILURE.to_string(),
            Self::AnalysisInFlight => "An analysis is already running. Please wait.".to_string(),
            other => other.to_string(),
        }
    }
}
