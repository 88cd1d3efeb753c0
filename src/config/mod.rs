// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for notescope

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Remote analysis endpoint
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Durable client-side storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Result tab strip: each tab control and the pane it reveals
    #[serde(default = "default_tabs")]
    pub tabs: Vec<TabBinding>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EndpointConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_analyze_path")]
    pub analyze_path: String,
    /// Multipart field carrying the image
    #[serde(default = "default_field_name")]
    pub field_name: String,
    /// Unset means the request may wait indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Limit for the reachability check
    #[serde(default = "default_health_timeout_secs")]
    pub health_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_preferences_path")]
    pub preferences_path: String,
}

/// One row of the static tab table
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct TabBinding {
    pub tab: String,
    pub pane: String,
}

impl TabBinding {
    /// Binding that follows the `<tab>-pane` naming convention
    pub fn conventional(tab: &str) -> Self {
        Self {
            tab: tab.to_string(),
            pane: format!("{}-pane", tab),
        }
    }
}

// Default value functions
fn default_url() -> String { "http://127.0.0.1:5000".to_string() }
fn default_analyze_path() -> String { "/analyze".to_string() }
fn default_field_name() -> String { "file".to_string() }
fn default_health_timeout_secs() -> u64 { 10 }
fn default_preferences_path() -> String { "notescope_prefs.json".to_string() }

fn default_tabs() -> Vec<TabBinding> {
    ["features", "edges", "hough", "faces", "ocr"]
        .into_iter()
        .map(TabBinding::conventional)
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            storage: StorageConfig::default(),
            tabs: default_tabs(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            analyze_path: default_analyze_path(),
            field_name: default_field_name(),
            timeout_secs: None,
            health_timeout_secs: default_health_timeout_secs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            preferences_path: default_preferences_path(),
        }
    }
}

impl EndpointConfig {
    /// Full URL of the analysis route
    pub fn analyze_url(&self) -> String {
        let base = self.url.trim_end_matches('/');
        let path = self.analyze_path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::NotescopeError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
