// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Persisted colour theme

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

use crate::Result;

/// Storage key holding the theme name
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl ThemeName {
    /// Class applied to the document, also the persisted value
    pub fn class(self) -> &'static str {
        match self {
            Self::Dark => "dark-theme",
            Self::Light => "light-theme",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Accepts both the class form and the bare name
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "dark-theme" | "dark" => Some(Self::Dark),
            "light-theme" | "light" => Some(Self::Light),
            _ => None,
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dark => "dark",
            Self::Light => "light",
        })
    }
}

/// Durable client-side key-value storage
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Preferences kept as a JSON object of strings in a file
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

/// In-process store; nothing survives the process
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Class list of the document root
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DocumentClasses(BTreeSet<String>);

impl DocumentClasses {
    pub fn contains(&self, class: &str) -> bool {
        self.0.contains(class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    fn apply_theme(&mut self, theme: ThemeName) {
        self.0.remove(theme.toggled().class());
        self.0.insert(theme.class().to_string());
    }
}

/// The active theme, its document marker, and its durable copy
pub struct ThemePreference {
    store: Box<dyn PreferenceStore>,
    current: ThemeName,
    document: DocumentClasses,
}

impl ThemePreference {
    /// Read the stored theme and apply it
    ///
    /// Unset, unrecognised and unreadable values all start the client dark.
    pub fn load(store: Box<dyn PreferenceStore>) -> Self {
        let current = match store.get(THEME_KEY) {
            Ok(Some(value)) => ThemeName::parse(&value).unwrap_or_else(|| {
                warn!("Ignoring unrecognised stored theme {:?}", value);
                ThemeName::default()
            }),
            Ok(None) => ThemeName::default(),
            Err(e) => {
                warn!("Cannot read stored theme, using {}: {}", ThemeName::default(), e);
                ThemeName::default()
            }
        };

        let mut document = DocumentClasses::default();
        document.apply_theme(current);
        Self { store, current, document }
    }

    pub fn theme(&self) -> ThemeName {
        self.current
    }

    pub fn document(&self) -> &DocumentClasses {
        &self.document
    }

    /// Flip the theme, apply it, and persist it before returning
    pub fn toggle(&mut self) -> Result<ThemeName> {
        let next = self.current.toggled();
        // A failed write leaves the document on the old theme
        self.store.set(THEME_KEY, next.class())?;
        self.document.apply_theme(next);
        self.current = next;
        info!("Theme set to {}", next);
        Ok(next)
    }
}
