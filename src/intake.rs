// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Upload intake: drop zone, file chooser and the selected-file slot

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{NotescopeError, Result};

/// A file offered for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name sent with the multipart part
    pub name: String,
    /// Declared media type, e.g. `image/jpeg`
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring its media type from the extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self::new(name, media_type_for_path(path), bytes))
    }

    pub fn is_image(&self) -> bool {
        is_image_media_type(&self.media_type)
    }
}

/// Coarse check: the media type belongs to the `image/` family
pub fn is_image_media_type(media_type: &str) -> bool {
    const PREFIX: &str = "image/";
    let media_type = media_type.trim();
    media_type.len() > PREFIX.len()
        && media_type
            .get(..PREFIX.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(PREFIX))
}

/// Media type declared for a file, inferred from its extension
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Source of a file when the drop zone is clicked
pub trait FileChooser {
    /// `None` when the user dismisses the chooser
    fn choose(&mut self) -> Option<UploadFile>;
}

/// Chooser backed by a path given up front (command line)
pub struct PathChooser {
    path: PathBuf,
    media_type: Option<String>,
}

impl PathChooser {
    pub fn new(path: PathBuf) -> Self {
        Self { path, media_type: None }
    }

    /// Declare the media type instead of inferring it from the extension
    pub fn with_media_type(mut self, media_type: Option<String>) -> Self {
        self.media_type = media_type;
        self
    }
}

impl FileChooser for PathChooser {
    fn choose(&mut self) -> Option<UploadFile> {
        match UploadFile::from_path(&self.path) {
            Ok(mut file) => {
                if let Some(media_type) = &self.media_type {
                    file.media_type = media_type.clone();
                }
                Some(file)
            }
            Err(e) => {
                warn!("Cannot read {:?}: {}", self.path, e);
                None
            }
        }
    }
}

/// The drop/click target and the single selected-file slot
#[derive(Debug, Default)]
pub struct UploadIntake {
    armed: bool,
    selected: Option<UploadFile>,
}

impl UploadIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dragged item hovers over the zone
    pub fn drag_over(&mut self) {
        self.armed = true;
    }

    pub fn drag_leave(&mut self) {
        self.armed = false;
    }

    /// Items dropped onto the zone; only the first one is taken
    pub fn drop(&mut self, items: Vec<UploadFile>) -> Option<UploadFile> {
        self.armed = false;
        if items.len() > 1 {
            debug!("Ignoring {} extra dropped item(s)", items.len() - 1);
        }
        items.into_iter().next()
    }

    /// The zone was clicked: open the chooser
    pub fn click(&mut self, chooser: &mut dyn FileChooser) -> Option<UploadFile> {
        chooser.choose()
    }

    /// Validate a candidate and store it in the selected-file slot
    pub fn submit(&mut self, candidate: UploadFile) -> Result<&UploadFile> {
        if !candidate.is_image() {
            warn!("Rejected {} ({})", candidate.name, candidate.media_type);
            return Err(NotescopeError::InvalidFileType(candidate.media_type));
        }

        info!("Accepted {} ({}, {} bytes)", candidate.name, candidate.media_type, candidate.bytes.len());
        let stored: &UploadFile = self.selected.insert(candidate);
        Ok(stored)
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn selected(&self) -> Option<&UploadFile> {
        self.selected.as_ref()
    }

    /// Clear the slot so choosing the same file again registers
    pub fn reset(&mut self) {
        self.selected = None;
    }
}
