// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Central UI state and its transitions
//!
//! Every slice of the interface (intake zone, scanner, results panel, tab
//! strip, document theme) lives in one [`UiState`]. Changes happen only
//! through [`UiState::apply`] with a typed [`UiEvent`], apart from the scan
//! indicator which is held by a [`ScanGuard`] for exactly as long as a
//! request is outstanding.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analysis::AnalysisResult;
use crate::config::AppConfig;
use crate::intake::{FileChooser, UploadFile, UploadIntake};
use crate::render::{ResultRenderer, ResultsPanel};
use crate::tabs::TabController;
use crate::theme::{PreferenceStore, ThemePreference};
use crate::{NotescopeError, Result};

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Intake,
    Results,
}

/// State machine position; `Scanning` is the intake screen with a request out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Intake,
    Scanning,
    Results,
}

impl Phase {
    pub fn mode(self) -> UiMode {
        match self {
            Self::Intake | Self::Scanning => UiMode::Intake,
            Self::Results => UiMode::Results,
        }
    }
}

/// Busy flag shown by the scanner overlay and the drop zone
#[derive(Debug, Clone, Default)]
pub struct ScanIndicator {
    active: Arc<AtomicBool>,
}

impl ScanIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the indicator; `None` while another request holds it
    pub fn acquire(&self) -> Option<ScanGuard> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| {
                debug!("Scanner on");
                ScanGuard { active: Arc::clone(&self.active) }
            })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Holds the scan indicator on; releasing happens on drop, on every path
#[derive(Debug)]
#[must_use = "the scanner turns off as soon as the guard is dropped"]
pub struct ScanGuard {
    active: Arc<AtomicBool>,
}

impl Drop for ScanGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
        debug!("Scanner off");
    }
}

/// Typed inputs to the state machine
#[derive(Debug)]
pub enum UiEvent {
    DragOver,
    DragLeave,
    FileSelected(UploadFile),
    AnalysisSucceeded(AnalysisResult),
    AnalysisFailed(NotescopeError),
    TabSelected(String),
    ThemeToggled,
    Reset,
}

/// A blocking notification for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.raised_at.format("%H:%M:%S"), self.message)
    }
}

/// All interface state, owned in one place
pub struct UiState {
    mode: UiMode,
    scanner: ScanIndicator,
    intake: UploadIntake,
    renderer: ResultRenderer,
    tabs: TabController,
    theme: ThemePreference,
}

impl UiState {
    pub fn new(tabs: TabController, theme: ThemePreference) -> Self {
        Self {
            mode: UiMode::Intake,
            scanner: ScanIndicator::new(),
            intake: UploadIntake::new(),
            renderer: ResultRenderer::new(),
            tabs,
            theme,
        }
    }

    /// Build from configuration, validating the tab table up front
    pub fn from_config(config: &AppConfig, store: Box<dyn PreferenceStore>) -> Result<Self> {
        let tabs = TabController::new(config.tabs.clone())?;
        let theme = ThemePreference::load(store);
        Ok(Self::new(tabs, theme))
    }

    /// Share a scan indicator with another state (one request at a time across both)
    pub fn with_scanner(mut self, scanner: ScanIndicator) -> Self {
        self.scanner = scanner;
        self
    }

    /// Apply one event; returns the notification it raises, if any
    pub fn apply(&mut self, event: UiEvent) -> Result<Option<Notice>> {
        match event {
            UiEvent::DragOver => {
                self.intake.drag_over();
                Ok(None)
            }
            UiEvent::DragLeave => {
                self.intake.drag_leave();
                Ok(None)
            }
            UiEvent::FileSelected(file) => match self.intake.submit(file) {
                Ok(_) => Ok(None),
                Err(e @ NotescopeError::InvalidFileType(_)) => Ok(Some(Notice::new(e.user_message()))),
                Err(e) => Err(e),
            },
            UiEvent::AnalysisSucceeded(result) => {
                self.renderer.render(&result);
                self.mode = UiMode::Results;
                info!("Showing results");
                Ok(None)
            }
            UiEvent::AnalysisFailed(error) => {
                warn!("Analysis failed: {}", error);
                self.reset();
                Ok(Some(Notice::new(error.user_message())))
            }
            UiEvent::TabSelected(tab_id) => {
                self.tabs.select(&tab_id)?;
                Ok(None)
            }
            UiEvent::ThemeToggled => {
                self.theme.toggle()?;
                Ok(None)
            }
            UiEvent::Reset => {
                self.reset();
                Ok(None)
            }
        }
    }

    /// Items dropped on the drop zone; yields the first one
    pub fn drop_items(&mut self, items: Vec<UploadFile>) -> Option<UploadFile> {
        self.intake.drop(items)
    }

    /// The drop zone was clicked
    pub fn click(&mut self, chooser: &mut dyn FileChooser) -> Option<UploadFile> {
        self.intake.click(chooser)
    }

    /// Back to the intake screen with nothing selected and no results
    fn reset(&mut self) {
        self.renderer.clear();
        self.intake.reset();
        self.mode = UiMode::Intake;
    }

    pub fn phase(&self) -> Phase {
        if self.scanner.is_active() {
            Phase::Scanning
        } else {
            match self.mode {
                UiMode::Intake => Phase::Intake,
                UiMode::Results => Phase::Results,
            }
        }
    }

    pub fn mode(&self) -> UiMode {
        self.mode
    }

    pub fn scanner(&self) -> &ScanIndicator {
        &self.scanner
    }

    /// Idle drop-zone affordances are hidden while scanning
    pub fn drop_zone_idle(&self) -> bool {
        !self.scanner.is_active()
    }

    pub fn intake(&self) -> &UploadIntake {
        &self.intake
    }

    /// Results panel contents, only while the results screen is showing
    pub fn results(&self) -> Option<&ResultsPanel> {
        match self.mode {
            UiMode::Results => self.renderer.panel(),
            UiMode::Intake => None,
        }
    }

    pub fn tabs(&self) -> &TabController {
        &self.tabs
    }

    pub fn theme(&self) -> &ThemePreference {
        &self.theme
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::analysis::{Feature, Visuals};
    use crate::theme::{MemoryStore, ThemeName};
    use chrono::TimeZone;

    pub(crate) fn state() -> UiState {
        UiState::from_config(&AppConfig::default(), Box::new(MemoryStore::new())).unwrap()
    }

    pub(crate) fn sample_result() -> AnalysisResult {
        AnalysisResult {
            is_authentic: true,
            confidence_percent: 97.456,
            visuals: Visuals {
                original: "b3JpZw==".into(),
                edges: "ZWRnZQ==".into(),
                hough: "aG91Z2g=".into(),
                faces: "ZmFjZQ==".into(),
            },
            ocr_text: Some("RESERVE BANK".into()),
            features: vec![Feature::new("Portrait Recognition", "1", "PASS")],
        }
    }

    #[test]
    fn test_starts_on_intake() {
        let state = state();
        assert_eq!(state.phase(), Phase::Intake);
        assert_eq!(state.mode(), UiMode::Intake);
        assert!(state.results().is_none());
        assert!(state.drop_zone_idle());
        assert_eq!(state.tabs().active().tab, "features");
        assert_eq!(state.theme().theme(), ThemeName::Dark);
    }

    #[test]
    fn test_notice_display_carries_time() {
        let notice = Notice {
            message: "Could not connect to the server.".into(),
            raised_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
        };
        assert_eq!(notice.to_string(), "[09:26:53] Could not connect to the server.");
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let scanner = ScanIndicator::new();
        {
            let _guard = scanner.acquire().unwrap();
            assert!(scanner.is_active());
            assert!(scanner.acquire().is_none());
        }
        assert!(!scanner.is_active());
        assert!(scanner.acquire().is_some());
    }

    #[test]
    fn test_guard_releases_on_panic() {
        let scanner = ScanIndicator::new();
        let held = scanner.clone();
        let outcome = std::panic::catch_unwind(move || {
            let _guard = held.acquire().unwrap();
            panic!("renderer blew up");
        });
        assert!(outcome.is_err());
        assert!(!scanner.is_active());
    }

    #[test]
    fn test_shared_scanner_blocks_both_states() {
        let shared = ScanIndicator::new();
        let first = state().with_scanner(shared.clone());
        let second = state().with_scanner(shared);

        let _guard = first.scanner().acquire().unwrap();
        assert_eq!(second.phase(), Phase::Scanning);
        assert!(second.scanner().acquire().is_none());
    }

    #[test]
    fn test_bad_tab_table_fails_at_startup() {
        let mut config = AppConfig::default();
        config.tabs.push(crate::config::TabBinding::conventional("edges"));
        assert!(matches!(
            UiState::from_config(&config, Box::new(MemoryStore::new())),
            Err(NotescopeError::Config(_))
        ));
    }

    #[test]
    fn test_corrupt_preferences_do_not_block_startup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{ truncated").unwrap();

        let store = crate::theme::JsonFileStore::new(path);
        let state = UiState::from_config(&AppConfig::default(), Box::new(store)).unwrap();
        assert_eq!(state.theme().theme(), ThemeName::Dark);
        assert_eq!(state.phase(), Phase::Intake);
    }

    #[test]
    fn test_scanning_phase_follows_indicator() {
        let state = state();
        let guard = state.scanner().acquire().unwrap();
        assert_eq!(state.phase(), Phase::Scanning);
        assert_eq!(state.phase().mode(), UiMode::Intake);
        assert!(!state.drop_zone_idle());
        drop(guard);
        assert_eq!(state.phase(), Phase::Intake);
    }

    #[test]
    fn test_success_then_failure() {
        let mut state = state();
        state.apply(UiEvent::AnalysisSucceeded(sample_result())).unwrap();
        assert_eq!(state.phase(), Phase::Results);
        assert_eq!(state.results().unwrap().confidence, "97.5%");

        let notice = state
            .apply(UiEvent::AnalysisFailed(NotescopeError::Server(Some("corrupt upload".into()))))
            .unwrap()
            .unwrap();
        assert_eq!(notice.message, "corrupt upload");
        assert_eq!(state.mode(), UiMode::Intake);
        assert!(state.results().is_none());
    }

    #[test]
    fn test_invalid_file_notifies_without_state_change() {
        let mut state = state();
        let notice = state
            .apply(UiEvent::FileSelected(UploadFile::new("a.txt", "text/plain", vec![])))
            .unwrap()
            .unwrap();
        assert_eq!(notice.message, crate::error::INVALID_FILE_TYPE);
        assert!(state.intake().selected().is_none());
        assert_eq!(state.phase(), Phase::Intake);
        assert!(!state.scanner().is_active());
    }

    #[test]
    fn test_reset_clears_selection_and_results() {
        let mut state = state();
        state
            .apply(UiEvent::FileSelected(UploadFile::new("n.jpg", "image/jpeg", vec![1])))
            .unwrap();
        state.apply(UiEvent::AnalysisSucceeded(sample_result())).unwrap();
        state.apply(UiEvent::Reset).unwrap();
        assert!(state.intake().selected().is_none());
        assert!(state.results().is_none());
        assert_eq!(state.mode(), UiMode::Intake);
    }

    #[test]
    fn test_drag_events() {
        let mut state = state();
        state.apply(UiEvent::DragOver).unwrap();
        assert!(state.intake().is_armed());
        state.apply(UiEvent::DragLeave).unwrap();
        assert!(!state.intake().is_armed());
    }

    #[test]
    fn test_tab_and_theme_independent_of_mode() {
        let mut state = state();
        state.apply(UiEvent::TabSelected("ocr".into())).unwrap();
        state.apply(UiEvent::ThemeToggled).unwrap();
        assert!(state.tabs().is_active("ocr"));
        assert_eq!(state.theme().theme(), ThemeName::Light);
        assert_eq!(state.mode(), UiMode::Intake);

        assert!(matches!(
            state.apply(UiEvent::TabSelected("nope".into())),
            Err(NotescopeError::UnknownTab(_))
        ));
        assert!(state.tabs().is_active("ocr"));
    }
}
