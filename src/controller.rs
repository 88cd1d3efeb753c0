// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Drives the state machine: intake, one analysis round-trip, results

use std::sync::Mutex;
use tracing::{error, info, warn};

use crate::analysis::Analyzer;
use crate::intake::{FileChooser, UploadFile};
use crate::state::{Notice, UiEvent, UiMode, UiState};
use crate::{NotescopeError, Result};

/// Where blocking notifications go
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Prints notifications to stderr, stamped with the time they were raised
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: &Notice) {
        eprintln!("{}", notice);
    }
}

/// Keeps every notification, newest last
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        let notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        notices.iter().map(|n| n.message.clone()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        let mut notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        notices.push(notice.clone());
    }
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn notify(&self, notice: &Notice) {
        (**self).notify(notice)
    }
}

/// Outcome of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The candidate was not an image; nothing was sent
    Rejected,
    /// The request resolved with an error and the UI is back on intake
    Failed,
    /// Results are showing
    Completed,
}

/// Glue between the UI state, the analyzer and the user's notifications
pub struct Controller<A: Analyzer, N: Notifier> {
    state: UiState,
    analyzer: A,
    notifier: N,
}

impl<A: Analyzer, N: Notifier> Controller<A, N> {
    pub fn new(state: UiState, analyzer: A, notifier: N) -> Self {
        Self { state, analyzer, notifier }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Apply an event and forward whatever it raises to the notifier
    pub fn dispatch(&mut self, event: UiEvent) -> Result<()> {
        if let Some(notice) = self.state.apply(event)? {
            self.notifier.notify(&notice);
        }
        Ok(())
    }

    /// Items dropped on the zone: the first one is submitted
    pub async fn drop_files(&mut self, items: Vec<UploadFile>) -> Result<Option<Submission>> {
        match self.state.drop_items(items) {
            Some(file) => self.submit(file).await.map(Some),
            None => Ok(None),
        }
    }

    /// The zone was clicked; a dismissed chooser submits nothing
    pub async fn choose_file(&mut self, chooser: &mut dyn FileChooser) -> Result<Option<Submission>> {
        match self.state.click(chooser) {
            Some(file) => self.submit(file).await.map(Some),
            None => Ok(None),
        }
    }

    /// Validate a candidate, analyze it, and show the outcome
    pub async fn submit(&mut self, candidate: UploadFile) -> Result<Submission> {
        if self.state.scanner().is_active() {
            let notice = Notice::new(NotescopeError::AnalysisInFlight.user_message());
            self.notifier.notify(&notice);
            return Err(NotescopeError::AnalysisInFlight);
        }

        if let Some(notice) = self.state.apply(UiEvent::FileSelected(candidate))? {
            self.notifier.notify(&notice);
            return Ok(Submission::Rejected);
        }

        let outcome = {
            let Some(_scanning) = self.state.scanner().acquire() else {
                return Err(NotescopeError::AnalysisInFlight);
            };
            let Some(file) = self.state.intake().selected() else {
                error!("Accepted file vanished from the intake slot");
                return Err(NotescopeError::Config("no file selected".to_string()));
            };

            info!("Submitting {} for analysis", file.name);
            self.analyzer.analyze(file).await
        };

        match outcome {
            Ok(result) => {
                self.dispatch(UiEvent::AnalysisSucceeded(result))?;
                Ok(Submission::Completed)
            }
            Err(e) => {
                if e.is_network() {
                    warn!("Analysis service unreachable, check the configured endpoint");
                }
                self.dispatch(UiEvent::AnalysisFailed(e))?;
                Ok(Submission::Failed)
            }
        }
    }

    /// Return to intake for a new upload
    pub fn reset(&mut self) -> Result<()> {
        self.dispatch(UiEvent::Reset)
    }

    pub fn select_tab(&mut self, tab_id: &str) -> Result<()> {
        self.dispatch(UiEvent::TabSelected(tab_id.to_string()))
    }

    pub fn toggle_theme(&mut self) -> Result<()> {
        self.dispatch(UiEvent::ThemeToggled)
    }

    pub fn mode(&self) -> UiMode {
        self.state.mode()
    }
}
