use anyhow::{Context, Result};
use eframe::egui::{self, RichText};

use crate::services::ocr::{OcrOutcome, OcrServiceJob, ScanText};

pub mod instructions;
pub mod popups;
pub mod upload;
pub mod welcome;

/// Which of the three screens is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Welcome,
    Instructions,
    Upload,
}

impl Screen {
    /// The screen reached by this screen's forward action.
    pub fn next(self) -> Self {
        match self {
            Self::Welcome => Self::Instructions,
            Self::Instructions => Self::Upload,
            Self::Upload => Self::Upload,
        }
    }

    /// The screen reached by this screen's back action. Upload never goes
    /// straight back to Welcome.
    pub fn back(self) -> Self {
        match self {
            Self::Welcome => Self::Welcome,
            Self::Instructions => Self::Welcome,
            Self::Upload => Self::Instructions,
        }
    }
}

/// All state driving what a frame renders. Owned by the `EframeApp` and
/// mutated only from the UI thread.
#[derive(Default)]
pub struct UiState {
    pub screen: Screen,
    pub result: Option<OcrOutcome>,
    pub pending: Option<OcrServiceJob>,
}

impl UiState {
    /// Whether an invocation is in flight. Advisory only: nothing stops the
    /// user from starting another scan while one is loading.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Store a freshly started invocation, discarding the previous result.
    pub fn begin_scan(&mut self, job: OcrServiceJob) {
        self.result = None;
        self.pending = Some(job);
    }

    /// Check the pending invocation for completion without blocking.
    ///
    /// Returns the outcome on the one frame the invocation completes, so the
    /// caller can raise notifications; the outcome is also stored in
    /// `self.result`.
    pub fn poll_scan(&mut self) -> Result<Option<&OcrOutcome>> {
        let Some(job) = &mut self.pending else {
            return Ok(None);
        };

        match job.try_wait() {
            Ok(None) => Ok(None),
            Ok(Some(outcome)) => {
                self.pending = None;
                let outcome = outcome.context("OCR ServiceJob returned an error")?;
                Ok(Some(self.result.insert(outcome)))
            }
            Err(e) => {
                self.pending = None;
                Err(e)
            }
        }
    }

    /// The success payload of the last invocation, if it succeeded.
    pub fn scan_text(&self) -> Option<&ScanText> {
        match &self.result {
            Some(OcrOutcome::Text(scan)) => Some(scan),
            _ => None,
        }
    }

    pub fn copyable_text(&self) -> Option<&str> {
        self.result.as_ref().and_then(OcrOutcome::text)
    }
}

/// Hero-style screen scaffold: centred title, subtitle and an action row.
pub(crate) fn hero_screen(
    ctx: &egui::Context,
    title: &str,
    subtitle: &str,
    actions: impl FnOnce(&mut egui::Ui),
) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(96.0);
            ui.label(RichText::new(title).size(32.0).strong());
            ui.add_space(12.0);
            ui.label(RichText::new(subtitle).size(16.0));
            ui.add_space(32.0);
            actions(ui);
        });
    });
}
