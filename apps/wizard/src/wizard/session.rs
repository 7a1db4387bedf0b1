use crate::models::analysis::AnalysisDisplay;
use crate::models::resume::ResumeDocument;
use crate::preview::Preview;
use crate::wizard::step::{Stepper, WizardStep};

/// All mutable state of one wizard run. Owned by the controller; everything
/// here is discarded by [`WizardSession::reset`].
#[derive(Debug, Clone, PartialEq)]
pub struct WizardSession {
    pub(super) active: WizardStep,
    pub(super) results_visible: bool,
    pub(super) loader_text: Option<String>,
    pub(super) error: Option<String>,
    pub(super) stepper: Stepper,
    pub(super) document: Option<ResumeDocument>,
    /// Score from the first analysis. Never overwritten until reset.
    pub(super) baseline_score: Option<f64>,
    pub(super) analysis: Option<AnalysisDisplay>,
    pub(super) preview: Option<Preview>,
    pub(super) download_header: Option<String>,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self {
            active: WizardStep::Form,
            results_visible: false,
            loader_text: None,
            error: None,
            stepper: Stepper::default(),
            document: None,
            baseline_score: None,
            analysis: None,
            preview: None,
            download_header: None,
        }
    }
}

impl WizardSession {
    pub fn active(&self) -> WizardStep {
        self.active
    }

    /// Steps currently on screen, underlay first.
    pub fn visible_steps(&self) -> Vec<WizardStep> {
        let mut steps = Vec::with_capacity(2);
        if self.results_visible
            && matches!(self.active, WizardStep::Confirmation | WizardStep::Download)
        {
            steps.push(WizardStep::Results);
        }
        steps.push(self.active);
        steps
    }

    pub fn loader_text(&self) -> Option<&str> {
        self.loader_text.as_deref()
    }

    /// Contents of the error slot.
    pub fn error_text(&self) -> Option<String> {
        self.error.as_ref().map(|message| format!("Error: {message}"))
    }

    pub fn stepper(&self) -> &Stepper {
        &self.stepper
    }

    pub fn document(&self) -> Option<&ResumeDocument> {
        self.document.as_ref()
    }

    pub fn baseline_score(&self) -> Option<f64> {
        self.baseline_score
    }

    pub fn analysis(&self) -> Option<&AnalysisDisplay> {
        self.analysis.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn download_header(&self) -> Option<&str> {
        self.download_header.as_deref()
    }

    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(super) fn show(&mut self, step: WizardStep, results_visible: bool) {
        self.active = step;
        self.results_visible = results_visible;
        self.loader_text = None;
    }

    pub(super) fn show_loader(&mut self, text: impl Into<String>) {
        self.show(WizardStep::Loading, false);
        self.loader_text = Some(text.into());
    }

    pub(super) fn show_error(&mut self, message: String) {
        self.show(WizardStep::Error, false);
        self.error = Some(message);
    }

    /// Replaces the document wholesale and re-renders the preview from it.
    pub(super) fn replace_document(&mut self, document: Option<ResumeDocument>, header: &str) {
        self.preview = Some(Preview::render(document.as_ref()));
        self.document = document;
        self.download_header = Some(header.to_string());
    }
}
