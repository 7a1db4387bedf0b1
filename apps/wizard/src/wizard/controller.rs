//! Wizard state controller.
//!
//! Transitions:
//! - `Form → Loading → Results + Confirmation` on `analysis_complete`
//! - `Form → Loading → Download` on `generation_complete`
//! - `Confirmation → Loading → Download` via generate
//! - `Download → Loading → Download` via download (repeatable)
//! - any remote failure → `Error`, left only by resubmitting (which resets)
//!
//! Every transition takes `&mut self`, so at most one remote call is in flight.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::errors::WizardError;
use crate::gateway::{AnalyzeOutcome, DownloadRequest, RemoteGateway};
use crate::models::analysis::AnalysisDisplay;
use crate::models::form::AnalysisForm;
use crate::preview::{sync, KeyPath, SyncReport};
use crate::wizard::download::{self, DownloadFormat, DownloadTarget, SavedFile};
use crate::wizard::session::WizardSession;
use crate::wizard::step::WizardStep;

pub const ANALYZE_LOADER: &str = "Processing your request...";
pub const REFORMAT_LOADER: &str = "Structuring your resume into a professional data format...";
pub const OPTIMIZE_LOADER: &str = "AI is optimizing your resume for maximum ATS compatibility...";

pub const FORMATTED_HEADER: &str = "Your Professionally Formatted Resume is Ready!";
pub const OPTIMIZED_HEADER: &str = "Your AI-Optimized Resume is Ready!";

pub struct WizardController {
    gateway: Arc<dyn RemoteGateway>,
    session: WizardSession,
    output_dir: PathBuf,
}

impl WizardController {
    pub fn new(gateway: Arc<dyn RemoteGateway>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            gateway,
            session: WizardSession::default(),
            output_dir: output_dir.into(),
        }
    }

    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    /// Drops the document, the baseline score and all displayed results.
    pub fn reset(&mut self) {
        info!("Resetting wizard session");
        self.session.reset();
    }

    /// Step 1: upload the résumé and run the selected analysis mode.
    ///
    /// Form validation errors are returned without touching the session.
    pub async fn submit(&mut self, form: AnalysisForm) -> Result<(), WizardError> {
        self.surface(form.validate())?;

        self.reset();
        self.show_loader(ANALYZE_LOADER);
        info!(
            mode = form.mode.as_str(),
            file = %form.resume.file_name,
            "Submitting resume"
        );

        let result = self.gateway.analyze(&form).await;
        match self.surface(result)? {
            AnalyzeOutcome::AnalysisComplete(result) => {
                let score = result.score();
                self.session.baseline_score.get_or_insert(score);
                self.session.analysis = Some(AnalysisDisplay::new(result, None));
                self.session.show(WizardStep::Confirmation, true);
                self.session.stepper.advance_to(2);
                info!(score, "Analysis complete");
                Ok(())
            }
            AnalyzeOutcome::GenerationComplete(document) => {
                self.session.replace_document(document, FORMATTED_HEADER);
                self.session.show(WizardStep::Download, false);
                self.session.stepper.advance_to(3);
                info!("Resume generated directly from submission");
                Ok(())
            }
            AnalyzeOutcome::Unrecognized(status) => {
                Err(self.fail(WizardError::UnknownResponse { status }))
            }
        }
    }

    /// Step 2: rewrite (or only reformat) the analysed résumé.
    pub async fn generate(&mut self, reformat_only: bool) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Confirmation, "generate")?;
        self.show_loader(if reformat_only {
            REFORMAT_LOADER
        } else {
            OPTIMIZE_LOADER
        });

        let result = self.gateway.generate(reformat_only).await;
        let outcome = self.surface(result)?;

        let has_analysis = outcome.new_analysis_result.is_some();
        if let Some(result) = outcome.new_analysis_result {
            info!(
                score = result.score(),
                baseline = ?self.session.baseline_score,
                "Re-analysis complete"
            );
            self.session.analysis = Some(AnalysisDisplay::new(
                result,
                self.session.baseline_score,
            ));
        }

        let header = if reformat_only {
            FORMATTED_HEADER
        } else {
            OPTIMIZED_HEADER
        };
        self.session.replace_document(outcome.new_resume_json, header);
        self.session.show(WizardStep::Download, has_analysis);
        self.session.stepper.advance_to(3);
        Ok(())
    }

    /// Replaces the displayed text of one editable preview field.
    ///
    /// Returns `Ok(false)` when there is no document yet or the path is not editable.
    pub fn edit(&mut self, path: &str, text: impl Into<String>) -> Result<bool, WizardError> {
        let path = self.surface(KeyPath::decode(path))?;
        let WizardSession {
            document, preview, ..
        } = &mut self.session;
        Ok(match (document, preview) {
            (Some(_), Some(preview)) => preview.edit(&path, text),
            _ => false,
        })
    }

    /// Writes pending preview edits into the document. No-op without a document.
    pub fn save_edits(&mut self) -> Option<SyncReport> {
        let WizardSession {
            document, preview, ..
        } = &mut self.session;
        let report = sync(document.as_mut()?, preview.as_ref()?.view());
        Some(report)
    }

    /// Step 3: render the edited document with a template and save the file.
    pub async fn download(
        &mut self,
        target: &DownloadTarget,
        format: DownloadFormat,
    ) -> Result<SavedFile, WizardError> {
        self.expect_step(WizardStep::Download, "download")?;
        self.save_edits();

        let Some(document) = self.session.document.clone() else {
            return Err(self.fail(WizardError::MissingDocument));
        };

        self.show_loader(format!(
            "Generating professional {} with {}...",
            format.as_str().to_uppercase(),
            target.template_name()
        ));

        let request = DownloadRequest {
            company: target.identity(),
            resume_json: &document,
            format: format.as_str(),
        };
        let result = self.gateway.download(&request).await;
        let bytes = self.surface(result)?;

        let name = download::file_name(target, format);
        let result = download::save(&self.output_dir, &name, &bytes).await;
        let saved = self.surface(result)?;
        info!(path = %saved.path.display(), bytes = saved.bytes, "Saved download");

        let results_visible = self.session.analysis.is_some();
        self.session.show(WizardStep::Download, results_visible);
        Ok(saved)
    }

    fn expect_step(&mut self, step: WizardStep, operation: &'static str) -> Result<(), WizardError> {
        if self.session.active == step {
            Ok(())
        } else {
            let active = self.session.active;
            Err(self.fail(WizardError::InvalidTransition {
                operation,
                step: active,
            }))
        }
    }

    fn show_loader(&mut self, text: impl Into<String>) {
        self.session.show_loader(text);
        info!(loader = self.session.loader_text().unwrap_or_default(), "Waiting on backend");
    }

    /// Routes a failed step result into the error slot when the error is surfaced.
    fn surface<T, E: Into<WizardError>>(&mut self, result: Result<T, E>) -> Result<T, WizardError> {
        result.map_err(|e| self.fail(e.into()))
    }

    fn fail(&mut self, err: WizardError) -> WizardError {
        if err.is_surfaced() {
            error!("Wizard step failed: {err}");
            self.session.show_error(err.to_string());
        } else {
            warn!("Rejected: {err}");
        }
        err
    }
}
