use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;

use crate::errors::WizardError;

const ALLOWED_EXTENSIONS: [&str; 2] = [".pdf", ".docx"];

/// The résumé file picked for upload.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl ResumeUpload {
    pub async fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("'{}' has no file name", path.display()))?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read resume file '{}'", path.display()))?;
        Ok(Self {
            file_name,
            bytes: Bytes::from(bytes),
        })
    }
}

/// Analysis mode selected on the form, with the text that mode requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisMode {
    FullAnalysis { job_description: String },
    JobTitle { job_title: String },
    FormatOnly,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::FullAnalysis { .. } => "full_analysis",
            AnalysisMode::JobTitle { .. } => "job_title",
            AnalysisMode::FormatOnly => "format_only",
        }
    }

    /// Builds a mode from its wire name plus whichever text fields were filled in.
    pub fn from_parts(
        mode: &str,
        job_description: Option<String>,
        job_title: Option<String>,
    ) -> Result<Self, WizardError> {
        match mode {
            "full_analysis" => Ok(AnalysisMode::FullAnalysis {
                job_description: job_description.unwrap_or_default(),
            }),
            "job_title" => Ok(AnalysisMode::JobTitle {
                job_title: job_title.unwrap_or_default(),
            }),
            "format_only" => Ok(AnalysisMode::FormatOnly),
            other => Err(WizardError::Validation(format!(
                "Invalid analysis mode '{other}'."
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisForm {
    pub resume: ResumeUpload,
    pub mode: AnalysisMode,
}

impl AnalysisForm {
    /// Checks the fields the form marks as required before anything is sent.
    pub fn validate(&self) -> Result<(), WizardError> {
        let name = self.resume.file_name.to_lowercase();
        if !ALLOWED_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            return Err(WizardError::Validation(
                "Invalid file type. Please upload a PDF or DOCX file.".to_string(),
            ));
        }
        match &self.mode {
            AnalysisMode::FullAnalysis { job_description } if job_description.trim().is_empty() => {
                Err(WizardError::Validation(
                    "Job Description is required for Full Analysis mode.".to_string(),
                ))
            }
            AnalysisMode::JobTitle { job_title } if job_title.trim().is_empty() => Err(
                WizardError::Validation("Job Title is required for this mode.".to_string()),
            ),
            _ => Ok(()),
        }
    }
}
