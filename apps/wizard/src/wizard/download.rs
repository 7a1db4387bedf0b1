use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::WizardError;

/// Identity of the template without a logo.
pub const PLAIN_TARGET: &str = "nologo";

/// The template (company branding) the backend renders the file with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget(String);

impl DownloadTarget {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn identity(&self) -> &str {
        &self.0
    }

    /// `nologo` → `Plain`, otherwise the identity with its first letter uppercased.
    pub fn display_name(&self) -> String {
        if self.0 == PLAIN_TARGET {
            return "Plain".to_string();
        }
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn template_name(&self) -> String {
        format!("{} Template", self.display_name())
    }
}

impl Default for DownloadTarget {
    fn default() -> Self {
        Self::new(PLAIN_TARGET)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadFormat {
    Pdf,
    Docx,
}

impl DownloadFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadFormat::Pdf => "pdf",
            DownloadFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for DownloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DownloadFormat {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(DownloadFormat::Pdf),
            "docx" => Ok(DownloadFormat::Docx),
            other => Err(WizardError::Validation(format!(
                "Invalid file format '{other}' requested."
            ))),
        }
    }
}

/// `Updated_Resume_<DisplayName>.<ext>`
pub fn file_name(target: &DownloadTarget, format: DownloadFormat) -> String {
    format!("Updated_Resume_{}.{}", target.display_name(), format.as_str())
}

/// A downloaded file written to disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedFile {
    pub path: PathBuf,
    pub bytes: usize,
    pub saved_at: DateTime<Utc>,
}

pub async fn save(dir: &Path, name: &str, content: &[u8]) -> std::io::Result<SavedFile> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(name);
    tokio::fs::write(&path, content).await?;
    Ok(SavedFile {
        path,
        bytes: content.len(),
        saved_at: Utc::now(),
    })
}
