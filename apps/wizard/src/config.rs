use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::form::AnalysisMode;
use crate::wizard::{DownloadFormat, DownloadTarget};

/// Client configuration loaded from environment variables.
/// Fails at startup if required variables are missing or invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub output_dir: PathBuf,
    pub timeout_secs: u64,
    pub rust_log: String,
    pub resume_path: PathBuf,
    pub mode: AnalysisMode,
    pub reformat_only: bool,
    pub target: DownloadTarget,
    pub formats: Vec<DownloadFormat>,
    /// JSON object mapping key-paths to replacement text, applied before downloading.
    pub edits_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let mode = AnalysisMode::from_parts(
            &env_or("WIZARD_MODE", "full_analysis"),
            std::env::var("WIZARD_JOB_DESCRIPTION").ok(),
            std::env::var("WIZARD_JOB_TITLE").ok(),
        )?;

        Ok(Config {
            backend_url: require_env("WIZARD_BACKEND_URL")?,
            output_dir: PathBuf::from(env_or("WIZARD_OUTPUT_DIR", ".")),
            timeout_secs: env_or("WIZARD_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("WIZARD_TIMEOUT_SECS must be a whole number of seconds")?,
            rust_log: env_or("RUST_LOG", "info"),
            resume_path: PathBuf::from(require_env("WIZARD_RESUME_PATH")?),
            mode,
            reformat_only: parse_bool(&env_or("WIZARD_REFORMAT_ONLY", "false"))
                .context("WIZARD_REFORMAT_ONLY must be true or false")?,
            target: DownloadTarget::new(env_or("WIZARD_TARGET", "nologo")),
            formats: parse_formats(&env_or("WIZARD_FORMATS", "pdf"))?,
            edits_path: std::env::var("WIZARD_EDITS").ok().map(PathBuf::from),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => anyhow::bail!("'{other}' is not a boolean"),
    }
}

/// Comma-separated list such as `pdf,docx`.
fn parse_formats(value: &str) -> Result<Vec<DownloadFormat>> {
    let formats = value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.parse::<DownloadFormat>())
        .collect::<Result<Vec<_>, _>>()
        .context("WIZARD_FORMATS must list pdf and/or docx")?;
    if formats.is_empty() {
        anyhow::bail!("WIZARD_FORMATS must name at least one format");
    }
    Ok(formats)
}
