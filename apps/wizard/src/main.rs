mod config;
mod errors;
mod gateway;
mod models;
mod preview;
mod wizard;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::gateway::HttpGateway;
use crate::models::form::{AnalysisForm, ResumeUpload};
use crate::preview::KeyPath;
use crate::wizard::{WizardController, WizardStep};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume wizard v{}", env!("CARGO_PKG_VERSION"));

    let gateway = HttpGateway::new(
        &config.backend_url,
        Duration::from_secs(config.timeout_secs),
    )?;
    info!("Backend gateway initialized ({})", config.backend_url);

    let mut wizard = WizardController::new(Arc::new(gateway), config.output_dir.clone());

    if let Err(err) = run(&mut wizard, &config).await {
        if let Some(text) = wizard.session().error_text() {
            error!("{text}");
        }
        return Err(err);
    }
    Ok(())
}

async fn run(wizard: &mut WizardController, config: &Config) -> Result<()> {
    let form = AnalysisForm {
        resume: ResumeUpload::from_path(&config.resume_path).await?,
        mode: config.mode.clone(),
    };
    wizard.submit(form).await?;
    log_progress(wizard);

    if let Some(analysis) = wizard.session().analysis() {
        info!(
            score = analysis.comparison.current,
            band = analysis.comparison.band().description(),
            missing_keywords = ?analysis.result.missing_keywords,
            "Initial analysis"
        );
    }

    if wizard.session().active() == WizardStep::Confirmation {
        wizard.generate(config.reformat_only).await?;
        log_progress(wizard);
        if let Some(analysis) = wizard.session().analysis() {
            info!(
                score = analysis.comparison.current,
                baseline = ?analysis.comparison.baseline,
                delta = ?analysis.comparison.delta(),
                "Score after rewrite"
            );
        }
    }

    if let Some(path) = &config.edits_path {
        apply_edits(wizard, path).await?;
    }

    match wizard.session().preview() {
        Some(preview) if !preview.tree().is_error_notice() => {
            let path = config.output_dir.join("preview.html");
            tokio::fs::create_dir_all(&config.output_dir).await?;
            tokio::fs::write(&path, preview.to_html()).await?;
            info!("Wrote preview to {}", path.display());
        }
        _ => warn!("Backend did not return a usable resume document"),
    }

    for format in &config.formats {
        let saved = wizard.download(&config.target, *format).await?;
        info!("Saved {} ({} bytes)", saved.path.display(), saved.bytes);
    }

    Ok(())
}

fn log_progress(wizard: &WizardController) {
    let session = wizard.session();
    info!(
        step = session.stepper().current(),
        states = ?session.stepper().states(),
        visible = ?session.visible_steps(),
        "Wizard progress"
    );
}

/// Applies a JSON object of `key-path -> text` edits to the preview, then
/// writes them into the document.
async fn apply_edits(wizard: &mut WizardController, path: &Path) -> Result<()> {
    let edits = read_edits(path).await?;

    for (key, text) in &edits {
        if !wizard.edit(key, text.as_str())? {
            warn!("No editable field at {key}; edit ignored");
        }
    }

    if let Some(preview) = wizard.session().preview() {
        let view = preview.view();
        info!(
            fields = view.len(),
            dirty = view.is_dirty(),
            separator_visible = view.separator_visible(),
            "Applied preview edits"
        );
    }

    if let Some(report) = wizard.save_edits() {
        info!(
            applied = report.applied,
            unchanged = report.unchanged,
            skipped = ?report.skipped,
            "Synchronized edits into the resume"
        );
    }

    if let Some(document) = wizard.session().document() {
        for key in edits.keys() {
            let stored = key.parse::<KeyPath>()?.get(document.as_value()).cloned();
            debug!("{key} = {stored:?}");
        }
    }
    Ok(())
}

async fn read_edits(path: &Path) -> Result<BTreeMap<String, String>> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read edits from {}", path.display()))?;
    serde_json::from_slice(&raw)
        .with_context(|| format!("{} must be a JSON object of key-path to text", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_edits_maps_paths_to_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edits.json");
        std::fs::write(
            &path,
            r#"{"candidate_name": "B", "contact_info.phone": ""}"#,
        )
        .unwrap();

        let edits = read_edits(&path).await.unwrap();
        assert_eq!(edits["candidate_name"], "B");
        assert_eq!(edits["contact_info.phone"], "");
    }

    #[tokio::test]
    async fn test_read_edits_rejects_non_text_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edits.json");
        std::fs::write(&path, r#"{"sections[0].content": 3}"#).unwrap();

        assert!(read_edits(&path).await.is_err());
        assert!(read_edits(&dir.path().join("missing.json")).await.is_err());
    }
}
