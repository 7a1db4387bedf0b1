//! Remote request gateway: the only module that talks to the résumé backend.
//!
//! The controller depends on the `RemoteGateway` trait; `HttpGateway` is the
//! production implementation. Every failure leaves this module as either a
//! transport error or `OperationFailed` with a display-ready message.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::analysis::AnalysisResult;
use crate::models::form::AnalysisForm;
use crate::models::resume::ResumeDocument;

pub mod http;

pub use http::HttpGateway;

pub const ANALYSIS_COMPLETE: &str = "analysis_complete";
pub const GENERATION_COMPLETE: &str = "generation_complete";

pub const ANALYZE_FALLBACK: &str = "Request failed.";
pub const GENERATE_FALLBACK: &str = "Generation failed.";
pub const DOWNLOAD_FALLBACK: &str = "File generation failed.";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    OperationFailed(String),
}

/// Normalized result of the analyze operation.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeOutcome {
    AnalysisComplete(AnalysisResult),
    GenerationComplete(Option<ResumeDocument>),
    /// Success status with a tag this client does not know.
    Unrecognized(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerateOutcome {
    #[serde(default)]
    pub new_resume_json: Option<ResumeDocument>,
    #[serde(default)]
    pub new_analysis_result: Option<AnalysisResult>,
}

/// Body of the download request.
#[derive(Debug, Serialize)]
pub struct DownloadRequest<'a> {
    /// Target identity (template) the backend renders with.
    pub company: &'a str,
    pub resume_json: &'a ResumeDocument,
    pub format: &'a str,
}

#[derive(Debug, Deserialize)]
struct RawAnalyzeResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: Value,
}

#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn analyze(&self, form: &AnalysisForm) -> Result<AnalyzeOutcome, GatewayError>;

    async fn generate(&self, reformat_only: bool) -> Result<GenerateOutcome, GatewayError>;

    /// Returns the raw file content.
    async fn download(&self, request: &DownloadRequest<'_>) -> Result<Bytes, GatewayError>;
}

/// Turns a successful analyze body into an outcome by its `status` tag.
fn classify_analyze(raw: RawAnalyzeResponse) -> Result<AnalyzeOutcome, GatewayError> {
    match raw.status.as_deref() {
        Some(ANALYSIS_COMPLETE) => serde_json::from_value(raw.data)
            .map(AnalyzeOutcome::AnalysisComplete)
            .map_err(|e| malformed(&e)),
        Some(GENERATION_COMPLETE) => {
            let document = match raw.data.get("new_resume_json") {
                None | Some(Value::Null) => None,
                Some(document) => Some(ResumeDocument::new(document.clone())),
            };
            Ok(AnalyzeOutcome::GenerationComplete(document))
        }
        other => Ok(AnalyzeOutcome::Unrecognized(
            other.unwrap_or_default().to_string(),
        )),
    }
}

/// Message for a non-success response: the body's `error` field, else the fallback.
fn error_message(body: &[u8], fallback: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn malformed(err: &serde_json::Error) -> GatewayError {
    tracing::warn!("Backend returned a malformed body: {err}");
    GatewayError::OperationFailed("Received a malformed response from the server.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawAnalyzeResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_classify_analysis_complete() {
        let outcome = classify_analyze(raw(json!({
            "status": "analysis_complete",
            "data": {"match_score": 72, "summary": "Solid"}
        })))
        .unwrap();
        match outcome {
            AnalyzeOutcome::AnalysisComplete(result) => assert_eq!(result.score(), 72.0),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_classify_generation_complete() {
        let outcome = classify_analyze(raw(json!({
            "status": "generation_complete",
            "data": {"new_resume_json": {"candidate_name": "A"}}
        })))
        .unwrap();
        assert_eq!(
            outcome,
            AnalyzeOutcome::GenerationComplete(Some(ResumeDocument::new(
                json!({"candidate_name": "A"})
            )))
        );
    }

    #[test]
    fn test_classify_generation_without_document() {
        let outcome = classify_analyze(raw(json!({"status": "generation_complete", "data": {}})));
        assert_eq!(outcome.unwrap(), AnalyzeOutcome::GenerationComplete(None));
    }

    #[test]
    fn test_classify_unknown_tag() {
        let outcome = classify_analyze(raw(json!({"status": "odd"}))).unwrap();
        assert_eq!(outcome, AnalyzeOutcome::Unrecognized("odd".into()));

        let outcome = classify_analyze(raw(json!({}))).unwrap();
        assert_eq!(outcome, AnalyzeOutcome::Unrecognized(String::new()));
    }

    #[test]
    fn test_classify_malformed_analysis() {
        let outcome = classify_analyze(raw(json!({
            "status": "analysis_complete",
            "data": {"match_score": "high"}
        })));
        assert!(matches!(outcome, Err(GatewayError::OperationFailed(_))));
    }

    #[test]
    fn test_error_message_prefers_body() {
        let body = br#"{"error": "Session expired or data not found. Please start over."}"#;
        assert_eq!(
            error_message(body, GENERATE_FALLBACK),
            "Session expired or data not found. Please start over."
        );
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(b"<html>502</html>", ANALYZE_FALLBACK), "Request failed.");
        assert_eq!(error_message(br#"{"detail": "x"}"#, DOWNLOAD_FALLBACK), "File generation failed.");
        assert_eq!(error_message(br#"{"error": ""}"#, ANALYZE_FALLBACK), "Request failed.");
    }
}
