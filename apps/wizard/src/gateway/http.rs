use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{
    classify_analyze, error_message, malformed, AnalyzeOutcome, DownloadRequest, GatewayError,
    GenerateOutcome, RawAnalyzeResponse, RemoteGateway, ANALYZE_FALLBACK, DOWNLOAD_FALLBACK,
    GENERATE_FALLBACK,
};
use crate::models::form::{AnalysisForm, AnalysisMode};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP implementation of the gateway.
///
/// Keeps a cookie store: the backend ties the generate step to the analysis
/// stored in its session, so the session cookie from analyze must be replayed.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn post(&self, route: &str) -> RequestBuilder {
        let request_id = Uuid::new_v4();
        debug!(%request_id, route, "Sending backend request");
        self.client
            .post(format!("{}{route}", self.base_url))
            .header(REQUEST_ID_HEADER, request_id.to_string())
    }
}

/// Reads a JSON body, mapping a non-success status to `OperationFailed`.
async fn read_json<T: DeserializeOwned>(
    response: Response,
    fallback: &str,
) -> Result<T, GatewayError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let message = error_message(&body, fallback);
        warn!("Backend returned {status}: {message}");
        return Err(GatewayError::OperationFailed(message));
    }

    serde_json::from_slice(&body).map_err(|e| malformed(&e))
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn analyze(&self, form: &AnalysisForm) -> Result<AnalyzeOutcome, GatewayError> {
        let resume = Part::bytes(form.resume.bytes.to_vec()).file_name(form.resume.file_name.clone());
        let mut multipart = Form::new()
            .part("resume", resume)
            .text("analysis_mode", form.mode.as_str());
        match &form.mode {
            AnalysisMode::FullAnalysis { job_description } => {
                multipart = multipart.text("job_description", job_description.clone());
            }
            AnalysisMode::JobTitle { job_title } => {
                multipart = multipart.text("job_title", job_title.clone());
            }
            AnalysisMode::FormatOnly => {}
        }

        let response = self.post("/analyze").multipart(multipart).send().await?;
        let raw: RawAnalyzeResponse = read_json(response, ANALYZE_FALLBACK).await?;
        info!(status = ?raw.status, "Analyze request completed");

        classify_analyze(raw)
    }

    async fn generate(&self, reformat_only: bool) -> Result<GenerateOutcome, GatewayError> {
        let response = self
            .post("/generate")
            .json(&json!({ "reformat_only": reformat_only }))
            .send()
            .await?;
        let outcome: GenerateOutcome = read_json(response, GENERATE_FALLBACK).await?;
        info!(
            has_document = outcome.new_resume_json.is_some(),
            has_analysis = outcome.new_analysis_result.is_some(),
            "Generate request completed"
        );
        Ok(outcome)
    }

    async fn download(&self, request: &DownloadRequest<'_>) -> Result<Bytes, GatewayError> {
        let response = self.post("/download").json(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = error_message(&body, DOWNLOAD_FALLBACK);
            warn!("Download failed with {status}: {message}");
            return Err(GatewayError::OperationFailed(message));
        }

        info!(
            bytes = body.len(),
            format = request.format,
            "Download request completed"
        );
        Ok(body)
    }
}
