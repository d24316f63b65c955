//! Analysis client — the single point of entry for calls to the analysis service.
//!
//! No other module talks to `POST {API_URL}/api/analyze` directly. The service
//! is opaque: it receives the two texts and returns a match report.
//!
//! There are no retries and no explicit timeout; the transport default applies.
//! One request per session at a time is enforced by the lifecycle, not here.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::report::{parse_report, MatchReport, ParseError};

pub mod input;

pub use input::{AnalysisInput, ValidationError};

const ANALYZE_PATH: &str = "/api/analyze";

/// Shown when the service fails without a usable `detail`.
pub const GENERIC_FAILURE: &str = "Failed to analyze CV";
/// Shown when the service cannot be reached at all.
pub const TRANSPORT_FAILURE: &str = "Failed to analyze CV. Please try again.";
/// Shown when a 2xx body does not hold a valid report.
pub const MALFORMED_REPORT: &str = "The analysis service returned an incomplete report";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("server error (status {status}): {}", .detail.as_deref().unwrap_or("<no detail>"))]
    Server { status: u16, detail: Option<String> },

    #[error("malformed report: {0}")]
    MalformedReport(String),
}

impl From<ParseError> for AnalysisError {
    fn from(e: ParseError) -> Self {
        AnalysisError::MalformedReport(e.to_string())
    }
}

impl AnalysisError {
    /// The single human-readable message a failed analysis shows.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Validation(e) => e.to_string(),
            AnalysisError::Transport(_) => TRANSPORT_FAILURE.to_string(),
            AnalysisError::Server { detail, .. } => detail
                .clone()
                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            AnalysisError::MalformedReport(_) => MALFORMED_REPORT.to_string(),
        }
    }
}

/// Anything that can turn a CV and a job description into a report.
///
/// Carried in `AppState` as `Arc<dyn Analyzer>`; `AnalysisClient` is the
/// production implementation.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(
        &self,
        cv_text: &str,
        job_description: &str,
    ) -> Result<MatchReport, AnalysisError>;
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    cv_text: &'a str,
    job_description: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    endpoint: String,
}

impl AnalysisClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", config.api_url, ANALYZE_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Validates the inputs locally, then sends one analysis request.
    ///
    /// Empty input never reaches the network.
    pub async fn submit_analysis(
        &self,
        cv_text: &str,
        job_description: &str,
    ) -> Result<MatchReport, AnalysisError> {
        let input = AnalysisInput::new(cv_text, job_description)?;

        info!(
            "Sending analysis request: cv_text_len={}, job_description_len={}",
            input.cv_text().len(),
            input.job_description().len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("accept", "application/json")
            .json(&AnalyzeRequest {
                cv_text: input.cv_text(),
                job_description: input.job_description(),
            })
            .send()
            .await
            .map_err(|e| {
                warn!("Analysis service unreachable: {e}");
                AnalysisError::Transport(e.to_string())
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            // The body may echo the submitted CV; only the extracted detail is logged.
            warn!(
                "Analysis service returned {status} (detail: {})",
                detail.as_deref().unwrap_or("<none>")
            );
            return Err(AnalysisError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        let raw: Value = serde_json::from_str(&body).map_err(|e| {
            warn!("Analysis response is not JSON: {e}");
            AnalysisError::MalformedReport(format!("body is not JSON: {e}"))
        })?;

        let report = parse_report(&raw).map_err(|e| {
            warn!("Rejected analysis report: {e}");
            AnalysisError::from(e)
        })?;

        info!(
            "Analysis completed: matching={}, missing={}, additional={}",
            report.skills_analysis.matching.len(),
            report.skills_analysis.missing.len(),
            report.skills_analysis.additional.len()
        );

        Ok(report)
    }
}

#[async_trait]
impl Analyzer for AnalysisClient {
    async fn analyze(
        &self,
        cv_text: &str,
        job_description: &str,
    ) -> Result<MatchReport, AnalysisError> {
        self.submit_analysis(cv_text, job_description).await
    }
}

/// Pulls a non-empty string `detail` out of an error body.
///
/// Structured details (e.g. validation arrays) and unparsable bodies yield
/// `None` so the caller falls back to the generic message.
fn extract_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .and_then(|d| d.as_str().map(str::to_string))
        .filter(|d| !d.trim().is_empty())
}
