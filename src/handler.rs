//! The server-side boundary between the page and report generation.
//!
//! Every outcome converges here into one of three fixed user-facing
//! messages or a successful report; nothing crosses this boundary as an
//! error value.

use crate::config::Limits;
use crate::report::{ReportGenerator, validate_input};
use crate::request::BenchmarkRequest;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

pub const INVALID_INPUT: &str = "Invalid input.";
pub const EMPTY_REPORT: &str = "The AI failed to generate a report. Please try again.";
pub const UNEXPECTED_ERROR: &str =
    "An unexpected error occurred while generating the report. Please check the server logs.";

/// Outcome of a report request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateReportResult {
    Success { report: String },
    Failure { error: String },
}

impl GenerateReportResult {
    pub fn success(report: impl Into<String>) -> Self {
        Self::Success {
            report: report.into(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn report(&self) -> Option<&str> {
        match self {
            Self::Success { report } => Some(report),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }
}

/// Wire form of [`GenerateReportResult`]:
/// `{"success": true, "report": ...}` or `{"success": false, "error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<GenerateReportResult> for ReportResponse {
    fn from(result: GenerateReportResult) -> Self {
        match result {
            GenerateReportResult::Success { report } => Self {
                success: true,
                report: Some(report),
                error: None,
            },
            GenerateReportResult::Failure { error } => Self {
                success: false,
                report: None,
                error: Some(error),
            },
        }
    }
}

/// Validates raw input and runs the report generator.
#[derive(Clone)]
pub struct ReportHandler {
    generator: Arc<dyn ReportGenerator>,
    limits: Limits,
}

impl ReportHandler {
    pub fn new(generator: Arc<dyn ReportGenerator>, limits: Limits) -> Self {
        Self { generator, limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Handle untyped input from the web boundary.
    pub async fn generate_report_action(&self, input: serde_json::Value) -> GenerateReportResult {
        if let Err(e) = validate_input(&input) {
            debug!(error = %e, "report input rejected");
            return GenerateReportResult::failure(INVALID_INPUT);
        }

        match serde_json::from_value::<BenchmarkRequest>(input) {
            Ok(request) => self.generate(request).await,
            Err(_) => GenerateReportResult::failure(INVALID_INPUT),
        }
    }

    /// Handle an already-typed request. Validation still runs.
    pub async fn generate(&self, request: BenchmarkRequest) -> GenerateReportResult {
        if !request.is_acceptable(&self.limits) {
            return GenerateReportResult::failure(INVALID_INPUT);
        }

        match self.generator.generate_report(&request).await {
            Ok(report) if report.report.is_empty() => GenerateReportResult::failure(EMPTY_REPORT),
            Ok(report) => {
                info!(
                    glue_dataset = %request.glue_dataset,
                    report_len = report.report.len(),
                    "benchmark report generated"
                );
                GenerateReportResult::success(report.report)
            }
            Err(e) => {
                error!(error = %e, "Error generating benchmark report");
                GenerateReportResult::failure(UNEXPECTED_ERROR)
            }
        }
    }
}
