//! Benchmark report generation.
//!
//! Renders the fixed report prompt for a [`BenchmarkRequest`], sends it to a
//! [`ChatModel`] and validates the reply against the `{report: string}`
//! output schema. There is no retry: one request, one reply.

use crate::error::{EvaluatorError, Result};
use crate::llm::{BENCHMARK_REPORT_PROMPT, ChatModel, CompletionRequest, JsonSchemaFormat, Prompts};
use crate::request::{BenchmarkReport, BenchmarkRequest};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Anything that can turn a request into a report.
///
/// The request handler depends on this trait only, so it can run against a
/// stub in tests.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate_report(&self, request: &BenchmarkRequest) -> Result<BenchmarkReport>;
}

/// The prompt-backed report generator.
pub struct BenchmarkReportFlow<M> {
    model: M,
}

impl<M: ChatModel> BenchmarkReportFlow<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Build the completion request for `request`.
    pub fn completion_request(request: &BenchmarkRequest) -> CompletionRequest {
        CompletionRequest {
            system: Some(Prompts::system_evaluator().to_string()),
            user: Prompts::render_benchmark_report(&request.model_outputs, &request.glue_dataset),
            output_schema: Some(JsonSchemaFormat {
                name: BENCHMARK_REPORT_PROMPT.to_string(),
                schema: Prompts::benchmark_report_output_schema(),
                strict: true,
            }),
        }
    }

    /// Validate a raw model reply against the output schema.
    ///
    /// An empty `report` field is valid here; deciding what an empty report
    /// means is left to the caller.
    pub fn parse_report_response(response: &str) -> Result<BenchmarkReport> {
        if response.trim().is_empty() {
            return Err(EvaluatorError::SchemaMismatch {
                prompt: BENCHMARK_REPORT_PROMPT,
                reason: "model returned no output".to_string(),
            });
        }

        #[derive(Deserialize)]
        struct RawReport {
            report: String,
        }

        let json_str = extract_json(response);
        let raw: RawReport =
            serde_json::from_str(&json_str).map_err(|e| EvaluatorError::SchemaMismatch {
                prompt: BENCHMARK_REPORT_PROMPT,
                reason: e.to_string(),
            })?;

        Ok(BenchmarkReport { report: raw.report })
    }
}

#[async_trait]
impl<M: ChatModel> ReportGenerator for BenchmarkReportFlow<M> {
    async fn generate_report(&self, request: &BenchmarkRequest) -> Result<BenchmarkReport> {
        debug!(
            glue_dataset = %request.glue_dataset,
            model_outputs_len = request.model_outputs_len(),
            "generating benchmark report"
        );
        let response = self
            .model
            .generate(Self::completion_request(request))
            .await?;
        Self::parse_report_response(&response)
    }
}

/// Check raw input against the declared input schema of the report prompt.
pub fn validate_input(input: &Value) -> Result<()> {
    let schema = Prompts::benchmark_report_input_schema();
    let validator =
        jsonschema::validator_for(&schema).map_err(|e| EvaluatorError::SchemaMismatch {
            prompt: BENCHMARK_REPORT_PROMPT,
            reason: format!("input schema does not compile: {}", e),
        })?;

    if let Some(e) = validator.iter_errors(input).next() {
        return Err(EvaluatorError::SchemaMismatch {
            prompt: BENCHMARK_REPORT_PROMPT,
            reason: e.to_string(),
        });
    }
    Ok(())
}

/// Pull the JSON object out of a reply that may be fenced or wrapped in prose.
fn extract_json(response: &str) -> String {
    let response = response.trim();

    if response.starts_with("```json") {
        if let Some(end) = response.rfind("```") {
            let start = "```json".len();
            if end > start {
                return response[start..end].trim().to_string();
            }
        }
    }

    if response.starts_with("```") {
        if let Some(end) = response.rfind("```") {
            let start = response.find('\n').map(|n| n + 1).unwrap_or(3);
            if end > start {
                return response[start..end].trim().to_string();
            }
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end > start {
                return response[start..=end].to_string();
            }
        }
    }

    response.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    type Flow = BenchmarkReportFlow<ScriptedModel>;

    /// Replies with a fixed string and records the request it saw.
    struct ScriptedModel {
        reply: Result<String>,
        seen: Mutex<Option<CompletionRequest>>,
    }

    impl ScriptedModel {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(EvaluatorError::Http("connection refused".to_string())),
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn generate(&self, request: CompletionRequest) -> Result<String> {
            *self.seen.lock().unwrap() = Some(request);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(EvaluatorError::Http(e.to_string())),
            }
        }
    }

    fn request() -> BenchmarkRequest {
        BenchmarkRequest::new(
            r#"{"predictions": [1, 0, 1, 1], "labels": [1, 0, 0, 1]}"#,
            "MRPC",
        )
    }

    #[test]
    fn test_parse_plain_json() {
        let report = Flow::parse_report_response(r#"{"report": "Accuracy: 0.91"}"#).unwrap();
        assert_eq!(report.report, "Accuracy: 0.91");
    }

    #[test]
    fn test_parse_fenced_json() {
        let response = "```json\n{\"report\": \"# Report\\nF1: 0.88\"}\n```";
        let report = Flow::parse_report_response(response).unwrap();
        assert_eq!(report.report, "# Report\nF1: 0.88");
    }

    #[test]
    fn test_parse_json_in_prose() {
        let response = "Here you go: {\"report\": \"ok\"} hope it helps";
        assert_eq!(Flow::parse_report_response(response).unwrap().report, "ok");
    }

    #[test]
    fn test_empty_report_field_is_valid() {
        let report = Flow::parse_report_response(r#"{"report": ""}"#).unwrap();
        assert!(report.report.is_empty());
    }

    #[test]
    fn test_schema_mismatch() {
        for response in ["", "   ", "no json here", r#"{"summary": "x"}"#, r#"{"report": 3}"#] {
            let err = Flow::parse_report_response(response).unwrap_err();
            assert!(
                matches!(err, EvaluatorError::SchemaMismatch { prompt, .. } if prompt == BENCHMARK_REPORT_PROMPT),
                "expected schema mismatch for {response:?}"
            );
        }
    }

    #[test]
    fn test_completion_request_embeds_fields() {
        let completion = Flow::completion_request(&request());
        assert!(completion.user.contains(&request().model_outputs));
        assert!(completion.user.contains("MRPC"));
        assert!(completion.system.is_some());

        let schema = completion.output_schema.unwrap();
        assert_eq!(schema.name, BENCHMARK_REPORT_PROMPT);
        assert!(schema.strict);
    }

    #[test]
    fn test_validate_input() {
        let ok = serde_json::json!({"modelOutputs": "x".repeat(60), "glueDataset": "MRPC"});
        assert!(validate_input(&ok).is_ok());

        for bad in [
            serde_json::json!(null),
            serde_json::json!({"modelOutputs": "x"}),
            serde_json::json!({"modelOutputs": 5, "glueDataset": "MRPC"}),
            serde_json::json!({"modelOutputs": "x", "glueDataset": "MRPC", "extra": true}),
        ] {
            assert!(
                matches!(validate_input(&bad), Err(EvaluatorError::SchemaMismatch { .. })),
                "expected rejection for {bad}"
            );
        }
    }

    #[tokio::test]
    async fn test_generate_report_round_trip() {
        let flow = BenchmarkReportFlow::new(ScriptedModel::replying(
            r#"{"report": "Accuracy: 0.75, F1: 0.8"}"#,
        ));

        let report = flow.generate_report(&request()).await.unwrap();
        assert_eq!(report.report, "Accuracy: 0.75, F1: 0.8");

        let seen = flow.model.seen.lock().unwrap().take().unwrap();
        assert!(seen.user.contains("GLUE Benchmark Dataset:\nMRPC"));
    }

    #[tokio::test]
    async fn test_generate_report_propagates_model_failure() {
        let flow = BenchmarkReportFlow::new(ScriptedModel::failing());
        let err = flow.generate_report(&request()).await.unwrap_err();
        assert!(matches!(err, EvaluatorError::Http(_)));
    }
}
