//! LLM prompts for benchmark report generation.

use serde_json::{Value, json};

/// Identifier the report prompt is registered under.
pub const BENCHMARK_REPORT_PROMPT: &str = "generateBenchmarkReportPrompt";

/// Collection of prompts used for report generation.
pub struct Prompts;

impl Prompts {
    /// Instruction comparing model outputs against a GLUE dataset.
    ///
    /// Placeholders: `{model_outputs}`, `{glue_dataset}`.
    pub fn benchmark_report() -> &'static str {
        r#"You are an AI model evaluation expert. Compare the provided AI model outputs against the specified GLUE benchmark dataset and generate a comprehensive benchmark report.

AI Model Outputs:
{model_outputs}

GLUE Benchmark Dataset:
{glue_dataset}

Include key metrics such as accuracy, precision, recall, and F1-score. Identify areas where the model excels and areas for improvement.
"#
    }

    /// Output contract appended to every report prompt.
    pub fn report_output_format() -> &'static str {
        r#"Return the following JSON format:
{
    "report": <the full benchmark report as a single markdown string>
}
Directly return the final JSON structure. Do not output anything else."#
    }

    /// System prompt for report generation.
    pub fn system_evaluator() -> &'static str {
        "You are an expert in evaluating natural language understanding models. Always respond with valid JSON when requested."
    }

    /// Render the report prompt with both fields embedded verbatim.
    pub fn render_benchmark_report(model_outputs: &str, glue_dataset: &str) -> String {
        // Dataset first so a literal "{glue_dataset}" inside pasted outputs stays untouched.
        let prompt = Self::benchmark_report()
            .replace("{glue_dataset}", glue_dataset)
            .replacen("{model_outputs}", model_outputs, 1);
        format!("{}\n{}", prompt, Self::report_output_format())
    }

    /// Declared input schema of the report prompt.
    pub fn benchmark_report_input_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "modelOutputs": {
                    "type": "string",
                    "description": "AI model outputs in JSON or CSV format."
                },
                "glueDataset": {
                    "type": "string",
                    "description": "The GLUE benchmark dataset to compare against."
                }
            },
            "required": ["modelOutputs", "glueDataset"],
            "additionalProperties": false
        })
    }

    /// Declared output schema of the report prompt.
    pub fn benchmark_report_output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "report": {
                    "type": "string",
                    "description": "A detailed benchmark report."
                }
            },
            "required": ["report"],
            "additionalProperties": false
        })
    }
}
