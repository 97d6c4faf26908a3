//! Request and report types, plus the form-level validation.

use crate::config::{Limits, MIN_MODEL_OUTPUTS};
use crate::dataset::GlueDataset;
use serde::{Deserialize, Serialize};

/// What the user submitted for benchmarking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BenchmarkRequest {
    /// Raw model outputs, expected to be JSON- or CSV-shaped but never parsed.
    pub model_outputs: String,
    /// GLUE dataset label to compare against.
    pub glue_dataset: String,
}

impl BenchmarkRequest {
    pub fn new(model_outputs: impl Into<String>, glue_dataset: impl Into<String>) -> Self {
        Self {
            model_outputs: model_outputs.into(),
            glue_dataset: glue_dataset.into(),
        }
    }

    /// Length of the model outputs in characters.
    pub fn model_outputs_len(&self) -> usize {
        self.model_outputs.chars().count()
    }

    /// Bounds enforced by the request handler: length range and a non-empty label.
    pub fn is_acceptable(&self, limits: &Limits) -> bool {
        limits.accepts_len(self.model_outputs_len()) && !self.glue_dataset.is_empty()
    }

    /// Form validation: same length range, and the label must be a known dataset.
    pub fn validate_form(&self, limits: &Limits) -> Result<GlueDataset, FormErrors> {
        let mut errors = FormErrors::default();

        let len = self.model_outputs_len();
        if len < MIN_MODEL_OUTPUTS {
            errors.model_outputs = Some(format!(
                "Model output must be at least {} characters.",
                MIN_MODEL_OUTPUTS
            ));
        } else if len > limits.max_model_outputs {
            errors.model_outputs = Some(format!(
                "Model output must not exceed {} characters.",
                limits.max_model_outputs
            ));
        }

        let dataset = self.glue_dataset.parse::<GlueDataset>().ok();
        if dataset.is_none() {
            errors.glue_dataset = Some("Please select a GLUE dataset.".to_string());
        }

        match dataset {
            Some(dataset) if errors.is_empty() => Ok(dataset),
            _ => Err(errors),
        }
    }
}

/// The generated narrative report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub report: String,
}

/// Inline messages for each invalid form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub model_outputs: Option<String>,
    pub glue_dataset: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.model_outputs.is_none() && self.glue_dataset.is_none()
    }
}
