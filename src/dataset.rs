//! The GLUE benchmark dataset labels offered for comparison.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A GLUE benchmark task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlueDataset {
    #[serde(rename = "CoLA")]
    Cola,
    #[serde(rename = "SST-2")]
    Sst2,
    #[serde(rename = "MRPC")]
    Mrpc,
    #[serde(rename = "STS-B")]
    StsB,
    #[serde(rename = "QQP")]
    Qqp,
    #[serde(rename = "MNLI")]
    Mnli,
    #[serde(rename = "QNLI")]
    Qnli,
    #[serde(rename = "RTE")]
    Rte,
    #[serde(rename = "WNLI")]
    Wnli,
}

impl GlueDataset {
    /// All datasets, in the order the form lists them.
    pub const ALL: [GlueDataset; 9] = [
        GlueDataset::Cola,
        GlueDataset::Sst2,
        GlueDataset::Mrpc,
        GlueDataset::StsB,
        GlueDataset::Qqp,
        GlueDataset::Mnli,
        GlueDataset::Qnli,
        GlueDataset::Rte,
        GlueDataset::Wnli,
    ];

    /// The canonical label, exactly as shown to the user and sent to the model.
    pub fn label(&self) -> &'static str {
        match self {
            GlueDataset::Cola => "CoLA",
            GlueDataset::Sst2 => "SST-2",
            GlueDataset::Mrpc => "MRPC",
            GlueDataset::StsB => "STS-B",
            GlueDataset::Qqp => "QQP",
            GlueDataset::Mnli => "MNLI",
            GlueDataset::Qnli => "QNLI",
            GlueDataset::Rte => "RTE",
            GlueDataset::Wnli => "WNLI",
        }
    }

    /// One-line task summary.
    pub fn task(&self) -> &'static str {
        match self {
            GlueDataset::Cola => "Linguistic acceptability",
            GlueDataset::Sst2 => "Sentiment analysis",
            GlueDataset::Mrpc => "Paraphrase detection",
            GlueDataset::StsB => "Semantic textual similarity",
            GlueDataset::Qqp => "Question pair equivalence",
            GlueDataset::Mnli => "Multi-genre natural language inference",
            GlueDataset::Qnli => "Question answering inference",
            GlueDataset::Rte => "Recognizing textual entailment",
            GlueDataset::Wnli => "Winograd natural language inference",
        }
    }
}

impl fmt::Display for GlueDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a label is not one of the GLUE datasets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown GLUE dataset '{0}'")]
pub struct UnknownDataset(pub String);

impl FromStr for GlueDataset {
    type Err = UnknownDataset;

    /// Labels match exactly; the form only ever submits canonical labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GlueDataset::ALL
            .into_iter()
            .find(|d| d.label() == s)
            .ok_or_else(|| UnknownDataset(s.to_string()))
    }
}
