//! AI Model Evaluator - LLM-narrated GLUE benchmark reports.
//!
//! Paste a model's outputs, pick a GLUE dataset, and a language model writes
//! a benchmark report (accuracy, precision, recall, F1, strengths and
//! weaknesses). Nothing is scored locally: the report is the model's
//! narrative.
//!
//! # Quick Start
//!
//! ```no_run
//! use ai_model_evaluator::{
//!     config::Config,
//!     handler::ReportHandler,
//!     llm::LlmClient,
//!     report::BenchmarkReportFlow,
//!     request::BenchmarkRequest,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     config.validate()?;
//!
//!     let flow = BenchmarkReportFlow::new(LlmClient::new(config.llm.clone())?);
//!     let handler = ReportHandler::new(Arc::new(flow), config.limits);
//!
//!     let request = BenchmarkRequest::new(std::fs::read_to_string("predictions.csv")?, "MRPC");
//!     match handler.generate(request).await.report() {
//!         Some(report) => println!("{}", report),
//!         None => eprintln!("no report"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **BenchmarkReportFlow**: renders the report prompt and validates the model reply
//! - **ReportHandler**: validates input and maps every outcome to a fixed result
//! - **EvaluatorPage**: Idle/Pending/Success page state, notices and export
//! - **server**: axum routes serving the page and the JSON boundary

pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod handler;
pub mod llm;
pub mod page;
pub mod report;
pub mod request;
pub mod server;
pub mod view;

// Re-export commonly used types
pub use config::Config;
pub use dataset::GlueDataset;
pub use error::{EvaluatorError, Result};
pub use export::ReportDownload;
pub use handler::{GenerateReportResult, ReportHandler};
pub use llm::LlmClient;
pub use page::{EvaluatorPage, Notifier};
pub use report::{BenchmarkReportFlow, ReportGenerator};
pub use request::{BenchmarkReport, BenchmarkRequest};
