//! Page state for the evaluator UI.
//!
//! The page moves between three states:
//!
//! - **Idle**: nothing in flight, no report shown
//! - **Pending**: a submission is running; the form is disabled
//! - **Success**: the report and the exact submitted input are shown
//!
//! Failures return the page to Idle and raise a transient notice through the
//! injected [`Notifier`]. Only one submission is tracked at a time.

use crate::config::Limits;
use crate::export::ReportDownload;
use crate::handler::{GenerateReportResult, ReportHandler};
use crate::request::{BenchmarkRequest, FormErrors};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient notification shown once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

/// Capability for showing transient notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, title: &str, message: &str);
}

/// Notices waiting to be shown, drained on read.
#[derive(Debug, Clone, Default)]
pub struct NoticeQueue {
    inner: Arc<Mutex<VecDeque<Notice>>>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every queued notice.
    pub fn drain(&self) -> Vec<Notice> {
        let mut queue = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        queue.drain(..).collect()
    }
}

impl Notifier for NoticeQueue {
    fn notify(&self, kind: NoticeKind, title: &str, message: &str) {
        let mut queue = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        queue.push_back(Notice {
            kind,
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

/// Where the page is in the submission lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageState {
    #[default]
    Idle,
    Pending {
        submitted: BenchmarkRequest,
    },
    Success {
        submitted: BenchmarkRequest,
        report: String,
    },
}

/// Why a submission did not start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejected {
    /// A submission is already in flight.
    Busy,
    /// The form failed validation; the handler was not called.
    Invalid(FormErrors),
}

pub const SUCCESS_MESSAGE: &str = "Benchmark report generated successfully.";
pub const UNKNOWN_ERROR: &str = "An unknown error occurred.";

/// The evaluator page: form values, validation errors and the current report.
pub struct EvaluatorPage<N> {
    state: PageState,
    form: BenchmarkRequest,
    form_errors: FormErrors,
    limits: Limits,
    notifier: N,
}

impl<N: Notifier> EvaluatorPage<N> {
    pub fn new(limits: Limits, notifier: N) -> Self {
        Self {
            state: PageState::Idle,
            form: BenchmarkRequest::default(),
            form_errors: FormErrors::default(),
            limits,
            notifier,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, PageState::Pending { .. })
    }

    /// Current form values, as last entered.
    pub fn form(&self) -> &BenchmarkRequest {
        &self.form
    }

    pub fn form_errors(&self) -> &FormErrors {
        &self.form_errors
    }

    /// The displayed report, if any.
    pub fn report(&self) -> Option<&str> {
        match &self.state {
            PageState::Success { report, .. } => Some(report),
            _ => None,
        }
    }

    /// The input the displayed report was generated from.
    pub fn submitted(&self) -> Option<&BenchmarkRequest> {
        match &self.state {
            PageState::Success { submitted, .. } => Some(submitted),
            _ => None,
        }
    }

    /// Validate the form and move to Pending.
    ///
    /// Clears any previous report immediately. Returns the request to send
    /// to the handler.
    pub fn begin_submit(
        &mut self,
        values: BenchmarkRequest,
    ) -> Result<BenchmarkRequest, SubmitRejected> {
        if self.is_pending() {
            return Err(SubmitRejected::Busy);
        }

        self.form = values.clone();
        if let Err(errors) = values.validate_form(&self.limits) {
            self.form_errors = errors.clone();
            return Err(SubmitRejected::Invalid(errors));
        }

        self.form_errors = FormErrors::default();
        self.state = PageState::Pending {
            submitted: values.clone(),
        };
        debug!(glue_dataset = %values.glue_dataset, "submission pending");
        Ok(values)
    }

    /// Apply the handler's result to a pending submission.
    ///
    /// Returns `false` and changes nothing when no submission is pending.
    pub fn complete(&mut self, result: GenerateReportResult) -> bool {
        let submitted = match std::mem::take(&mut self.state) {
            PageState::Pending { submitted } => submitted,
            other => {
                self.state = other;
                return false;
            }
        };

        match result {
            GenerateReportResult::Success { report } if !report.is_empty() => {
                self.state = PageState::Success { submitted, report };
                self.notifier
                    .notify(NoticeKind::Success, "Success!", SUCCESS_MESSAGE);
            }
            other => {
                let message = other.error().unwrap_or(UNKNOWN_ERROR).to_string();
                self.notifier.notify(NoticeKind::Error, "Error", &message);
            }
        }
        true
    }

    /// Validate, call the handler and apply its result.
    pub async fn submit(
        &mut self,
        handler: &ReportHandler,
        values: BenchmarkRequest,
    ) -> Result<(), SubmitRejected> {
        let request = self.begin_submit(values)?;
        let result = handler.generate(request).await;
        self.complete(result);
        Ok(())
    }

    /// The displayed report as a downloadable file, if there is one.
    pub fn export(&self) -> Option<ReportDownload> {
        self.report().map(ReportDownload::markdown)
    }
}
