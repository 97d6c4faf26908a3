//! HTTP surface of the evaluator.
//!
//! - `GET /`: render the page
//! - `POST /`: submit the form (urlencoded)
//! - `POST /api/report`: JSON boundary into the request handler
//! - `GET /report/download`: export the displayed report
//! - `GET /health`: liveness

use crate::handler::{GenerateReportResult, ReportHandler, ReportResponse, UNEXPECTED_ERROR};
use crate::page::{EvaluatorPage, NoticeKind, NoticeQueue, Notifier, SubmitRejected};
use crate::request::BenchmarkRequest;
use crate::view::render_page;
use axum::{
    Form, Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared server state.
///
/// There is one page and one notice queue for the whole server, not one per
/// visitor. A notice is shown to whichever client loads `GET /` next.
pub struct AppState {
    pub handler: ReportHandler,
    pub page: Mutex<EvaluatorPage<NoticeQueue>>,
    pub notices: NoticeQueue,
}

impl AppState {
    pub fn new(handler: ReportHandler) -> Self {
        let notices = NoticeQueue::new();
        let page = EvaluatorPage::new(*handler.limits(), notices.clone());
        Self {
            handler,
            page: Mutex::new(page),
            notices,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Create the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(show_page).post(submit_form))
        .route("/api/report", post(generate_report))
        .route("/report/download", get(download_report))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(bind: &str, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(address = %listener.local_addr()?, "evaluator listening");
    axum::serve(listener, create_router(state)).await
}

async fn show_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let page = state.page.lock().await;
    Html(render_page(&*page, &state.notices.drain()))
}

async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(values): Form<BenchmarkRequest>,
) -> Response {
    let started = state.page.lock().await.begin_submit(values);

    match started {
        Ok(request) => {
            tokio::spawn(run_submission(state.clone(), request));
        }
        Err(SubmitRejected::Busy) => {
            warn!("submission rejected: another report is being generated");
            state.notices.notify(
                NoticeKind::Error,
                "Error",
                "A report is already being generated. Please wait for it to finish.",
            );
        }
        Err(SubmitRejected::Invalid(_)) => {}
    }

    Redirect::to("/").into_response()
}

/// Generate the report for a pending submission and settle the page.
///
/// Runs detached from the request, so a closed connection cannot leave the
/// page in Pending.
async fn run_submission(state: Arc<AppState>, request: BenchmarkRequest) {
    let handler = state.handler.clone();
    let result = match tokio::spawn(async move { handler.generate(request).await }).await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "report generation task failed");
            GenerateReportResult::failure(UNEXPECTED_ERROR)
        }
    };
    state.page.lock().await.complete(result);
}

async fn generate_report(
    State(state): State<Arc<AppState>>,
    Json(input): Json<serde_json::Value>,
) -> Json<ReportResponse> {
    Json(state.handler.generate_report_action(input).await.into())
}

async fn download_report(State(state): State<Arc<AppState>>) -> Response {
    let page = state.page.lock().await;
    match page.export() {
        Some(download) => (
            [
                (header::CONTENT_TYPE, download.content_type.to_string()),
                (header::CONTENT_DISPOSITION, download.content_disposition()),
            ],
            download.bytes,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "No report to download").into_response(),
    }
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;
    use crate::error::Result;
    use crate::export::REPORT_FILE_NAME;
    use crate::report::ReportGenerator;
    use crate::request::BenchmarkReport;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;
    use tower::ServiceExt;

    struct FixedGenerator {
        report: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReportGenerator for FixedGenerator {
        async fn generate_report(&self, _request: &BenchmarkRequest) -> Result<BenchmarkReport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(BenchmarkReport {
                report: self.report.to_string(),
            })
        }
    }

    fn state(report: &'static str) -> (Arc<AppState>, Arc<FixedGenerator>) {
        let generator = Arc::new(FixedGenerator {
            report,
            calls: AtomicUsize::new(0),
        });
        let handler = ReportHandler::new(generator.clone(), Limits::default());
        (Arc::new(AppState::new(handler)), generator)
    }

    /// Wait for the detached submission to leave Pending.
    async fn settled(state: &AppState) {
        for _ in 0..200 {
            if !state.page.lock().await.is_pending() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("submission never left Pending");
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_post(body: String) -> Request<Body> {
        Request::post("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_form_submission_end_to_end() {
        let (state, generator) = state("Accuracy: 0.91 on MRPC");
        let app = create_router(state.clone());

        let outputs = "y".repeat(60);
        let response = app
            .clone()
            .oneshot(form_post(format!("modelOutputs={}&glueDataset=MRPC", outputs)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        settled(&state).await;
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

        let page = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(page).await;
        assert!(html.contains("id=\"submitted-dataset\">MRPC<"));
        assert!(html.contains("Accuracy: 0.91 on MRPC"));
        assert!(html.contains("Benchmark report generated successfully."));

        let download = app
            .oneshot(Request::get("/report/download").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(download.status(), StatusCode::OK);
        assert_eq!(
            download.headers()[header::CONTENT_DISPOSITION],
            format!("attachment; filename=\"{}\"", REPORT_FILE_NAME)
        );
        assert_eq!(
            download.headers()[header::CONTENT_TYPE],
            "text/markdown;charset=utf-8"
        );
        assert_eq!(body_text(download).await, "Accuracy: 0.91 on MRPC");
    }

    #[tokio::test]
    async fn test_short_form_input_never_reaches_handler() {
        let (state, generator) = state("unused");
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(form_post("modelOutputs=0123456789&glueDataset=MRPC".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);

        let html = body_text(
            app.oneshot(Request::get("/").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("Model output must be at least 50 characters."));
    }

    #[tokio::test]
    async fn test_download_without_report_is_not_found() {
        let (state, _) = state("unused");
        let response = create_router(state)
            .oneshot(Request::get("/report/download").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_api_report_wire_shape() {
        let (state, _) = state("Accuracy: 0.91");
        let app = create_router(state);

        let request = |body: serde_json::Value| {
            Request::post("/api/report")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        };

        let ok = app
            .clone()
            .oneshot(request(serde_json::json!({
                "modelOutputs": "z".repeat(60),
                "glueDataset": "MRPC"
            })))
            .await
            .unwrap();
        let ok: serde_json::Value = serde_json::from_str(&body_text(ok).await).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "report": "Accuracy: 0.91"}));

        let bad = app
            .oneshot(request(serde_json::json!({"modelOutputs": "short"})))
            .await
            .unwrap();
        let bad: serde_json::Value = serde_json::from_str(&body_text(bad).await).unwrap();
        assert_eq!(bad, serde_json::json!({"success": false, "error": "Invalid input."}));
    }

    #[tokio::test]
    async fn test_busy_page_rejects_form() {
        let (state, generator) = state("unused");
        state
            .page
            .lock()
            .await
            .begin_submit(BenchmarkRequest::new("w".repeat(60), "RTE"))
            .unwrap();

        let response = create_router(state.clone())
            .oneshot(form_post(format!("modelOutputs={}&glueDataset=CoLA", "v".repeat(60))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        let notices = state.notices.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Error);
    }

    /// Holds every report until released.
    struct GatedGenerator {
        release: Notify,
        panic: bool,
    }

    #[async_trait]
    impl ReportGenerator for GatedGenerator {
        async fn generate_report(&self, _request: &BenchmarkRequest) -> Result<BenchmarkReport> {
            self.release.notified().await;
            if self.panic {
                panic!("generator crashed");
            }
            Ok(BenchmarkReport {
                report: "F1: 0.77".to_string(),
            })
        }
    }

    fn gated_state(panic: bool) -> (Arc<AppState>, Arc<GatedGenerator>) {
        let generator = Arc::new(GatedGenerator {
            release: Notify::new(),
            panic,
        });
        let handler = ReportHandler::new(generator.clone(), Limits::default());
        (Arc::new(AppState::new(handler)), generator)
    }

    #[tokio::test]
    async fn test_closed_connection_does_not_strand_pending() {
        let (state, generator) = gated_state(false);
        let app = create_router(state.clone());

        // Give up on the request the way a disconnecting browser would.
        let _ = tokio::time::timeout(
            Duration::from_millis(50),
            app.clone()
                .oneshot(form_post(format!("modelOutputs={}&glueDataset=QQP", "k".repeat(60)))),
        )
        .await;

        let html = body_text(
            app.clone()
                .oneshot(Request::get("/").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("id=\"pending\""));

        generator.release.notify_one();
        settled(&state).await;
        assert_eq!(state.page.lock().await.report(), Some("F1: 0.77"));

        let next = state
            .page
            .lock()
            .await
            .begin_submit(BenchmarkRequest::new("m".repeat(60), "QQP"));
        assert!(next.is_ok());
    }

    #[tokio::test]
    async fn test_crashed_generation_returns_to_idle() {
        let (state, generator) = gated_state(true);
        let app = create_router(state.clone());

        let response = app
            .oneshot(form_post(format!("modelOutputs={}&glueDataset=WNLI", "c".repeat(60))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        generator.release.notify_one();
        settled(&state).await;

        assert_eq!(state.page.lock().await.state(), &crate::page::PageState::Idle);
        let notices = state.notices.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, UNEXPECTED_ERROR);
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = state("unused");
        let response = create_router(state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "healthy");
    }
}
