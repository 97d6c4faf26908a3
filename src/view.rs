//! HTML rendering of the evaluator page.

use crate::dataset::GlueDataset;
use crate::page::{EvaluatorPage, Notice, NoticeKind, Notifier};
use std::fmt::Write;

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render the whole page for the current state plus any notices to show once.
pub fn render_page<N: Notifier>(page: &EvaluatorPage<N>, notices: &[Notice]) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str(HEAD);

    html.push_str(
        r#"<main class="container">
<header>
  <h1>AI Model Evaluator</h1>
  <p class="muted">Benchmark your AI model's performance against standard GLUE datasets with our powerful evaluation tool.</p>
</header>
<div class="grid">
"#,
    );

    render_form(&mut html, page);

    html.push_str("<div class=\"results\">\n");
    if page.is_pending() {
        html.push_str(PENDING_CARD);
    }
    if let (Some(submitted), Some(report)) = (page.submitted(), page.report()) {
        let _ = write!(
            html,
            r#"<section class="card">
  <h2>Submitted Data</h2>
  <p class="muted">This is the data you provided for benchmarking.</p>
  <h3>GLUE Dataset</h3>
  <p class="badge" id="submitted-dataset">{dataset}</p>
  <h3>Model Outputs</h3>
  <pre class="scroll">{outputs}</pre>
</section>
<section class="card">
  <h2>Benchmark Report</h2>
  <p class="muted">Here is the detailed analysis of your model's performance.</p>
  <pre id="report">{report}</pre>
  <a class="button" href="/report/download" download>Download Report</a>
</section>
"#,
            dataset = html_escape(&submitted.glue_dataset),
            outputs = html_escape(&submitted.model_outputs),
            report = html_escape(report),
        );
    }
    html.push_str("</div>\n</div>\n</main>\n");

    render_notices(&mut html, notices);

    html.push_str(SCRIPT);
    html.push_str("</body>\n</html>\n");
    html
}

fn render_form<N: Notifier>(html: &mut String, page: &EvaluatorPage<N>) {
    let form = page.form();
    let errors = page.form_errors();
    let limits = page.limits();
    let disabled = if page.is_pending() { " disabled" } else { "" };

    let _ = write!(
        html,
        r#"<section class="card">
  <h2>Start Benchmarking</h2>
  <p class="muted">Provide your model's output and select a GLUE dataset to begin.</p>
  <form method="post" action="/" id="benchmark-form">
    <label for="modelOutputs">Model Outputs</label>
    <textarea id="modelOutputs" name="modelOutputs" minlength="{min}" maxlength="{max}" placeholder="Paste your model outputs here (e.g., in JSON or CSV format)"{disabled}>{outputs}</textarea>
    <p class="muted">Provide the raw output from your AI model for evaluation.</p>
"#,
        min = crate::config::MIN_MODEL_OUTPUTS,
        max = limits.max_model_outputs,
        outputs = html_escape(&form.model_outputs),
    );
    if let Some(message) = &errors.model_outputs {
        let _ = writeln!(html, "    <p class=\"field-error\">{}</p>", html_escape(message));
    }

    let _ = writeln!(
        html,
        "    <label for=\"glueDataset\">GLUE Benchmark Dataset</label>\n    <select id=\"glueDataset\" name=\"glueDataset\"{disabled}>\n      <option value=\"\">Select a dataset</option>"
    );
    for dataset in GlueDataset::ALL {
        let selected = if form.glue_dataset == dataset.label() {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "      <option value=\"{label}\" title=\"{task}\"{selected}>{label}</option>",
            label = dataset.label(),
            task = dataset.task(),
        );
    }
    html.push_str("    </select>\n    <p class=\"muted\">Choose the GLUE dataset for comparison.</p>\n");
    if let Some(message) = &errors.glue_dataset {
        let _ = writeln!(html, "    <p class=\"field-error\">{}</p>", html_escape(message));
    }

    let label = if page.is_pending() {
        "Generating Report..."
    } else {
        "Run Benchmark"
    };
    let _ = write!(
        html,
        "    <button type=\"submit\" id=\"submit\"{disabled}>{label}</button>\n  </form>\n</section>\n"
    );
}

fn render_notices(html: &mut String, notices: &[Notice]) {
    if notices.is_empty() {
        return;
    }
    html.push_str("<div class=\"toasts\">\n");
    for notice in notices {
        let class = match notice.kind {
            NoticeKind::Success => "toast",
            NoticeKind::Error => "toast destructive",
        };
        let _ = writeln!(
            html,
            "  <div class=\"{class}\" role=\"status\"><strong>{}</strong><p>{}</p></div>",
            html_escape(&notice.title),
            html_escape(&notice.message),
        );
    }
    html.push_str("</div>\n");
}

const HEAD: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>AI Model Evaluator</title>
<style>
  :root { --bg: #f7f7fb; --card: #fff; --primary: #4f46e5; --muted: #6b7280; --error: #dc2626; --border: #e5e7eb; }
  * { box-sizing: border-box; }
  body { margin: 0; font-family: system-ui, sans-serif; background: var(--bg); color: #111827; }
  .container { max-width: 1200px; margin: 0 auto; padding: 32px 16px; }
  header { text-align: center; margin-bottom: 40px; }
  h1 { font-size: 2.5rem; margin: 0; }
  .muted { color: var(--muted); font-size: 0.9rem; }
  .grid { display: grid; grid-template-columns: 1fr; gap: 32px; align-items: start; }
  @media (min-width: 1024px) { .grid { grid-template-columns: 1fr 1fr; } }
  .results { display: flex; flex-direction: column; gap: 32px; }
  .card { background: var(--card); border: 1px solid var(--border); border-radius: 12px; padding: 24px; }
  label { display: block; font-weight: 600; margin-top: 16px; }
  textarea { width: 100%; min-height: 200px; resize: vertical; font-family: ui-monospace, monospace; padding: 8px; }
  select { width: 100%; padding: 8px; }
  button, .button { display: block; width: 100%; margin-top: 24px; padding: 10px; border: 0; border-radius: 8px;
    background: var(--primary); color: #fff; font-weight: 600; text-align: center; text-decoration: none; cursor: pointer; }
  button[disabled] { opacity: 0.6; cursor: progress; }
  .field-error { color: var(--error); font-size: 0.85rem; }
  .badge { color: var(--primary); font-weight: 600; }
  pre { white-space: pre-wrap; word-break: break-word; font-family: ui-monospace, monospace; font-size: 0.85rem;
    border: 1px solid var(--border); border-radius: 8px; padding: 12px; }
  .scroll { max-height: 12rem; overflow-y: auto; background: #f3f4f6; }
  .skeleton { height: 1rem; margin: 12px 0; border-radius: 6px; background: #e5e7eb; animation: pulse 1.5s infinite; }
  @keyframes pulse { 50% { opacity: 0.5; } }
  .toasts { position: fixed; right: 16px; bottom: 16px; display: flex; flex-direction: column; gap: 8px; }
  .toast { background: #fff; border: 1px solid var(--border); border-radius: 8px; padding: 12px 16px; min-width: 280px;
    box-shadow: 0 4px 12px rgba(0,0,0,0.1); animation: fade 6s forwards; }
  .toast p { margin: 4px 0 0; }
  .toast.destructive { background: var(--error); color: #fff; }
  @keyframes fade { 0%, 85% { opacity: 1; } 100% { opacity: 0; visibility: hidden; } }
</style>
</head>
<body>
"##;

const PENDING_CARD: &str = r#"<section class="card" id="pending">
  <h2>Generating Report</h2>
  <p class="muted">Please wait while we analyze the data...</p>
  <div class="skeleton" style="height: 2rem; width: 75%"></div>
  <div class="skeleton"></div>
  <div class="skeleton"></div>
  <div class="skeleton" style="width: 83%"></div>
</section>
"#;

// Disables the form while the POST is in flight.
const SCRIPT: &str = r#"<script>
  document.getElementById("benchmark-form").addEventListener("submit", function () {
    var button = document.getElementById("submit");
    button.disabled = true;
    button.textContent = "Generating Report...";
  });
</script>
"#;
