//! HTML status page.

use crate::api::AppState;
use crate::types::{JobRecord, Phase};
use axum::{extract::State, response::Html};
use std::fmt::Write;

/// GET /statusPage - Human-readable job list
#[utoipa::path(
    get,
    path = "/statusPage",
    tag = "jobs",
    responses(
        (status = 200, description = "HTML list of jobs with a status glyph each", content_type = "text/html")
    )
)]
pub async fn status_page(State(state): State<AppState>) -> Html<String> {
    Html(render_status_page(&state.downloader.list_jobs().await))
}

/// Glyph shown next to a job in the given phase
pub(crate) fn phase_glyph(phase: Phase) -> &'static str {
    match phase {
        Phase::Pending | Phase::Probing | Phase::Fetching => "⏳",
        Phase::Done => "✅",
        Phase::Failed => "❌",
    }
}

pub(crate) fn render_status_page(jobs: &[JobRecord]) -> String {
    let mut html = String::from(
        "<html><head><meta charset=\"utf-8\"><title>Download Status</title></head><body>\
         <h1>Download Status</h1><ul>",
    );

    for job in jobs {
        let label = if job.title.is_empty() {
            &job.url
        } else {
            &job.title
        };
        // Writing to a String cannot fail
        let _ = write!(
            html,
            "<li>{} <strong>{}</strong>: {}",
            phase_glyph(job.phase),
            escape_html(label),
            job.phase
        );
        if !job.error_detail.is_empty() {
            let _ = write!(html, " ({})", escape_html(&job.error_detail));
        }
        html.push_str("</li>");
    }

    html.push_str("</ul></body></html>");
    html
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
