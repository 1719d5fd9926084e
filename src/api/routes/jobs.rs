//! Job submission and status handlers.

use super::{DownloadAccepted, DownloadRequest};
use crate::api::AppState;
use crate::error::Error;
use crate::types::JobId;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// POST /download - Submit a URL for download
#[utoipa::path(
    post,
    path = "/download",
    tag = "jobs",
    request_body = DownloadRequest,
    responses(
        (status = 202, description = "Job queued", body = DownloadAccepted),
        (status = 400, description = "Missing or invalid URL", body = crate::error::ApiError),
        (status = 503, description = "Queue full or shutting down", body = crate::error::ApiError)
    )
)]
pub async fn submit_download(
    State(state): State<AppState>,
    Json(payload): Json<DownloadRequest>,
) -> Response {
    let url = payload.url.as_deref().unwrap_or_default();

    match state
        .downloader
        .submit(url, payload.resolution.as_deref())
        .await
    {
        Ok((download_id, resolution)) => (
            StatusCode::ACCEPTED,
            Json(DownloadAccepted {
                download_id,
                resolution,
                message: "Download queued".to_string(),
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /status - List all jobs
#[utoipa::path(
    get,
    path = "/status",
    tag = "jobs",
    responses(
        (status = 200, description = "All jobs in submission order", body = Vec<crate::types::JobRecord>)
    )
)]
pub async fn list_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.downloader.list_jobs().await)
}

/// GET /status/:id - Get a single job
#[utoipa::path(
    get,
    path = "/status/{id}",
    tag = "jobs",
    params(
        ("id" = String, Path, description = "Job ID (UUID)")
    ),
    responses(
        (status = 200, description = "Job record", body = crate::types::JobRecord),
        (status = 400, description = "Malformed job ID", body = crate::error::ApiError),
        (status = 404, description = "Job not found", body = crate::error::ApiError)
    )
)]
pub async fn get_status(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let job_id: JobId = match id.parse() {
        Ok(job_id) => job_id,
        Err(e) => return Error::validation("id", format!("not a job ID: {e}")).into_response(),
    };

    match state.downloader.get_job(job_id).await {
        Some(record) => Json(record).into_response(),
        None => Error::NotFound(format!("job {job_id}")).into_response(),
    }
}

/// GET /resolutions - Default and accepted resolutions
#[utoipa::path(
    get,
    path = "/resolutions",
    tag = "jobs",
    responses(
        (status = 200, description = "Resolution options", body = crate::types::ResolutionOptions)
    )
)]
pub async fn list_resolutions(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.downloader.list_resolutions())
}
