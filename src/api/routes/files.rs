//! Download directory handlers.

use super::PurgeResponse;
use crate::api::AppState;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};

/// POST /purge - Delete downloaded files
///
/// Removes every file and subdirectory in the download directory except the
/// job snapshot. The job table is not modified.
#[utoipa::path(
    post,
    path = "/purge",
    tag = "files",
    responses(
        (status = 200, description = "Download directory purged", body = PurgeResponse),
        (status = 500, description = "Download directory could not be listed", body = crate::error::ApiError)
    )
)]
pub async fn purge_files(State(state): State<AppState>) -> Response {
    match state.downloader.purge_files().await {
        Ok(removed) => Json(PurgeResponse { removed }).into_response(),
        Err(e) => e.into_response(),
    }
}
