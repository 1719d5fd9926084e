//! History handlers.

use super::ClearHistoryResponse;
use crate::api::AppState;
use axum::{Json, extract::State, response::IntoResponse};

/// DELETE /history - Remove every job record
///
/// Downloaded files are kept.
#[utoipa::path(
    delete,
    path = "/history",
    tag = "history",
    responses(
        (status = 200, description = "History cleared", body = ClearHistoryResponse)
    )
)]
pub async fn clear_history(State(state): State<AppState>) -> impl IntoResponse {
    let cleared = state.downloader.clear_history().await;
    Json(ClearHistoryResponse { cleared })
}
