//! View counting endpoints.

use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;
use saythat_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{extractors::Voter, middleware::AppState, response::ApiResponse};

/// Record view request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordViewRequest {
    pub discussion_id: String,
}

#[derive(Serialize)]
pub struct RecordViewResponse {
    /// Whether this view raised the discussion's view count.
    pub counted: bool,
}

/// Record a discussion view. Counted at most once per viewer per UTC day.
async fn record(
    Voter(viewer): Voter,
    State(state): State<AppState>,
    Json(req): Json<RecordViewRequest>,
) -> AppResult<ApiResponse<RecordViewResponse>> {
    let today = Utc::now().date_naive();
    let counted = state
        .view_ledger
        .record_view_if_first_today(&viewer, &req.discussion_id, today)
        .await?;

    Ok(ApiResponse::ok(RecordViewResponse { counted }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/record", post(record))
}
