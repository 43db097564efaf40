use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::{
    dtos::{BillListRequest, BillListResponse},
    middleware::CallerContext,
    startup::AppState,
    utils::ValidatedJson,
};

/// List the caller's visible bills, filtered and paginated.
pub async fn list_bills(
    State(state): State<AppState>,
    caller: CallerContext,
    ValidatedJson(payload): ValidatedJson<BillListRequest>,
) -> Result<Json<BillListResponse>, AppError> {
    tracing::debug!(payload = ?payload, "Request received");

    let filter = payload.into_filter();
    let response = state.bill_list.list(&caller, &filter).await?;

    tracing::debug!(
        code = response.code,
        total = ?response.total,
        rows = response.data.as_ref().map_or(0, Vec::len),
        "Response sent"
    );

    Ok(Json(response))
}
