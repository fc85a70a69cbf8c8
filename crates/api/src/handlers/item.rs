//! Handlers for the item ledger and its rate schedule.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sitelog_core::types::DbId;
use sitelog_db::models::item::CreateItem;
use sitelog_db::models::item_rate::CreateItemRate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::service::ledger;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{project_id}/items
pub async fn list_by_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let items = ledger::list_items(&state.pool, project_id, auth.user_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/projects/{project_id}/items
///
/// Idempotent on `(project_id, name)`.
pub async fn find_or_create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateItem>,
) -> AppResult<impl IntoResponse> {
    let item = ledger::find_or_create_item(&state.pool, project_id, auth.user_id, &input).await?;
    Ok(Json(DataResponse { data: item }))
}

/// GET /api/v1/items/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = ledger::get_item(&state.pool, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: item }))
}

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

/// GET /api/v1/items/{id}/rates
pub async fn rate_history(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let rates = ledger::rate_history(&state.pool, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: rates }))
}

/// POST /api/v1/items/{id}/rates
pub async fn append_rate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateItemRate>,
) -> AppResult<impl IntoResponse> {
    let rate = ledger::append_rate(&state.pool, id, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: rate })))
}

/// GET /api/v1/items/{id}/rates/latest
pub async fn latest_rate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let rate = ledger::latest_rate(&state.pool, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: rate }))
}
