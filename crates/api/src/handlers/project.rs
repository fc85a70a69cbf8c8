//! Handlers for project-scoped role lookups.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use sitelog_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::service::access;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/participants
///
/// Role name to member user ids, ordered by user id.
pub async fn participants(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let roster = access::participants(&state.pool, project_id, auth.user_id).await?;
    Ok(Json(DataResponse { data: roster }))
}
