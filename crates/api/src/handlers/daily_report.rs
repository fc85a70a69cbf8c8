//! Handlers for daily progress reports and their approval workflow.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sitelog_core::types::{DbId, ReportDate};
use sitelog_db::models::daily_report::{CreateDailyReport, UpdateDailyReport};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::service::daily_report as reports;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Project-scoped
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{project_id}/reports
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateDailyReport>,
) -> AppResult<impl IntoResponse> {
    let detail = reports::create_report(&state.pool, project_id, auth.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/projects/{project_id}/reports?limit=
pub async fn list_by_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let summaries =
        reports::list_reports(&state.pool, project_id, auth.user_id, params.limit).await?;
    Ok(Json(DataResponse { data: summaries }))
}

/// GET /api/v1/projects/{project_id}/reports/by-date/{date}
pub async fn get_by_date(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, report_date)): Path<(DbId, ReportDate)>,
) -> AppResult<impl IntoResponse> {
    let detail =
        reports::get_report_by_date(&state.pool, project_id, report_date, auth.user_id).await?;
    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// Report-scoped
// ---------------------------------------------------------------------------

/// GET /api/v1/reports/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = reports::get_report(&state.pool, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PATCH /api/v1/reports/{id}
///
/// Only the current handler may edit.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDailyReport>,
) -> AppResult<impl IntoResponse> {
    let detail = reports::update_report(&state.pool, id, auth.user_id, input).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/reports/{id}/submit
///
/// Advances the report one workflow stage and hands it to the next handler.
pub async fn submit(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = reports::submit_report(&state.pool, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: outcome }))
}
