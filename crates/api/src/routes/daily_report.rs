//! Route definitions for the `/reports` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::daily_report;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET    /{id}          -> get_by_id
/// PATCH  /{id}          -> update
/// POST   /{id}/submit   -> submit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(daily_report::get_by_id).patch(daily_report::update),
        )
        .route("/{id}/submit", post(daily_report::submit))
}
