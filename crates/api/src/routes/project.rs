//! Route definitions for the `/projects` resource.
//!
//! Nests item and report collections under `/projects/{project_id}/...`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{daily_report, item, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /{project_id}/participants                 -> participants
///
/// GET    /{project_id}/items                        -> list_by_project
/// POST   /{project_id}/items                        -> find_or_create
///
/// GET    /{project_id}/reports                      -> list_by_project
/// POST   /{project_id}/reports                      -> create
/// GET    /{project_id}/reports/by-date/{date}       -> get_by_date
/// ```
pub fn router() -> Router<AppState> {
    let item_routes =
        Router::new().route("/", get(item::list_by_project).post(item::find_or_create));

    Router::new()
        .route("/{project_id}/participants", get(project::participants))
        .nest("/{project_id}/items", item_routes)
        .route(
            "/{project_id}/reports",
            get(daily_report::list_by_project).post(daily_report::create),
        )
        .route(
            "/{project_id}/reports/by-date/{date}",
            get(daily_report::get_by_date),
        )
}
