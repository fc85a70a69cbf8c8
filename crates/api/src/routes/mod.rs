pub mod daily_report;
pub mod health;
pub mod item;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects/{project_id}/participants              role roster (GET)
/// /projects/{project_id}/items                     list, find-or-create (GET, POST)
/// /projects/{project_id}/reports                   list (?limit), create (GET, POST)
/// /projects/{project_id}/reports/by-date/{date}    get by natural key (GET)
///
/// /items/{id}                                      get (GET)
/// /items/{id}/rates                                history, append (GET, POST)
/// /items/{id}/rates/latest                         current rate (GET)
///
/// /reports/{id}                                    get, sparse update (GET, PATCH)
/// /reports/{id}/submit                             advance workflow (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Project-scoped roster, ledger and reports.
        .nest("/projects", project::router())
        // Item ledger and rate schedule.
        .nest("/items", item::router())
        // Report reads, edits and workflow.
        .nest("/reports", daily_report::router())
}
