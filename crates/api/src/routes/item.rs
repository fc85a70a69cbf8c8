//! Route definitions for the `/items` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::item;
use crate::state::AppState;

/// Routes mounted at `/items`.
///
/// ```text
/// GET    /{id}                -> get_by_id
/// GET    /{id}/rates          -> rate_history
/// POST   /{id}/rates          -> append_rate
/// GET    /{id}/rates/latest   -> latest_rate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(item::get_by_id))
        .route("/{id}/rates", get(item::rate_history).post(item::append_rate))
        .route("/{id}/rates/latest", get(item::latest_rate))
}
