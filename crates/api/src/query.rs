//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?limit=` for listings. Clamped in the service layer via `clamp_limit`.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}
