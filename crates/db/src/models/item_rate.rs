//! Rate versions: append-only, time-stamped unit prices per item.

use serde::{Deserialize, Serialize};
use sitelog_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A rate version row from the `item_rates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ItemRate {
    pub id: DbId,
    pub item_id: DbId,
    pub rate: f64,
    pub effective_from: Timestamp,
    /// Reference quantity the rate was quoted for, when the vendor gave one.
    pub quantity: Option<f64>,
    pub created_at: Timestamp,
}

/// DTO for appending a new rate version.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemRate {
    pub rate: f64,
    /// Defaults to the current time.
    pub effective_from: Option<Timestamp>,
    pub quantity: Option<f64>,
}
