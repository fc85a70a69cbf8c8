//! Billable item ledger models.

use serde::{Deserialize, Serialize};
use sitelog_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// An item row from the `items` table. Unique per `(project_id, name)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub unit: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An item joined with its currently effective rate, if any.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ItemWithRate {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub unit: String,
    pub rate_id: Option<DbId>,
    pub rate: Option<f64>,
    pub effective_from: Option<Timestamp>,
}

/// DTO for the find-or-create item endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub name: String,
    pub unit: String,
}
