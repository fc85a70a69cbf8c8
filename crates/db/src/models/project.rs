//! Project model. Projects are owned by the project service; this crate only
//! needs their identity for lookups and foreign keys.

use serde::{Deserialize, Serialize};
use sitelog_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a project row (provisioning and tests).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
}
