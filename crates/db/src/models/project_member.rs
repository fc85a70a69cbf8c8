//! Project membership: a user's role and DPR permission flags on a project.

use serde::{Deserialize, Serialize};
use sitelog_core::types::DbId;
use sqlx::FromRow;

/// Resolved role of one user on one project.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ProjectRole {
    pub role_name: String,
    pub can_create_dpr: bool,
    pub can_view_dpr: bool,
    pub can_edit_dpr: bool,
}

/// DTO for assigning (or re-assigning) a user's role on a project.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignRole {
    pub project_id: DbId,
    pub user_id: DbId,
    pub role_name: String,
    #[serde(default)]
    pub can_create_dpr: bool,
    #[serde(default)]
    pub can_view_dpr: bool,
    #[serde(default)]
    pub can_edit_dpr: bool,
}
