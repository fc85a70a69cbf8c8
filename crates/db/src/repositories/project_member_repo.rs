//! Repository for the `project_members` table (role resolver).

use sqlx::PgPool;
use sitelog_core::roles::Roster;
use sitelog_core::types::DbId;

use crate::models::project_member::{AssignRole, ProjectRole};

/// Read access to per-project roles, plus the upsert used by provisioning.
pub struct ProjectMemberRepo;

impl ProjectMemberRepo {
    /// Resolve a user's role and DPR flags on a project.
    ///
    /// Returns `None` if the user is not a member of the project.
    pub async fn get_role(
        pool: &PgPool,
        user_id: DbId,
        project_id: DbId,
    ) -> Result<Option<ProjectRole>, sqlx::Error> {
        sqlx::query_as::<_, ProjectRole>(
            "SELECT role_name, can_create_dpr, can_view_dpr, can_edit_dpr \
             FROM project_members WHERE user_id = $1 AND project_id = $2",
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_optional(pool)
        .await
    }

    /// All users on a project grouped by role name.
    pub async fn get_participants(pool: &PgPool, project_id: DbId) -> Result<Roster, sqlx::Error> {
        let rows: Vec<(String, DbId)> = sqlx::query_as(
            "SELECT role_name, user_id FROM project_members \
             WHERE project_id = $1 ORDER BY role_name, user_id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().collect())
    }

    /// Insert or replace a user's role on a project.
    pub async fn assign(pool: &PgPool, input: &AssignRole) -> Result<ProjectRole, sqlx::Error> {
        sqlx::query_as::<_, ProjectRole>(
            "INSERT INTO project_members \
                (project_id, user_id, role_name, can_create_dpr, can_view_dpr, can_edit_dpr) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (project_id, user_id) DO UPDATE SET \
                role_name = EXCLUDED.role_name, \
                can_create_dpr = EXCLUDED.can_create_dpr, \
                can_view_dpr = EXCLUDED.can_view_dpr, \
                can_edit_dpr = EXCLUDED.can_edit_dpr \
             RETURNING role_name, can_create_dpr, can_view_dpr, can_edit_dpr",
        )
        .bind(input.project_id)
        .bind(input.user_id)
        .bind(&input.role_name)
        .bind(input.can_create_dpr)
        .bind(input.can_view_dpr)
        .bind(input.can_edit_dpr)
        .fetch_one(pool)
        .await
    }
}
