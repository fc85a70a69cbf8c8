//! Project role checks.

use sitelog_core::error::CoreError;
use sitelog_core::roles::Roster;
use sitelog_core::types::DbId;
use sitelog_db::models::project_member::ProjectRole;
use sitelog_db::repositories::ProjectMemberRepo;
use sqlx::PgPool;

use crate::error::AppResult;

/// DPR permission flags carried on a project membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DprPermission {
    Create,
    View,
    Edit,
}

impl DprPermission {
    fn granted_by(self, role: &ProjectRole) -> bool {
        match self {
            DprPermission::Create => role.can_create_dpr,
            DprPermission::View => role.can_view_dpr,
            DprPermission::Edit => role.can_edit_dpr,
        }
    }

    fn flag_name(self) -> &'static str {
        match self {
            DprPermission::Create => "can_create_dpr",
            DprPermission::View => "can_view_dpr",
            DprPermission::Edit => "can_edit_dpr",
        }
    }
}

/// Resolve the caller's role on a project, failing if they are not a member.
pub async fn require_role(pool: &PgPool, user_id: DbId, project_id: DbId) -> AppResult<ProjectRole> {
    ProjectMemberRepo::get_role(pool, user_id, project_id)
        .await?
        .ok_or_else(|| {
            CoreError::Forbidden(format!("User {user_id} is not a member of project {project_id}"))
                .into()
        })
}

/// Resolve the caller's role and require one DPR permission flag.
pub async fn require_permission(
    pool: &PgPool,
    user_id: DbId,
    project_id: DbId,
    permission: DprPermission,
) -> AppResult<ProjectRole> {
    let role = require_role(pool, user_id, project_id).await?;
    if !permission.granted_by(&role) {
        return Err(CoreError::Forbidden(format!(
            "Role '{}' lacks {} on project {project_id}",
            role.role_name,
            permission.flag_name()
        ))
        .into());
    }
    Ok(role)
}

/// Project roster, visible to anyone who can view the project's reports.
pub async fn participants(pool: &PgPool, project_id: DbId, user_id: DbId) -> AppResult<Roster> {
    require_permission(pool, user_id, project_id, DprPermission::View).await?;
    Ok(ProjectMemberRepo::get_participants(pool, project_id).await?)
}
