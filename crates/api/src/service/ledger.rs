//! Item ledger and append-only rate schedule.

use sitelog_core::error::CoreError;
use sitelog_core::rates::{normalize_item, validate_quantity, validate_rate};
use sitelog_core::types::DbId;
use sitelog_db::models::item::{CreateItem, Item, ItemWithRate};
use sitelog_db::models::item_rate::{CreateItemRate, ItemRate};
use sitelog_db::repositories::{ItemRateRepo, ItemRepo, ProjectRepo};
use sqlx::PgPool;

use crate::error::AppResult;
use crate::service::access::{require_permission, require_role, DprPermission};

async fn find_item(pool: &PgPool, item_id: DbId) -> AppResult<Item> {
    ItemRepo::find_by_id(pool, item_id).await?.ok_or_else(|| {
        CoreError::NotFound {
            entity: "Item",
            id: item_id,
        }
        .into()
    })
}

/// Return the project's item called `name`, creating it if absent.
///
/// Callers need `can_create_dpr` or `can_edit_dpr`. An existing item with a
/// different unit is a conflict rather than a silent rename.
pub async fn find_or_create_item(
    pool: &PgPool,
    project_id: DbId,
    user_id: DbId,
    input: &CreateItem,
) -> AppResult<Item> {
    ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        })?;

    let role = require_role(pool, user_id, project_id).await?;
    if !(role.can_create_dpr || role.can_edit_dpr) {
        return Err(CoreError::Forbidden(format!(
            "Role '{}' cannot add items to project {project_id}",
            role.role_name
        ))
        .into());
    }

    let (name, unit) = normalize_item(&input.name, &input.unit)?;
    let item = ItemRepo::find_or_create(pool, project_id, name, unit).await?;
    if item.unit != unit {
        return Err(CoreError::Conflict(format!(
            "Item '{name}' already exists with unit '{}'",
            item.unit
        ))
        .into());
    }

    tracing::debug!(item_id = item.id, project_id, user_id, "Item resolved");
    Ok(item)
}

/// All items on a project, by name, each with its current rate.
pub async fn list_items(
    pool: &PgPool,
    project_id: DbId,
    user_id: DbId,
) -> AppResult<Vec<ItemWithRate>> {
    require_permission(pool, user_id, project_id, DprPermission::View).await?;
    Ok(ItemRepo::list_with_current_rate(pool, project_id).await?)
}

pub async fn get_item(pool: &PgPool, item_id: DbId, user_id: DbId) -> AppResult<Item> {
    let item = find_item(pool, item_id).await?;
    require_permission(pool, user_id, item.project_id, DprPermission::View).await?;
    Ok(item)
}

/// Append a rate version. Existing versions are never modified.
pub async fn append_rate(
    pool: &PgPool,
    item_id: DbId,
    user_id: DbId,
    input: &CreateItemRate,
) -> AppResult<ItemRate> {
    validate_rate(input.rate)?;
    if let Some(q) = input.quantity {
        validate_quantity(q)?;
    }

    let item = find_item(pool, item_id).await?;
    require_permission(pool, user_id, item.project_id, DprPermission::Edit).await?;

    let rate = ItemRateRepo::append(pool, item_id, input).await?;

    tracing::info!(
        item_id,
        rate_id = rate.id,
        rate = rate.rate,
        effective_from = %rate.effective_from,
        user_id,
        "Rate version appended"
    );
    Ok(rate)
}

/// Every version of an item's rate, oldest `effective_from` first.
pub async fn rate_history(pool: &PgPool, item_id: DbId, user_id: DbId) -> AppResult<Vec<ItemRate>> {
    let item = find_item(pool, item_id).await?;
    require_permission(pool, user_id, item.project_id, DprPermission::View).await?;
    Ok(ItemRateRepo::list_for_item(pool, item_id).await?)
}

/// The version new line items would be frozen to right now.
pub async fn latest_rate(pool: &PgPool, item_id: DbId, user_id: DbId) -> AppResult<ItemRate> {
    let item = find_item(pool, item_id).await?;
    require_permission(pool, user_id, item.project_id, DprPermission::View).await?;
    ItemRateRepo::latest_for_item(pool, item_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "ItemRate",
                id: item_id,
            }
            .into()
        })
}
