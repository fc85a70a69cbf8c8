//! Repository for the `items` table (project item ledger).

use sqlx::{PgConnection, PgPool};
use sitelog_core::types::DbId;

use crate::models::item::{Item, ItemWithRate};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, unit, created_at, updated_at";

/// Provides find-or-create and lookup operations for billable items.
pub struct ItemRepo;

impl ItemRepo {
    /// Return the item named `name` on the project, creating it with `unit`
    /// if it does not exist yet. An existing item keeps its stored unit.
    pub async fn find_or_create(
        pool: &PgPool,
        project_id: DbId,
        name: &str,
        unit: &str,
    ) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items (project_id, name, unit) VALUES ($1, $2, $3) \
             ON CONFLICT (project_id, name) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Item>(&query)
            .bind(project_id)
            .bind(name)
            .bind(unit)
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(item) => Ok(item),
            None => Self::find_by_name(pool, project_id, name)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    /// Find an item by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an item by its unique name within a project.
    pub async fn find_by_name(
        pool: &PgPool,
        project_id: DbId,
        name: &str,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE project_id = $1 AND name = $2");
        sqlx::query_as::<_, Item>(&query)
            .bind(project_id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List a project's items by name, each with its currently effective rate.
    pub async fn list_with_current_rate(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ItemWithRate>, sqlx::Error> {
        sqlx::query_as::<_, ItemWithRate>(
            "SELECT i.id, i.project_id, i.name, i.unit, \
                    r.id AS rate_id, r.rate, r.effective_from \
             FROM items i \
             LEFT JOIN LATERAL ( \
                SELECT id, rate, effective_from FROM item_rates \
                WHERE item_id = i.id AND effective_from <= NOW() \
                ORDER BY effective_from DESC, id DESC \
                LIMIT 1 \
             ) r ON TRUE \
             WHERE i.project_id = $1 \
             ORDER BY i.name",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Of `ids`, return those that belong to `project_id`.
    pub async fn ids_in_project(
        conn: &mut PgConnection,
        project_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM items WHERE project_id = $1 AND id = ANY($2)",
        )
        .bind(project_id)
        .bind(ids)
        .fetch_all(conn)
        .await
    }
}
