//! Repository for the `item_rates` table.
//!
//! Rate versions are append-only: this repository has no update or delete.
//! The current rate of an item is the version with the greatest
//! `effective_from` that is not in the future (ties go to the newest row).

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use sitelog_core::types::DbId;

use crate::models::item_rate::{CreateItemRate, ItemRate};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, item_id, rate, effective_from, quantity, created_at";

pub struct ItemRateRepo;

impl ItemRateRepo {
    /// Append a new rate version. `effective_from` defaults to `NOW()`.
    pub async fn append(
        pool: &PgPool,
        item_id: DbId,
        input: &CreateItemRate,
    ) -> Result<ItemRate, sqlx::Error> {
        let query = format!(
            "INSERT INTO item_rates (item_id, rate, effective_from, quantity) \
             VALUES ($1, $2, COALESCE($3, NOW()), $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemRate>(&query)
            .bind(item_id)
            .bind(input.rate)
            .bind(input.effective_from)
            .bind(input.quantity)
            .fetch_one(pool)
            .await
    }

    /// Full history for an item, oldest `effective_from` first.
    pub async fn list_for_item(pool: &PgPool, item_id: DbId) -> Result<Vec<ItemRate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM item_rates WHERE item_id = $1 \
             ORDER BY effective_from ASC, id ASC"
        );
        sqlx::query_as::<_, ItemRate>(&query)
            .bind(item_id)
            .fetch_all(pool)
            .await
    }

    /// The version currently in effect for an item.
    pub async fn latest_for_item(
        pool: &PgPool,
        item_id: DbId,
    ) -> Result<Option<ItemRate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM item_rates \
             WHERE item_id = $1 AND effective_from <= NOW() \
             ORDER BY effective_from DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, ItemRate>(&query)
            .bind(item_id)
            .fetch_optional(pool)
            .await
    }

    /// Current rate id for each of `item_ids` that has one.
    ///
    /// Items without an effective rate are simply absent from the map; the
    /// caller decides whether a partial result is acceptable.
    pub async fn latest_ids_for_items(
        conn: &mut PgConnection,
        item_ids: &[DbId],
    ) -> Result<HashMap<DbId, DbId>, sqlx::Error> {
        let rows: Vec<(DbId, DbId)> = sqlx::query_as(
            "SELECT DISTINCT ON (item_id) item_id, id FROM item_rates \
             WHERE item_id = ANY($1) AND effective_from <= NOW() \
             ORDER BY item_id, effective_from DESC, id DESC",
        )
        .bind(item_ids)
        .fetch_all(conn)
        .await?;
        Ok(rows.into_iter().collect())
    }
}
