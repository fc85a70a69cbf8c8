//! Repository for `usage_entries` and `plan_entries`.
//!
//! A report's collection is only ever replaced wholesale: delete everything
//! for the report, then insert the new rows, inside the caller's transaction.

use sqlx::{PgConnection, PgPool};
use sitelog_core::types::DbId;

use crate::models::line_entry::{EntryKind, LineEntry, LineEntryDetail, ResolvedLineItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, report_id, item_id, rate_id, quantity, remarks, created_at";

pub struct LineEntryRepo;

impl LineEntryRepo {
    /// Insert one row per resolved item, returning them in input order.
    pub async fn insert_many(
        conn: &mut PgConnection,
        kind: EntryKind,
        report_id: DbId,
        items: &[ResolvedLineItem],
    ) -> Result<Vec<LineEntry>, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (report_id, item_id, rate_id, quantity, remarks) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}",
            kind.table()
        );

        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, LineEntry>(&query)
                .bind(report_id)
                .bind(item.item_id)
                .bind(item.rate_id)
                .bind(item.quantity)
                .bind(&item.remarks)
                .fetch_one(&mut *conn)
                .await?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// Delete every entry of `kind` for the report. Returns the number removed.
    pub async fn delete_for_report(
        conn: &mut PgConnection,
        kind: EntryKind,
        report_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE report_id = $1", kind.table());
        let result = sqlx::query(&query).bind(report_id).execute(conn).await?;
        Ok(result.rows_affected())
    }

    /// Entries of `kind` for the report joined with item and frozen rate,
    /// in insertion order.
    pub async fn list_for_report(
        pool: &PgPool,
        kind: EntryKind,
        report_id: DbId,
    ) -> Result<Vec<LineEntryDetail>, sqlx::Error> {
        let query = format!(
            "SELECT e.id, e.item_id, i.name AS item_name, i.unit, \
                    e.rate_id, r.rate, e.quantity, e.remarks \
             FROM {} e \
             JOIN items i ON i.id = e.item_id \
             JOIN item_rates r ON r.id = e.rate_id \
             WHERE e.report_id = $1 \
             ORDER BY e.id ASC",
            kind.table()
        );
        sqlx::query_as::<_, LineEntryDetail>(&query)
            .bind(report_id)
            .fetch_all(pool)
            .await
    }

    /// Number of entries of `kind` stored for the report.
    pub async fn count_for_report(
        pool: &PgPool,
        kind: EntryKind,
        report_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {} WHERE report_id = $1", kind.table());
        sqlx::query_scalar::<_, i64>(&query)
            .bind(report_id)
            .fetch_one(pool)
            .await
    }
}
