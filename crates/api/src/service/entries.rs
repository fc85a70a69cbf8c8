//! Usage/plan line items: rate resolution and wholesale replacement.
//!
//! Every function here takes the caller's connection so it runs inside the
//! caller's transaction. A resolution failure returns before anything is
//! deleted, and dropping the uncommitted transaction discards the rest.

use std::collections::HashSet;

use sitelog_core::error::CoreError;
use sitelog_core::rates::{
    distinct_item_ids, require_all_resolved, validate_quantity, validate_remarks,
};
use sitelog_core::types::DbId;
use sitelog_db::models::line_entry::{EntryKind, LineEntry, LineItemInput, ResolvedLineItem};
use sitelog_db::repositories::{ItemRateRepo, ItemRepo, LineEntryRepo};
use sqlx::PgConnection;

use crate::error::AppResult;

/// Validate `items` and freeze each to its item's current rate version.
///
/// All-or-nothing: fails with a validation error naming the first item (in
/// request order) that is not on the project or has no effective rate.
pub async fn resolve_items(
    conn: &mut PgConnection,
    project_id: DbId,
    items: &[LineItemInput],
) -> AppResult<Vec<ResolvedLineItem>> {
    for item in items {
        validate_quantity(item.quantity)?;
        validate_remarks(item.remarks.as_deref())?;
    }

    let requested = distinct_item_ids(items.iter().map(|i| i.item_id));
    if requested.is_empty() {
        return Ok(Vec::new());
    }

    let known: HashSet<DbId> = ItemRepo::ids_in_project(&mut *conn, project_id, &requested)
        .await?
        .into_iter()
        .collect();
    if let Some(foreign) = requested.iter().find(|id| !known.contains(id)) {
        return Err(CoreError::Validation(format!(
            "Item {foreign} does not belong to project {project_id}"
        ))
        .into());
    }

    let rates = ItemRateRepo::latest_ids_for_items(&mut *conn, &requested).await?;
    require_all_resolved(&requested, &rates)?;

    items
        .iter()
        .map(|item| -> AppResult<ResolvedLineItem> {
            let rate_id = rates.get(&item.item_id).copied().ok_or_else(|| {
                CoreError::Internal(format!("Rate for item {} vanished", item.item_id))
            })?;
            Ok(ResolvedLineItem {
                item_id: item.item_id,
                rate_id,
                quantity: item.quantity,
                remarks: item.remarks.clone(),
            })
        })
        .collect()
}

/// Resolve rates for `items` and append one entry per item.
pub async fn insert_entries(
    conn: &mut PgConnection,
    kind: EntryKind,
    project_id: DbId,
    report_id: DbId,
    items: &[LineItemInput],
) -> AppResult<Vec<LineEntry>> {
    let resolved = resolve_items(&mut *conn, project_id, items).await?;
    Ok(LineEntryRepo::insert_many(conn, kind, report_id, &resolved).await?)
}

/// Replace the whole `kind` collection of a report with `items`.
///
/// An empty `items` clears the collection. Rates are resolved before the
/// delete so a failed resolution leaves the stored rows untouched even
/// within the transaction.
pub async fn replace_entries(
    conn: &mut PgConnection,
    kind: EntryKind,
    project_id: DbId,
    report_id: DbId,
    items: &[LineItemInput],
) -> AppResult<Vec<LineEntry>> {
    let resolved = resolve_items(&mut *conn, project_id, items).await?;
    let removed = LineEntryRepo::delete_for_report(&mut *conn, kind, report_id).await?;
    let inserted = LineEntryRepo::insert_many(conn, kind, report_id, &resolved).await?;

    tracing::debug!(
        report_id,
        kind = ?kind,
        removed,
        inserted = inserted.len(),
        "Replaced report line items"
    );
    Ok(inserted)
}
