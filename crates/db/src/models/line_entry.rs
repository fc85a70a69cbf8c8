//! Usage ("today's progress") and plan ("tomorrow's plan") line items.
//!
//! Both collections share one row shape and live in separate tables.

use serde::{Deserialize, Serialize};
use sitelog_core::rates::line_amount;
use sitelog_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Which line-item collection of a report is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Usage,
    Plan,
}

impl EntryKind {
    pub fn table(self) -> &'static str {
        match self {
            EntryKind::Usage => "usage_entries",
            EntryKind::Plan => "plan_entries",
        }
    }
}

/// A raw entry row from `usage_entries` or `plan_entries`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LineEntry {
    pub id: DbId,
    pub report_id: DbId,
    pub item_id: DbId,
    pub rate_id: DbId,
    pub quantity: f64,
    pub remarks: Option<String>,
    pub created_at: Timestamp,
}

/// An entry joined with its item and frozen rate, as shown on a report.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LineEntryDetail {
    pub id: DbId,
    pub item_id: DbId,
    pub item_name: String,
    pub unit: String,
    pub rate_id: DbId,
    pub rate: f64,
    pub quantity: f64,
    pub remarks: Option<String>,
}

impl LineEntryDetail {
    pub fn amount(&self) -> f64 {
        line_amount(self.rate, self.quantity)
    }
}

/// One requested line item. The rate is resolved server-side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LineItemInput {
    pub item_id: DbId,
    pub quantity: f64,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// A line item with its rate already resolved, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLineItem {
    pub item_id: DbId,
    pub rate_id: DbId,
    pub quantity: f64,
    pub remarks: Option<String>,
}
