//! Daily progress report models and DTOs.

use serde::{Deserialize, Serialize};
use sitelog_core::error::CoreError;
use sitelog_core::sections::{LabourReport, ReportFooter, SiteCondition};
use sitelog_core::types::{DbId, ReportDate, Timestamp};
use sitelog_core::workflow::DprStatus;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::line_entry::{LineEntryDetail, LineItemInput};

/// A report row from the `daily_reports` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyReport {
    pub id: DbId,
    pub project_id: DbId,
    pub report_date: ReportDate,
    pub site_condition: Json<SiteCondition>,
    pub labour_report: Json<LabourReport>,
    pub report_footer: Json<ReportFooter>,
    pub cumulative_manpower: Option<i32>,
    pub dpr_status: String,
    pub current_handler: Option<DbId>,
    pub created_by: DbId,
    pub approved_by: Option<DbId>,
    pub final_approved_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DailyReport {
    pub fn status(&self) -> Result<DprStatus, CoreError> {
        self.dpr_status.parse()
    }
}

/// Listing row: workflow state without section payloads.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyReportSummary {
    pub id: DbId,
    pub project_id: DbId,
    pub report_date: ReportDate,
    pub dpr_status: String,
    pub current_handler: Option<DbId>,
    pub created_by: DbId,
    pub cumulative_manpower: Option<i32>,
    pub updated_at: Timestamp,
}

/// Request body for creating a report. Sections default to empty.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDailyReport {
    pub report_date: ReportDate,
    #[serde(default)]
    pub site_condition: SiteCondition,
    #[serde(default)]
    pub labour_report: LabourReport,
    #[serde(default)]
    pub report_footer: ReportFooter,
    pub cumulative_manpower: Option<i32>,
    pub today_items: Option<Vec<LineItemInput>>,
    pub tomorrow_items: Option<Vec<LineItemInput>>,
}

/// Sparse update. Each present section replaces the stored one wholesale.
/// A present item array (even empty) replaces that whole collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDailyReport {
    pub site_condition: Option<SiteCondition>,
    pub labour_report: Option<LabourReport>,
    pub report_footer: Option<ReportFooter>,
    pub cumulative_manpower: Option<i32>,
    pub today_items: Option<Vec<LineItemInput>>,
    pub tomorrow_items: Option<Vec<LineItemInput>>,
}

impl UpdateDailyReport {
    /// True when no recognised field was supplied.
    pub fn is_empty(&self) -> bool {
        self.site_condition.is_none()
            && self.labour_report.is_none()
            && self.report_footer.is_none()
            && self.cumulative_manpower.is_none()
            && self.today_items.is_none()
            && self.tomorrow_items.is_none()
    }
}

/// Values written on insert; workflow fields are derived from `created_by`.
#[derive(Debug, Clone)]
pub struct NewDailyReport {
    pub project_id: DbId,
    pub report_date: ReportDate,
    pub created_by: DbId,
    pub site_condition: SiteCondition,
    pub labour_report: LabourReport,
    pub report_footer: ReportFooter,
    pub cumulative_manpower: Option<i32>,
}

/// Full read model: the report plus both line-item collections projected
/// from the normalized entry tables.
#[derive(Debug, Clone, Serialize)]
pub struct DailyReportDetail {
    #[serde(flatten)]
    pub report: DailyReport,
    pub today: Vec<LineEntryDetail>,
    pub tomorrow: Vec<LineEntryDetail>,
    pub today_total: f64,
    pub tomorrow_total: f64,
    pub labour_headcount: u64,
}

impl DailyReportDetail {
    pub fn new(
        report: DailyReport,
        today: Vec<LineEntryDetail>,
        tomorrow: Vec<LineEntryDetail>,
    ) -> Self {
        let today_total = today.iter().map(LineEntryDetail::amount).sum();
        let tomorrow_total = tomorrow.iter().map(LineEntryDetail::amount).sum();
        let labour_headcount = report.labour_report.total_headcount();
        Self {
            report,
            today,
            tomorrow,
            today_total,
            tomorrow_total,
            labour_headcount,
        }
    }
}

/// Result of a workflow submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    pub new_status: DprStatus,
    pub next_handler: Option<DbId>,
}
