//! Repository for the `daily_reports` table.
//!
//! Workflow writes are conditional: they only touch the row while the caller
//! is still its current handler (and, for transitions, while the status is
//! the one the caller saw). A `None` result means the guard did not match.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use sitelog_core::types::{DbId, ReportDate};
use sitelog_core::workflow::{ApprovalStamp, DprStatus, Transition};

use crate::models::daily_report::{
    DailyReport, DailyReportSummary, NewDailyReport, UpdateDailyReport,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, report_date, site_condition, labour_report, \
    report_footer, cumulative_manpower, dpr_status, current_handler, created_by, \
    approved_by, final_approved_by, created_at, updated_at";

pub struct DailyReportRepo;

impl DailyReportRepo {
    /// Insert a report in `in_progress`, handled by its creator.
    pub async fn create(
        conn: &mut PgConnection,
        input: &NewDailyReport,
    ) -> Result<DailyReport, sqlx::Error> {
        let query = format!(
            "INSERT INTO daily_reports \
                (project_id, report_date, site_condition, labour_report, report_footer, \
                 cumulative_manpower, dpr_status, current_handler, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DailyReport>(&query)
            .bind(input.project_id)
            .bind(input.report_date)
            .bind(Json(&input.site_condition))
            .bind(Json(&input.labour_report))
            .bind(Json(&input.report_footer))
            .bind(input.cumulative_manpower)
            .bind(DprStatus::InProgress.as_str())
            .bind(input.created_by)
            .fetch_one(conn)
            .await
    }

    /// Find a report by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DailyReport>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM daily_reports WHERE id = $1");
        sqlx::query_as::<_, DailyReport>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the report for a project on a given date.
    pub async fn find_by_project_date(
        conn: &mut PgConnection,
        project_id: DbId,
        report_date: ReportDate,
    ) -> Result<Option<DailyReport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM daily_reports WHERE project_id = $1 AND report_date = $2"
        );
        sqlx::query_as::<_, DailyReport>(&query)
            .bind(project_id)
            .bind(report_date)
            .fetch_optional(conn)
            .await
    }

    /// Most recent reports for a project, newest `report_date` first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        limit: i64,
    ) -> Result<Vec<DailyReportSummary>, sqlx::Error> {
        sqlx::query_as::<_, DailyReportSummary>(
            "SELECT id, project_id, report_date, dpr_status, current_handler, created_by, \
                    cumulative_manpower, updated_at \
             FROM daily_reports WHERE project_id = $1 \
             ORDER BY report_date DESC \
             LIMIT $2",
        )
        .bind(project_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Apply a sparse section patch while `handler` is the current handler.
    ///
    /// Supplied sections replace the stored JSON wholesale. Always bumps
    /// `updated_at`, so a patch carrying only item arrays still asserts the
    /// handler guard. Returns `None` if the guard did not match.
    pub async fn update_sections_as_handler(
        conn: &mut PgConnection,
        id: DbId,
        handler: DbId,
        input: &UpdateDailyReport,
    ) -> Result<Option<DailyReport>, sqlx::Error> {
        let query = format!(
            "UPDATE daily_reports SET \
                site_condition = COALESCE($3, site_condition), \
                labour_report = COALESCE($4, labour_report), \
                report_footer = COALESCE($5, report_footer), \
                cumulative_manpower = COALESCE($6, cumulative_manpower), \
                updated_at = NOW() \
             WHERE id = $1 AND current_handler = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DailyReport>(&query)
            .bind(id)
            .bind(handler)
            .bind(input.site_condition.as_ref().map(Json))
            .bind(input.labour_report.as_ref().map(Json))
            .bind(input.report_footer.as_ref().map(Json))
            .bind(input.cumulative_manpower)
            .fetch_optional(conn)
            .await
    }

    /// Persist a workflow transition in one conditional write.
    ///
    /// Matches only while `caller` is the current handler and the status is
    /// still `transition.from`. Sets status, next handler and the stamped
    /// approver column together. Returns `None` if the guard did not match.
    pub async fn advance(
        pool: &PgPool,
        id: DbId,
        caller: DbId,
        transition: &Transition,
    ) -> Result<Option<DailyReport>, sqlx::Error> {
        let query = format!(
            "UPDATE daily_reports SET \
                dpr_status = $4, \
                current_handler = $5, \
                approved_by = CASE WHEN $6 THEN $3 ELSE approved_by END, \
                final_approved_by = CASE WHEN $7 THEN $3 ELSE final_approved_by END \
             WHERE id = $1 AND dpr_status = $2 AND current_handler = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DailyReport>(&query)
            .bind(id)
            .bind(transition.from.as_str())
            .bind(caller)
            .bind(transition.to.as_str())
            .bind(transition.next_handler)
            .bind(transition.stamp == Some(ApprovalStamp::ApprovedBy))
            .bind(transition.stamp == Some(ApprovalStamp::FinalApprovedBy))
            .fetch_optional(pool)
            .await
    }
}
