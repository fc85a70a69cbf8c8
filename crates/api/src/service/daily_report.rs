//! Daily report lifecycle and approval workflow.

use sitelog_core::error::CoreError;
use sitelog_core::pagination::{clamp_limit, DEFAULT_REPORT_LIMIT, MAX_REPORT_LIMIT};
use sitelog_core::roles::{ROLE_APPROVER, ROLE_FINAL_APPROVER};
use sitelog_core::sections::{
    validate_cumulative_manpower, LabourReport, ReportFooter, SiteCondition,
};
use sitelog_core::types::{DbId, ReportDate};
use sitelog_core::workflow::{ensure_current_handler, plan_submit, DprStatus};
use sitelog_db::models::daily_report::{
    CreateDailyReport, DailyReport, DailyReportDetail, DailyReportSummary, NewDailyReport,
    SubmitOutcome, UpdateDailyReport,
};
use sitelog_db::models::line_entry::EntryKind;
use sitelog_db::repositories::{DailyReportRepo, LineEntryRepo, ProjectMemberRepo, ProjectRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::service::access::{require_permission, require_role, DprPermission};
use crate::service::entries;

const UNIQUE_PROJECT_DATE: &str = "uq_daily_reports_project_date";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_report(pool: &PgPool, report_id: DbId) -> AppResult<DailyReport> {
    DailyReportRepo::find_by_id(pool, report_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "DailyReport",
                id: report_id,
            }
            .into()
        })
}

fn report_status(report: &DailyReport) -> AppResult<DprStatus> {
    report.status().map_err(|e| {
        CoreError::Internal(format!("Report {} has unreadable status: {e}", report.id)).into()
    })
}

/// Attach both line-item collections to a report.
async fn load_detail(pool: &PgPool, report: DailyReport) -> AppResult<DailyReportDetail> {
    let today = LineEntryRepo::list_for_report(pool, EntryKind::Usage, report.id).await?;
    let tomorrow = LineEntryRepo::list_for_report(pool, EntryKind::Plan, report.id).await?;
    Ok(DailyReportDetail::new(report, today, tomorrow))
}

fn validate_sections(
    site_condition: Option<&SiteCondition>,
    labour_report: Option<&LabourReport>,
    report_footer: Option<&ReportFooter>,
    cumulative_manpower: Option<i32>,
) -> Result<(), CoreError> {
    if let Some(sc) = site_condition {
        sc.validate()?;
    }
    if let Some(lr) = labour_report {
        lr.validate()?;
    }
    if let Some(rf) = report_footer {
        rf.validate()?;
    }
    if let Some(n) = cumulative_manpower {
        validate_cumulative_manpower(n)?;
    }
    Ok(())
}

fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
            && db.constraint() == Some(constraint)
    )
}

fn duplicate_report(project_id: DbId, report_date: ReportDate) -> AppError {
    CoreError::Conflict(format!(
        "A daily report for project {project_id} on {report_date} already exists"
    ))
    .into()
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Create the report for `(project_id, report_date)`, handled by its creator.
///
/// Any `today_items` / `tomorrow_items` are resolved against current rates
/// and written in the same transaction as the report row.
pub async fn create_report(
    pool: &PgPool,
    project_id: DbId,
    user_id: DbId,
    input: CreateDailyReport,
) -> AppResult<DailyReportDetail> {
    ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        })?;
    require_permission(pool, user_id, project_id, DprPermission::Create).await?;

    validate_sections(
        Some(&input.site_condition),
        Some(&input.labour_report),
        Some(&input.report_footer),
        input.cumulative_manpower,
    )?;

    let mut tx = pool.begin().await?;

    if DailyReportRepo::find_by_project_date(&mut *tx, project_id, input.report_date)
        .await?
        .is_some()
    {
        return Err(duplicate_report(project_id, input.report_date));
    }

    let new_report = NewDailyReport {
        project_id,
        report_date: input.report_date,
        created_by: user_id,
        site_condition: input.site_condition,
        labour_report: input.labour_report,
        report_footer: input.report_footer,
        cumulative_manpower: input.cumulative_manpower,
    };
    let report = DailyReportRepo::create(&mut *tx, &new_report)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, UNIQUE_PROJECT_DATE) {
                duplicate_report(project_id, new_report.report_date)
            } else {
                e.into()
            }
        })?;

    if let Some(items) = &input.today_items {
        entries::insert_entries(&mut *tx, EntryKind::Usage, project_id, report.id, items).await?;
    }
    if let Some(items) = &input.tomorrow_items {
        entries::insert_entries(&mut *tx, EntryKind::Plan, project_id, report.id, items).await?;
    }

    tx.commit().await?;

    tracing::info!(
        report_id = report.id,
        project_id,
        report_date = %report.report_date,
        user_id,
        "Daily report created"
    );

    load_detail(pool, report).await
}

/// Read a report with its line items.
pub async fn get_report(
    pool: &PgPool,
    report_id: DbId,
    user_id: DbId,
) -> AppResult<DailyReportDetail> {
    let report = find_report(pool, report_id).await?;
    require_permission(pool, user_id, report.project_id, DprPermission::View).await?;
    load_detail(pool, report).await
}

/// Read a report by its natural key.
pub async fn get_report_by_date(
    pool: &PgPool,
    project_id: DbId,
    report_date: ReportDate,
    user_id: DbId,
) -> AppResult<DailyReportDetail> {
    require_permission(pool, user_id, project_id, DprPermission::View).await?;

    let report = {
        let mut conn = pool.acquire().await?;
        DailyReportRepo::find_by_project_date(&mut *conn, project_id, report_date).await?
    };
    let report = report.ok_or_else(|| {
        AppError::NotFound(format!(
            "No daily report for project {project_id} on {report_date}"
        ))
    })?;

    load_detail(pool, report).await
}

/// Most recent reports for a project, newest date first.
pub async fn list_reports(
    pool: &PgPool,
    project_id: DbId,
    user_id: DbId,
    limit: Option<i64>,
) -> AppResult<Vec<DailyReportSummary>> {
    require_permission(pool, user_id, project_id, DprPermission::View).await?;
    let limit = clamp_limit(limit, DEFAULT_REPORT_LIMIT, MAX_REPORT_LIMIT);
    Ok(DailyReportRepo::list_by_project(pool, project_id, limit).await?)
}

/// Apply a sparse patch as the report's current handler.
///
/// Sections present in `input` replace the stored ones; present item arrays
/// replace their whole collection. The handler guard and all writes share
/// one transaction.
pub async fn update_report(
    pool: &PgPool,
    report_id: DbId,
    user_id: DbId,
    input: UpdateDailyReport,
) -> AppResult<DailyReportDetail> {
    if input.is_empty() {
        return Err(CoreError::Validation(
            "Update must include at least one of: site_condition, labour_report, \
             cumulative_manpower, report_footer, today_items, tomorrow_items"
                .to_string(),
        )
        .into());
    }

    let report = find_report(pool, report_id).await?;
    require_permission(pool, user_id, report.project_id, DprPermission::Edit).await?;
    ensure_current_handler(report.current_handler, user_id)?;

    validate_sections(
        input.site_condition.as_ref(),
        input.labour_report.as_ref(),
        input.report_footer.as_ref(),
        input.cumulative_manpower,
    )?;

    let mut tx = pool.begin().await?;

    let updated = DailyReportRepo::update_sections_as_handler(&mut *tx, report_id, user_id, &input)
        .await?
        .ok_or_else(|| {
            CoreError::Forbidden(
                "Report was handed to another user before this edit was applied".to_string(),
            )
        })?;

    if let Some(items) = &input.today_items {
        entries::replace_entries(&mut *tx, EntryKind::Usage, updated.project_id, report_id, items)
            .await?;
    }
    if let Some(items) = &input.tomorrow_items {
        entries::replace_entries(&mut *tx, EntryKind::Plan, updated.project_id, report_id, items)
            .await?;
    }

    tx.commit().await?;

    tracing::info!(report_id, user_id, "Daily report updated");

    load_detail(pool, updated).await
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// Advance a report one stage as its current handler.
pub async fn submit_report(
    pool: &PgPool,
    report_id: DbId,
    user_id: DbId,
) -> AppResult<SubmitOutcome> {
    let report = find_report(pool, report_id).await?;
    let status = report_status(&report)?;
    if status.is_terminal() {
        return Err(CoreError::InvalidState(format!(
            "Report {report_id} is already approved"
        ))
        .into());
    }
    ensure_current_handler(report.current_handler, user_id)?;

    let role = require_role(pool, user_id, report.project_id).await?;
    let roster = ProjectMemberRepo::get_participants(pool, report.project_id).await?;
    for singular in [ROLE_APPROVER, ROLE_FINAL_APPROVER] {
        if roster.is_ambiguous(singular) {
            tracing::warn!(
                project_id = report.project_id,
                role = singular,
                holders = ?roster.holders(singular),
                "Multiple holders of a singular role; routing to the lowest user id"
            );
        }
    }

    let transition = plan_submit(status, &role.role_name, &roster)?;

    DailyReportRepo::advance(pool, report_id, user_id, &transition)
        .await?
        .ok_or_else(|| {
            CoreError::Conflict(format!(
                "Report {report_id} changed while it was being submitted"
            ))
        })?;

    tracing::info!(
        report_id,
        user_id,
        from = %transition.from,
        to = %transition.to,
        next_handler = ?transition.next_handler,
        "Daily report advanced"
    );

    Ok(SubmitOutcome {
        new_status: transition.to,
        next_handler: transition.next_handler,
    })
}
