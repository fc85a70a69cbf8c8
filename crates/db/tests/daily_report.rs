//! Integration tests for daily reports, their line entries and role lookups.
//!
//! Exercises the conditional writes that keep a single active handler:
//! - `update_sections_as_handler` only matches the current handler
//! - `advance` only matches the expected status and handler
//! - line entries keep their frozen rate after a newer rate is appended

use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use sitelog_core::roles::{ROLE_APPROVER, ROLE_REPORTER};
use sitelog_core::sections::{LabourReport, ReportFooter, SiteCondition};
use sitelog_core::workflow::{ApprovalStamp, DprStatus, Transition};
use sitelog_db::models::daily_report::{NewDailyReport, UpdateDailyReport};
use sitelog_db::models::item_rate::CreateItemRate;
use sitelog_db::models::line_entry::{EntryKind, ResolvedLineItem};
use sitelog_db::models::project::CreateProject;
use sitelog_db::models::project_member::AssignRole;
use sitelog_db::models::user::CreateUser;
use sitelog_db::repositories::{
    DailyReportRepo, ItemRateRepo, ItemRepo, LineEntryRepo, ProjectMemberRepo, ProjectRepo,
    UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_project(pool: &PgPool) -> i64 {
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: "Riverside".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

fn new_report(project_id: i64, created_by: i64, day: u32) -> NewDailyReport {
    NewDailyReport {
        project_id,
        report_date: date(day),
        created_by,
        site_condition: SiteCondition::default(),
        labour_report: LabourReport::default(),
        report_footer: ReportFooter::default(),
        cumulative_manpower: Some(10),
    }
}

async fn insert_report(pool: &PgPool, input: &NewDailyReport) -> i64 {
    let mut conn = pool.acquire().await.unwrap();
    DailyReportRepo::create(&mut conn, input).await.unwrap().id
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_sets_creator_as_handler(pool: PgPool) {
    let user = new_user(&pool, "reporter").await;
    let project_id = new_project(&pool).await;

    let id = insert_report(&pool, &new_report(project_id, user, 1)).await;
    let report = DailyReportRepo::find_by_id(&pool, id).await.unwrap().unwrap();

    assert_eq!(report.status().unwrap(), DprStatus::InProgress);
    assert_eq!(report.current_handler, Some(user));
    assert_eq!(report.created_by, user);
    assert_eq!(report.approved_by, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_project_date_violates_unique(pool: PgPool) {
    let user = new_user(&pool, "reporter").await;
    let project_id = new_project(&pool).await;
    insert_report(&pool, &new_report(project_id, user, 1)).await;

    let mut conn = pool.acquire().await.unwrap();
    let err = DailyReportRepo::create(&mut conn, &new_report(project_id, user, 1))
        .await
        .unwrap_err();
    assert_matches!(
        &err,
        sqlx::Error::Database(db) if db.constraint() == Some("uq_daily_reports_project_date")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_by_project_newest_first_with_limit(pool: PgPool) {
    let user = new_user(&pool, "reporter").await;
    let project_id = new_project(&pool).await;
    for day in [3, 1, 5, 2] {
        insert_report(&pool, &new_report(project_id, user, day)).await;
    }

    let listed = DailyReportRepo::list_by_project(&pool, project_id, 3).await.unwrap();
    let dates: Vec<NaiveDate> = listed.iter().map(|r| r.report_date).collect();
    assert_eq!(dates, vec![date(5), date(3), date(2)]);

    let mut conn = pool.acquire().await.unwrap();
    let by_date = DailyReportRepo::find_by_project_date(&mut conn, project_id, date(2))
        .await
        .unwrap();
    assert!(by_date.is_some());
    let missing = DailyReportRepo::find_by_project_date(&mut conn, project_id, date(4))
        .await
        .unwrap();
    assert!(missing.is_none());
}

// ---------------------------------------------------------------------------
// Conditional writes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_sections_only_as_handler(pool: PgPool) {
    let owner = new_user(&pool, "reporter").await;
    let other = new_user(&pool, "intruder").await;
    let project_id = new_project(&pool).await;
    let id = insert_report(&pool, &new_report(project_id, owner, 1)).await;

    let patch = UpdateDailyReport {
        site_condition: Some(SiteCondition {
            is_rainy: false,
            ground_state: "dry".to_string(),
            rain_timing: vec![],
        }),
        cumulative_manpower: Some(42),
        ..Default::default()
    };

    let mut conn = pool.acquire().await.unwrap();
    let denied = DailyReportRepo::update_sections_as_handler(&mut conn, id, other, &patch)
        .await
        .unwrap();
    assert!(denied.is_none());

    let updated = DailyReportRepo::update_sections_as_handler(&mut conn, id, owner, &patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.site_condition.ground_state, "dry");
    assert_eq!(updated.cumulative_manpower, Some(42));
    // Untouched sections keep their stored value.
    assert_eq!(*updated.labour_report, LabourReport::default());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_advance_guards_status_and_handler(pool: PgPool) {
    let reporter = new_user(&pool, "reporter").await;
    let approver = new_user(&pool, "approver").await;
    let project_id = new_project(&pool).await;
    let id = insert_report(&pool, &new_report(project_id, reporter, 1)).await;

    let to_review = Transition {
        from: DprStatus::InProgress,
        to: DprStatus::UnderReview,
        next_handler: Some(approver),
        stamp: None,
    };

    // Wrong caller.
    assert!(DailyReportRepo::advance(&pool, id, approver, &to_review)
        .await
        .unwrap()
        .is_none());

    let advanced = DailyReportRepo::advance(&pool, id, reporter, &to_review)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(advanced.status().unwrap(), DprStatus::UnderReview);
    assert_eq!(advanced.current_handler, Some(approver));

    // Replaying the same transition no longer matches the stored status.
    assert!(DailyReportRepo::advance(&pool, id, reporter, &to_review)
        .await
        .unwrap()
        .is_none());

    let approve = Transition {
        from: DprStatus::UnderReview,
        to: DprStatus::Approved,
        next_handler: None,
        stamp: Some(ApprovalStamp::ApprovedBy),
    };
    let approved = DailyReportRepo::advance(&pool, id, approver, &approve)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(approved.status().unwrap(), DprStatus::Approved);
    assert_eq!(approved.current_handler, None);
    assert_eq!(approved.approved_by, Some(approver));
    assert_eq!(approved.final_approved_by, None);
}

// ---------------------------------------------------------------------------
// Line entries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_entries_keep_frozen_rate(pool: PgPool) {
    let user = new_user(&pool, "reporter").await;
    let project_id = new_project(&pool).await;
    let report_id = insert_report(&pool, &new_report(project_id, user, 1)).await;
    let item = ItemRepo::find_or_create(&pool, project_id, "Cement", "bags")
        .await
        .unwrap();
    let old_rate = ItemRateRepo::append(
        &pool,
        item.id,
        &CreateItemRate {
            rate: 400.0,
            effective_from: Some(Utc::now() - Duration::days(2)),
            quantity: None,
        },
    )
    .await
    .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    LineEntryRepo::insert_many(
        &mut conn,
        EntryKind::Usage,
        report_id,
        &[ResolvedLineItem {
            item_id: item.id,
            rate_id: old_rate.id,
            quantity: 12.0,
            remarks: Some("ground floor slab".to_string()),
        }],
    )
    .await
    .unwrap();
    drop(conn);

    ItemRateRepo::append(
        &pool,
        item.id,
        &CreateItemRate {
            rate: 450.0,
            effective_from: None,
            quantity: None,
        },
    )
    .await
    .unwrap();

    let entries = LineEntryRepo::list_for_report(&pool, EntryKind::Usage, report_id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].rate_id, old_rate.id);
    assert_eq!(entries[0].rate, 400.0);
    assert_eq!(entries[0].quantity, 12.0);
    assert_eq!(entries[0].remarks.as_deref(), Some("ground floor slab"));
    assert_eq!(entries[0].amount(), 4800.0);

    // Plan collection is independent.
    assert_eq!(
        LineEntryRepo::count_for_report(&pool, EntryKind::Plan, report_id)
            .await
            .unwrap(),
        0
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_for_report_clears_one_collection(pool: PgPool) {
    let user = new_user(&pool, "reporter").await;
    let project_id = new_project(&pool).await;
    let report_id = insert_report(&pool, &new_report(project_id, user, 1)).await;
    let item = ItemRepo::find_or_create(&pool, project_id, "Sand", "m3")
        .await
        .unwrap();
    let rate = ItemRateRepo::append(
        &pool,
        item.id,
        &CreateItemRate {
            rate: 900.0,
            effective_from: Some(Utc::now() - Duration::days(1)),
            quantity: None,
        },
    )
    .await
    .unwrap();

    let line = ResolvedLineItem {
        item_id: item.id,
        rate_id: rate.id,
        quantity: 2.0,
        remarks: None,
    };
    let mut conn = pool.acquire().await.unwrap();
    LineEntryRepo::insert_many(&mut conn, EntryKind::Usage, report_id, &[line.clone(), line.clone()])
        .await
        .unwrap();
    LineEntryRepo::insert_many(&mut conn, EntryKind::Plan, report_id, &[line])
        .await
        .unwrap();

    let removed = LineEntryRepo::delete_for_report(&mut conn, EntryKind::Usage, report_id)
        .await
        .unwrap();
    drop(conn);

    assert_eq!(removed, 2);
    assert_eq!(
        LineEntryRepo::count_for_report(&pool, EntryKind::Usage, report_id)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        LineEntryRepo::count_for_report(&pool, EntryKind::Plan, report_id)
            .await
            .unwrap(),
        1
    );
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_roles_and_participants(pool: PgPool) {
    let project_id = new_project(&pool).await;
    let reporter = new_user(&pool, "reporter").await;
    let approver_b = new_user(&pool, "approver_b").await;
    let approver_a = new_user(&pool, "approver_a").await;
    let outsider = new_user(&pool, "outsider").await;

    for (user_id, role) in [
        (reporter, ROLE_REPORTER),
        (approver_a, ROLE_APPROVER),
        (approver_b, ROLE_APPROVER),
    ] {
        ProjectMemberRepo::assign(
            &pool,
            &AssignRole {
                project_id,
                user_id,
                role_name: role.to_string(),
                can_create_dpr: role == ROLE_REPORTER,
                can_view_dpr: true,
                can_edit_dpr: true,
            },
        )
        .await
        .unwrap();
    }

    let role = ProjectMemberRepo::get_role(&pool, reporter, project_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(role.role_name, ROLE_REPORTER);
    assert!(role.can_create_dpr);

    assert!(ProjectMemberRepo::get_role(&pool, outsider, project_id)
        .await
        .unwrap()
        .is_none());

    let roster = ProjectMemberRepo::get_participants(&pool, project_id).await.unwrap();
    assert_eq!(roster.reporters(), &[reporter]);
    // approver_b was created first, so it has the lower id.
    assert_eq!(roster.holders(ROLE_APPROVER), &[approver_b, approver_a]);
    assert_eq!(roster.approver(), Some(approver_b));
    assert!(roster.is_ambiguous(ROLE_APPROVER));
    assert_eq!(roster.final_approver(), None);
}
