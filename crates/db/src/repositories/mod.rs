//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Reads take `&PgPool`; writes that must share a transaction with other
//! writes take `&mut PgConnection` (pass `&mut *tx`).

pub mod daily_report_repo;
pub mod item_rate_repo;
pub mod item_repo;
pub mod line_entry_repo;
pub mod project_member_repo;
pub mod project_repo;
pub mod user_repo;

pub use daily_report_repo::DailyReportRepo;
pub use item_rate_repo::ItemRateRepo;
pub use item_repo::ItemRepo;
pub use line_entry_repo::LineEntryRepo;
pub use project_member_repo::ProjectMemberRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;
