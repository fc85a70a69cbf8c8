//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` input DTOs where the API accepts writes

pub mod daily_report;
pub mod item;
pub mod item_rate;
pub mod line_entry;
pub mod project;
pub mod project_member;
pub mod user;
