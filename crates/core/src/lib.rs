//! Domain types and rules for daily progress reports.
//!
//! Everything here is pure: no I/O, no database types. The `db` and `api`
//! crates build on these definitions.

pub mod error;
pub mod pagination;
pub mod rates;
pub mod roles;
pub mod sections;
pub mod types;
pub mod workflow;
