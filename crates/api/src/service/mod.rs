//! Operations behind the HTTP handlers.
//!
//! Handlers stay thin: they extract the caller and request body and call into
//! these functions, which own permission checks, validation, and transaction
//! boundaries.
//!
//! - [`access`] -- project role and DPR permission checks.
//! - [`entries`] -- rate resolution and wholesale line-item replacement.
//! - [`daily_report`] -- report create/read/update and the approval workflow.
//! - [`ledger`] -- item ledger and rate schedule.

pub mod access;
pub mod daily_report;
pub mod entries;
pub mod ledger;
