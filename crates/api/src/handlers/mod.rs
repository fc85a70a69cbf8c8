//! Request handlers.
//!
//! Handlers extract the caller, path and body, then delegate to [`crate::service`]
//! which owns permission checks and transactions. Responses use the
//! [`DataResponse`](crate::response::DataResponse) envelope.

pub mod daily_report;
pub mod item;
pub mod project;
