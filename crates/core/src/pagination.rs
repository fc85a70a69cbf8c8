//! Limit clamping for list endpoints.

/// Default number of reports returned by a project listing.
pub const DEFAULT_REPORT_LIMIT: i64 = 20;

/// Hard ceiling on a single listing.
pub const MAX_REPORT_LIMIT: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}
