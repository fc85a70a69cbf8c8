//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the calling user from a JWT Bearer token.

pub mod auth;
