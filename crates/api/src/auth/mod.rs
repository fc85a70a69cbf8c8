//! Caller identity.
//!
//! Tokens are issued by the identity service; this crate only validates them.

pub mod jwt;
