//! Project role names and the per-project participant roster.
//!
//! Role assignments are owned by the project-membership service; this crate
//! only reads them. The names must match the values stored in
//! `project_members.role_name`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::DbId;

pub const ROLE_REPORTER: &str = "reporter";
pub const ROLE_APPROVER: &str = "approver";
pub const ROLE_FINAL_APPROVER: &str = "final_approver";
pub const ROLE_CLIENT: &str = "client";

/// Users holding each role on a project, keyed by role name.
///
/// Reporters and clients are genuinely multi-valued. Approver and final
/// approver are treated as singular: [`Roster::approver`] and
/// [`Roster::final_approver`] return the lowest user id when several users
/// hold the role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster(BTreeMap<String, Vec<DbId>>);

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `user_id` holds `role_name`. Keeps each list sorted and
    /// free of duplicates.
    pub fn add(&mut self, role_name: &str, user_id: DbId) {
        let users = self.0.entry(role_name.to_string()).or_default();
        if let Err(pos) = users.binary_search(&user_id) {
            users.insert(pos, user_id);
        }
    }

    /// All users holding `role_name`, ascending by id.
    pub fn holders(&self, role_name: &str) -> &[DbId] {
        self.0.get(role_name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn reporters(&self) -> &[DbId] {
        self.holders(ROLE_REPORTER)
    }

    pub fn approver(&self) -> Option<DbId> {
        self.holders(ROLE_APPROVER).first().copied()
    }

    pub fn final_approver(&self) -> Option<DbId> {
        self.holders(ROLE_FINAL_APPROVER).first().copied()
    }

    /// Whether a singular role has more than one holder configured.
    pub fn is_ambiguous(&self, role_name: &str) -> bool {
        self.holders(role_name).len() > 1
    }
}

impl FromIterator<(String, DbId)> for Roster {
    fn from_iter<I: IntoIterator<Item = (String, DbId)>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for (role_name, user_id) in iter {
            roster.add(&role_name, user_id);
        }
        roster
    }
}
