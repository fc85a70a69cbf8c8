//! Structured sections of a daily progress report.
//!
//! Sections are stored as JSONB and always replaced wholesale on update;
//! there is no deep merge. Validation here runs before anything is written.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Upper bound on the cumulative manpower figure.
pub const MAX_CUMULATIVE_MANPOWER: i32 = 1_000_000;

/* --------------------------------------------------------------------------
Site condition
-------------------------------------------------------------------------- */

/// A rain interval during the working day, `HH:MM` 24-hour clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RainWindow {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteCondition {
    #[serde(default)]
    pub is_rainy: bool,
    /// Free-form ground state, e.g. `dry`, `slushy`, `waterlogged`.
    #[serde(default)]
    pub ground_state: String,
    #[serde(default)]
    pub rain_timing: Vec<RainWindow>,
}

fn parse_clock(value: &str) -> Result<NaiveTime, CoreError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| {
        CoreError::Validation(format!("Invalid time '{value}'. Expected HH:MM"))
    })
}

impl SiteCondition {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.is_rainy && !self.rain_timing.is_empty() {
            return Err(CoreError::Validation(
                "rain_timing must be empty when is_rainy is false".to_string(),
            ));
        }
        for window in &self.rain_timing {
            let from = parse_clock(&window.from)?;
            let to = parse_clock(&window.to)?;
            if from >= to {
                return Err(CoreError::Validation(format!(
                    "Rain window {}-{} must end after it starts",
                    window.from, window.to
                )));
            }
        }
        Ok(())
    }
}

/* --------------------------------------------------------------------------
Labour report
-------------------------------------------------------------------------- */

/// Headcounts supplied by one labour agency, keyed by labour type
/// (`mason`, `helper`, `carpenter`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgencyLabour {
    pub agency: String,
    #[serde(default)]
    pub counts: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabourReport {
    #[serde(default)]
    pub agencies: Vec<AgencyLabour>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl LabourReport {
    pub fn validate(&self) -> Result<(), CoreError> {
        for entry in &self.agencies {
            if entry.agency.trim().is_empty() {
                return Err(CoreError::Validation(
                    "Labour agency name must not be empty".to_string(),
                ));
            }
            if entry.counts.keys().any(|t| t.trim().is_empty()) {
                return Err(CoreError::Validation(format!(
                    "Labour type for agency '{}' must not be empty",
                    entry.agency
                )));
            }
        }
        Ok(())
    }

    /// Total heads across all agencies and labour types.
    pub fn total_headcount(&self) -> u64 {
        self.agencies
            .iter()
            .flat_map(|a| a.counts.values())
            .map(|&n| u64::from(n))
            .sum()
    }
}

/* --------------------------------------------------------------------------
Report footer
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteVisit {
    pub name: String,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFooter {
    /// Recipients the report is distributed to.
    #[serde(default)]
    pub distribute: Vec<String>,
    #[serde(default)]
    pub prepared_by: Option<String>,
    #[serde(default)]
    pub visit: Vec<SiteVisit>,
}

impl ReportFooter {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.visit.iter().any(|v| v.name.trim().is_empty()) {
            return Err(CoreError::Validation(
                "Visitor name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn validate_cumulative_manpower(value: i32) -> Result<(), CoreError> {
    if (0..=MAX_CUMULATIVE_MANPOWER).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "cumulative_manpower must be between 0 and {MAX_CUMULATIVE_MANPOWER} (got {value})"
        )))
    }
}
