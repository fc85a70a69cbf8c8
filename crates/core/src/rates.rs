//! Rate resolution rules for line items.
//!
//! Every usage/plan entry is frozen to the rate version that was current when
//! it was written. A batch of items either resolves completely or not at all.

use std::collections::{HashMap, HashSet};

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum length of an item name.
pub const MAX_ITEM_NAME_LENGTH: usize = 200;

/// Maximum length of a unit label (e.g. `m3`, `bags`, `nos`).
pub const MAX_UNIT_LENGTH: usize = 32;

/// Maximum length of a line-item remark.
pub const MAX_REMARKS_LENGTH: usize = 2_000;

/// Deduplicate item ids, keeping first-occurrence order.
pub fn distinct_item_ids(ids: impl IntoIterator<Item = DbId>) -> Vec<DbId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Fail with a validation error naming the first requested item (in request
/// order) that has no resolved rate.
pub fn require_all_resolved(
    requested: &[DbId],
    resolved: &HashMap<DbId, DbId>,
) -> Result<(), CoreError> {
    match requested.iter().find(|id| !resolved.contains_key(id)) {
        Some(missing) => Err(CoreError::Validation(format!(
            "No rate defined for item {missing}"
        ))),
        None => Ok(()),
    }
}

pub fn validate_rate(rate: f64) -> Result<(), CoreError> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Rate must be a non-negative number (got {rate})"
        )))
    }
}

pub fn validate_quantity(quantity: f64) -> Result<(), CoreError> {
    if quantity.is_finite() && quantity >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Quantity must be a non-negative number (got {quantity})"
        )))
    }
}

pub fn validate_remarks(remarks: Option<&str>) -> Result<(), CoreError> {
    match remarks {
        Some(r) if r.len() > MAX_REMARKS_LENGTH => Err(CoreError::Validation(format!(
            "Remarks exceed maximum length of {MAX_REMARKS_LENGTH} characters"
        ))),
        _ => Ok(()),
    }
}

/// Validate an item name and unit, returning the trimmed values.
pub fn normalize_item<'a>(name: &'a str, unit: &'a str) -> Result<(&'a str, &'a str), CoreError> {
    let name = name.trim();
    let unit = unit.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Item name must not be empty".to_string()));
    }
    if name.len() > MAX_ITEM_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Item name exceeds maximum length of {MAX_ITEM_NAME_LENGTH} characters"
        )));
    }
    if unit.is_empty() {
        return Err(CoreError::Validation("Item unit must not be empty".to_string()));
    }
    if unit.len() > MAX_UNIT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Item unit exceeds maximum length of {MAX_UNIT_LENGTH} characters"
        )));
    }
    Ok((name, unit))
}

/// Cost of a line at its frozen rate.
pub fn line_amount(rate: f64, quantity: f64) -> f64 {
    rate * quantity
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn distinct_keeps_first_occurrence_order() {
        assert_eq!(distinct_item_ids([3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn all_resolved_passes() {
        let resolved = HashMap::from([(1, 10), (2, 20)]);
        assert!(require_all_resolved(&[1, 2], &resolved).is_ok());
    }

    #[test]
    fn first_missing_item_is_named() {
        let resolved = HashMap::from([(1, 10)]);
        let err = require_all_resolved(&[1, 7, 8], &resolved).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("item 7") && !msg.contains('8'));
    }

    #[test]
    fn empty_request_resolves_trivially() {
        assert!(require_all_resolved(&[], &HashMap::new()).is_ok());
    }

    #[test]
    fn negative_or_nan_numbers_rejected() {
        assert!(validate_rate(0.0).is_ok());
        assert!(validate_rate(-1.0).is_err());
        assert!(validate_rate(f64::NAN).is_err());
        assert!(validate_quantity(12.5).is_ok());
        assert!(validate_quantity(f64::INFINITY).is_err());
    }

    #[test]
    fn item_name_and_unit_are_trimmed() {
        assert_eq!(normalize_item("  Cement ", " bags").unwrap(), ("Cement", "bags"));
        assert!(normalize_item("   ", "bags").is_err());
        assert!(normalize_item("Cement", "").is_err());
    }

    #[test]
    fn overlong_remarks_rejected() {
        let long = "x".repeat(MAX_REMARKS_LENGTH + 1);
        assert!(validate_remarks(Some(&long)).is_err());
        assert!(validate_remarks(None).is_ok());
    }

    #[test]
    fn amount_is_rate_times_quantity() {
        assert_eq!(line_amount(250.0, 4.0), 1000.0);
    }
}
