//! Validation utilities for the Hydroponic Greenhouse Management dashboard
//!
//! Checks run in the browser (through WASM) and the CLI client before a
//! request reaches the greenhouse API, which remains the final authority.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::models::{HarvestStatus, StageDefinition};

/// Upper bound for a single stage: one year
pub const MAX_STAGE_DURATION_HOURS: i64 = 24 * 366;

// ============================================================================
// Harvest Validations
// ============================================================================

/// Validate a harvest lifecycle transition.
///
/// Active and paused harvests may swap freely or be finalized; a finished
/// harvest is terminal.
pub fn validate_status_transition(
    from: HarvestStatus,
    to: HarvestStatus,
) -> Result<(), &'static str> {
    use HarvestStatus::*;

    match (from, to) {
        (Finished, _) => Err("A finished harvest cannot change status"),
        (a, b) if a == b => Err("Harvest already has this status"),
        (Active, Paused) | (Paused, Active) | (Active, Finished) | (Paused, Finished) => Ok(()),
        _ => Err("Invalid harvest status transition"),
    }
}

/// Check if a transition is allowed
pub fn can_transition(from: HarvestStatus, to: HarvestStatus) -> bool {
    validate_status_transition(from, to).is_ok()
}

// ============================================================================
// Stage Catalog Validations
// ============================================================================

/// Validate a planned stage duration entered in the catalog form
pub fn validate_duration_hours(hours: Decimal) -> Result<(), &'static str> {
    if hours < Decimal::ZERO {
        return Err("Stage duration cannot be negative");
    }
    if hours > Decimal::from(MAX_STAGE_DURATION_HOURS) {
        return Err("Stage duration cannot exceed one year");
    }
    Ok(())
}

/// Validate that every stage has a distinct order.
///
/// Projection still works with duplicates (ties keep fetch order), so the UI
/// shows this as a warning.
pub fn validate_stage_catalog(stages: &[StageDefinition]) -> Result<(), &'static str> {
    let mut seen = HashSet::new();
    for stage in stages {
        let Some(order) = stage.order_index else {
            return Err("Every stage needs an order");
        };
        if !seen.insert(order) {
            return Err("Stage orders must be unique");
        }
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Passwords are checked by the API; the login form only rejects empty input
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.is_empty() {
        return Err("Password is required");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use HarvestStatus::*;

    // ========================================================================
    // Harvest Validation Tests
    // ========================================================================

    #[test]
    fn test_valid_transitions() {
        assert!(validate_status_transition(Active, Paused).is_ok());
        assert!(validate_status_transition(Paused, Active).is_ok());
        assert!(validate_status_transition(Active, Finished).is_ok());
        assert!(validate_status_transition(Paused, Finished).is_ok());
    }

    #[test]
    fn test_finished_is_terminal() {
        assert!(validate_status_transition(Finished, Active).is_err());
        assert!(validate_status_transition(Finished, Paused).is_err());
        assert!(validate_status_transition(Finished, Finished).is_err());
    }

    #[test]
    fn test_same_status_rejected() {
        assert!(!can_transition(Active, Active));
        assert!(!can_transition(Paused, Paused));
    }

    // ========================================================================
    // Stage Catalog Validation Tests
    // ========================================================================

    #[test]
    fn test_duration_hours() {
        assert!(validate_duration_hours(Decimal::ZERO).is_ok());
        assert!(validate_duration_hours(Decimal::from(72)).is_ok());
        assert!(validate_duration_hours(Decimal::from(-1)).is_err());
        assert!(validate_duration_hours(Decimal::from(24 * 400)).is_err());
    }

    #[test]
    fn test_stage_catalog_unique_orders() {
        let stages = vec![
            StageDefinition::new("Germinación", 1, Decimal::from(24)),
            StageDefinition::new("Vegetativa", 2, Decimal::from(48)),
        ];
        assert!(validate_stage_catalog(&stages).is_ok());
        assert!(validate_stage_catalog(&[]).is_ok());
    }

    #[test]
    fn test_stage_catalog_duplicates() {
        let stages = vec![
            StageDefinition::new("Germinación", 1, Decimal::from(24)),
            StageDefinition::new("Enraizamiento", 1, Decimal::from(12)),
        ];
        assert_eq!(
            validate_stage_catalog(&stages),
            Err("Stage orders must be unique")
        );

        let mut unordered = StageDefinition::new("Floración", 0, Decimal::from(12));
        unordered.order_index = None;
        assert!(validate_stage_catalog(&[unordered]).is_err());
    }

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_email() {
        assert!(validate_email("admin@invernadero.com").is_ok());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@domain").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secreto").is_ok());
        assert!(validate_password("").is_err());
    }
}
