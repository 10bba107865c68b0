//! # Validation Module
//!
//! Input validation for seed configuration and front-panel input.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front panel (vendsim-cli)                                    │
//! │  ├── Command parsing, numeric formats                                  │
//! │  └── Immediate feedback                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Drink catalog rules (ids, names, prices)                          │
//! │  └── Simulation parameters (delays, failure rate)                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Types                                                        │
//! │  ├── Denomination (closed enum)                                        │
//! │  └── Money / counts (unsigned)                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;

/// Longest drink id accepted.
pub const MAX_DRINK_ID_LEN: usize = 32;

/// Longest drink name accepted.
pub const MAX_DRINK_NAME_LEN: usize = 64;

/// Largest single card top-up accepted (1,000,000원).
pub const MAX_RECHARGE_AMOUNT: u64 = 1_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a drink slot id.
///
/// ## Rules
/// - Must not be empty
/// - At most 32 characters
/// - Only letters, numbers, hyphens, underscores (it is typed on the panel)
///
/// ## Example
/// ```rust
/// use vendsim_core::validation::validate_drink_id;
///
/// assert!(validate_drink_id("cola").is_ok());
/// assert!(validate_drink_id("").is_err());
/// assert!(validate_drink_id("iced tea").is_err());
/// ```
pub fn validate_drink_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "drink id".to_string(),
        });
    }

    if id.len() > MAX_DRINK_ID_LEN {
        return Err(ValidationError::InvalidFormat {
            field: "drink id".to_string(),
            reason: format!("must be at most {} characters", MAX_DRINK_ID_LEN),
        });
    }

    if !id.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return Err(ValidationError::InvalidFormat {
            field: "drink id".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a drink display name.
pub fn validate_drink_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "drink name".to_string(),
        });
    }

    if name.chars().count() > MAX_DRINK_NAME_LEN {
        return Err(ValidationError::InvalidFormat {
            field: "drink name".to_string(),
            reason: format!("must be at most {} characters", MAX_DRINK_NAME_LEN),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a drink price. Free drinks are not a thing.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a card top-up amount.
///
/// ## Rules
/// - Must be positive
/// - At most `MAX_RECHARGE_AMOUNT`
pub fn validate_recharge_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "recharge amount".to_string(),
        });
    }

    if amount.amount() > MAX_RECHARGE_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: "recharge amount".to_string(),
            min: 1.0,
            max: MAX_RECHARGE_AMOUNT as f64,
        });
    }

    Ok(())
}

/// Validates the simulated card failure probability.
///
/// ## Rules
/// - Must be a finite number in `[0.0, 1.0]`
pub fn validate_failure_rate(rate: f64) -> ValidationResult<()> {
    if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
        return Err(ValidationError::OutOfRange {
            field: "card_failure_rate".to_string(),
            min: 0.0,
            max: 1.0,
        });
    }

    Ok(())
}

/// Validates a simulated delay in ticks.
pub fn validate_delay(field: &str, ticks: u64) -> ValidationResult<()> {
    if ticks == 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_drink_id() {
        assert!(validate_drink_id("cola").is_ok());
        assert!(validate_drink_id("iced-tea_2").is_ok());

        assert!(validate_drink_id("").is_err());
        assert!(validate_drink_id("   ").is_err());
        assert!(validate_drink_id("has space").is_err());
        assert!(validate_drink_id(&"a".repeat(40)).is_err());
    }

    #[test]
    fn test_validate_drink_name() {
        assert!(validate_drink_name("콜라").is_ok());
        assert!(validate_drink_name("").is_err());
        assert!(validate_drink_name(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::new(100)).is_ok());
        assert!(validate_price(Money::zero()).is_err());
    }

    #[test]
    fn test_validate_recharge_amount() {
        assert!(validate_recharge_amount(Money::new(1000)).is_ok());
        assert!(validate_recharge_amount(Money::zero()).is_err());
        assert!(validate_recharge_amount(Money::new(MAX_RECHARGE_AMOUNT)).is_ok());
        assert!(matches!(
            validate_recharge_amount(Money::new(MAX_RECHARGE_AMOUNT + 1)),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_recharge_amount(Money::new(u64::MAX)).is_err());
    }

    #[test]
    fn test_validate_failure_rate() {
        assert!(validate_failure_rate(0.0).is_ok());
        assert!(validate_failure_rate(0.15).is_ok());
        assert!(validate_failure_rate(1.0).is_ok());

        assert!(validate_failure_rate(-0.1).is_err());
        assert!(validate_failure_rate(1.5).is_err());
        assert!(validate_failure_rate(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_delay() {
        assert!(validate_delay("processing_delay", 2).is_ok());
        assert!(validate_delay("processing_delay", 0).is_err());
    }
}
