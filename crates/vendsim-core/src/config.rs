//! # Seed Configuration
//!
//! The machine's starting state and simulation parameters, injected from
//! outside. The front panel loads it from TOML; tests build it in code.
//!
//! ## Example (TOML)
//! ```toml
//! card_balance = 5000
//! card_failure_rate = 0.15
//!
//! [[drinks]]
//! id = "cola"
//! name = "Cola"
//! price = 1100
//! stock = 5
//!
//! [cash_inventory]
//! 10000 = 2
//! 1000 = 10
//! 100 = 20
//!
//! [timing]
//! processing_delay = 2
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::denomination::Denomination;
use crate::error::{ValidationError, ValidationResult};
use crate::ledger::CashInventory;
use crate::money::Money;
use crate::types::{Drink, MachineState};
use crate::validation::{
    validate_delay, validate_drink_id, validate_drink_name, validate_failure_rate, validate_price,
};

/// Chance the simulated card network declines a payment.
pub const DEFAULT_CARD_FAILURE_RATE: f64 = 0.15;

// =============================================================================
// Timing
// =============================================================================

/// Delays, in simulation ticks, for every timed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Cash purchase: `processing` → dispense.
    pub processing_delay: u64,

    /// Card purchase: `processing` → network outcome.
    pub card_delay: u64,

    /// `complete` → `idle`.
    pub complete_reset_delay: u64,

    /// `error` → `payment`/`idle`.
    pub error_clear_delay: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            processing_delay: 2,
            card_delay: 3,
            complete_reset_delay: 3,
            error_clear_delay: 3,
        }
    }
}

impl Timing {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_delay("processing_delay", self.processing_delay)?;
        validate_delay("card_delay", self.card_delay)?;
        validate_delay("complete_reset_delay", self.complete_reset_delay)?;
        validate_delay("error_clear_delay", self.error_clear_delay)?;
        Ok(())
    }
}

// =============================================================================
// Machine Config
// =============================================================================

/// Everything needed to start a machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Drink catalog, in panel order.
    pub drinks: Vec<Drink>,

    /// Starting cash box contents.
    pub cash_inventory: CashInventory,

    /// Starting stored-value card balance.
    pub card_balance: Money,

    /// Probability in `[0, 1]` that a card payment is declined.
    pub card_failure_rate: f64,

    pub timing: Timing,
}

impl Default for MachineConfig {
    /// Factory stock: three drinks, a float of change, and 5,000 on the card.
    fn default() -> Self {
        MachineConfig {
            drinks: vec![
                Drink::new("cola", "Cola", 1100, 5),
                Drink::new("water", "Water", 600, 3),
                Drink::new("coffee", "Coffee", 700, 4),
            ],
            cash_inventory: CashInventory::new()
                .with(Denomination::Note10000, 2)
                .with(Denomination::Note5000, 3)
                .with(Denomination::Note1000, 10)
                .with(Denomination::Coin500, 15)
                .with(Denomination::Coin100, 20),
            card_balance: Money::new(5000),
            card_failure_rate: DEFAULT_CARD_FAILURE_RATE,
            timing: Timing::default(),
        }
    }
}

impl MachineConfig {
    /// Checks the catalog and simulation parameters.
    ///
    /// ## Rules
    /// - At least one drink
    /// - Drink ids valid and unique
    /// - Names non-empty, prices positive
    /// - Failure rate in `[0, 1]`, delays positive
    pub fn validate(&self) -> ValidationResult<()> {
        if self.drinks.is_empty() {
            return Err(ValidationError::Required {
                field: "drinks".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for drink in &self.drinks {
            validate_drink_id(&drink.id)?;
            validate_drink_name(&drink.name)?;
            validate_price(drink.price)?;

            if !seen.insert(drink.id.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "drink id".to_string(),
                    value: drink.id.clone(),
                });
            }
        }

        validate_failure_rate(self.card_failure_rate)?;
        self.timing.validate()?;

        Ok(())
    }

    /// Validates and builds the initial machine state.
    pub fn initial_state(&self) -> ValidationResult<MachineState> {
        self.validate()?;
        Ok(MachineState::new(
            self.drinks.clone(),
            self.cash_inventory.clone(),
            self.card_balance,
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionStatus;

    #[test]
    fn test_default_config_is_valid() {
        let config = MachineConfig::default();
        assert!(config.validate().is_ok());

        let state = config.initial_state().unwrap();
        assert_eq!(state.drinks.len(), 3);
        assert_eq!(state.card_balance, Money::new(5000));
        assert_eq!(state.cash_inventory.count(Denomination::Coin100), 20);
        assert_eq!(state.transaction.status, TransactionStatus::Idle);
    }

    #[test]
    fn test_duplicate_drink_ids_rejected() {
        let mut config = MachineConfig::default();
        config.drinks.push(Drink::new("cola", "Other Cola", 900, 1));

        assert!(matches!(
            config.validate(),
            Err(ValidationError::Duplicate { value, .. }) if value == "cola"
        ));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let config = MachineConfig {
            drinks: Vec::new(),
            ..MachineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_price_rejected() {
        let mut config = MachineConfig::default();
        config.drinks[0].price = Money::zero();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_bad_failure_rate_rejected() {
        let config = MachineConfig {
            card_failure_rate: 2.0,
            ..MachineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_delay_rejected() {
        let config = MachineConfig {
            timing: Timing {
                error_clear_delay: 0,
                ..Timing::default()
            },
            ..MachineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: MachineConfig = serde_json::from_str(
            r#"{"card_balance": 1200, "timing": {"card_delay": 5}}"#,
        )
        .unwrap();

        assert_eq!(config.card_balance, Money::new(1200));
        assert_eq!(config.timing.card_delay, 5);
        assert_eq!(config.timing.processing_delay, 2);
        assert_eq!(config.drinks.len(), 3);
    }
}
