//! # Error Types
//!
//! Domain-specific error types for vendsim-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vendsim-core errors (this file)                                       │
//! │  ├── VendError        - Recoverable transaction faults (shown to user) │
//! │  └── ValidationError  - Bad input / bad seed configuration             │
//! │                                                                         │
//! │  vendsim-engine errors (separate crate)                                │
//! │  └── MachineError     - Commands rejected in the current state         │
//! │                                                                         │
//! │  vendsim-cli errors (app)                                              │
//! │  └── AppError         - Config files, env overrides, command parsing   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## VendError vs MachineError
//! A `VendError` never leaves the transaction: the machine records it as the
//! `error` status and recovers on its own. A `MachineError` means the command
//! was refused outright and nothing changed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Vend Error
// =============================================================================

/// Faults raised while a customer is buying a drink.
///
/// The `Display` output is the message the front panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VendError {
    /// The selected drink has no stock left.
    #[error("{drink} is out of stock.")]
    OutOfStock { drink: String },

    /// Not enough cash inserted for the selected drink.
    ///
    /// ## User Workflow
    /// ```text
    /// Insert 1,000원
    ///      │
    ///      ▼
    /// Select cola (1,100원)
    ///      │
    ///      ▼
    /// InsufficientFunds { shortfall: 100 }
    ///      │
    ///      ▼
    /// Panel shows: "Please insert 100원 more."
    /// ```
    #[error("Please insert {shortfall} more.")]
    InsufficientFunds { shortfall: Money },

    /// The cash box cannot make exact change for this purchase.
    #[error("Not enough change in the machine. Choose another drink or insert the exact amount.")]
    InsufficientChange,

    /// The stored-value card cannot cover the price.
    #[error("Insufficient card balance. (balance: {balance}, required: {required})")]
    InsufficientCardBalance { balance: Money, required: Money },

    /// The simulated card network declined the payment.
    #[error("Card payment failed. Please try again.")]
    CardDeclined,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input and seed-configuration validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Invalid format (e.g., a denomination that is not a number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two drinks sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Not a note or coin the machine handles.
    #[error("{0} is not an accepted denomination (expected 10000, 5000, 1000, 500 or 100)")]
    UnknownDenomination(u64),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vend_error_messages() {
        let err = VendError::InsufficientFunds {
            shortfall: Money::new(100),
        };
        assert_eq!(err.to_string(), "Please insert 100원 more.");

        let err = VendError::InsufficientCardBalance {
            balance: Money::new(500),
            required: Money::new(1100),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient card balance. (balance: 500원, required: 1,100원)"
        );

        let err = VendError::OutOfStock {
            drink: "Cola".to_string(),
        };
        assert_eq!(err.to_string(), "Cola is out of stock.");
    }

    #[test]
    fn test_vend_error_serializes_with_kind_tag() {
        let json = serde_json::to_value(VendError::CardDeclined).unwrap();
        assert_eq!(json["kind"], "card_declined");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "drinks".to_string(),
        };
        assert_eq!(err.to_string(), "drinks is required");

        let err = ValidationError::UnknownDenomination(50);
        assert!(err.to_string().starts_with("50 is not an accepted denomination"));
    }
}
