//! # Engine Error Types
//!
//! Errors for commands the machine refuses outright.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command arrives                                                        │
//! │       │                                                                 │
//! │       ├── not valid in this status? ──► MachineError::NotAllowed       │
//! │       │                                 (state untouched)              │
//! │       │                                                                 │
//! │       ├── guard fails (stock, funds)? ─► status = Error + VendError    │
//! │       │                                 (recorded, auto-clears)        │
//! │       │                                                                 │
//! │       └── OK ──────────────────────────► next status                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use thiserror::Error;
use vendsim_core::{TransactionStatus, ValidationError};

/// Result type alias for machine operations.
pub type MachineResult<T> = Result<T, MachineError>;

/// Front-panel actions that a status guard can refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    InsertCash,
    ConfirmPurchase,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::InsertCash => "insert cash",
            Action::ConfirmPurchase => "confirm purchase",
        };
        f.write_str(name)
    }
}

/// A command the machine refused. Nothing changed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// The action is not available in the current status.
    #[error("cannot {action} while {status}")]
    NotAllowed {
        action: Action,
        status: TransactionStatus,
    },

    /// No drink with that id is loaded.
    #[error("unknown drink: {0}")]
    UnknownDrink(String),

    /// Card payment needs a drink selected first.
    #[error("select a drink before paying by card")]
    NoDrinkSelected,

    /// Bad seed configuration.
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),
}
