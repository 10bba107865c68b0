//! # CLI Error Type
//!
//! Everything that can go wrong between the terminal and the machine.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Startup                                 Command loop                   │
//! │  ───────                                 ────────────                   │
//! │  vendsim.toml ── io / toml ──┐           "insert 50" ── parse ──┐      │
//! │  VENDSIM_* ──── bad value ───┤                                   │      │
//! │  seed ───────── validation ──┤           machine refuses ───────┤      │
//! │                              ▼                                   ▼      │
//! │                     AppError (exit 1)              AppError (printed,  │
//! │                                                    loop continues)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transaction faults such as "out of stock" are not errors here: the
//! machine records them in its state and the panel renders them.

use thiserror::Error;
use vendsim_core::ValidationError;
use vendsim_engine::MachineError;

/// Result type alias for CLI operations.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Reading the config file or the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`crate::config::AppConfig`].
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv { var: String, value: String },

    /// Seed data or a typed argument failed validation.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    // =========================================================================
    // Command Errors
    // =========================================================================
    /// First word of the line is not a command.
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    UnknownCommand(String),

    /// Command given with the wrong arguments.
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// The machine refused the action.
    #[error("{0}")]
    Machine(#[from] MachineError),

    /// Snapshot could not be rendered as JSON.
    #[error("Failed to render state: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendsim_core::TransactionStatus;
    use vendsim_engine::Action;

    #[test]
    fn test_machine_error_passes_message_through() {
        let err: AppError = MachineError::NotAllowed {
            action: Action::ConfirmPurchase,
            status: TransactionStatus::Idle,
        }
        .into();
        assert_eq!(err.to_string(), "cannot confirm purchase while idle");
    }

    #[test]
    fn test_invalid_env_message() {
        let err = AppError::InvalidEnv {
            var: "VENDSIM_TICK_MS".to_string(),
            value: "soon".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for VENDSIM_TICK_MS: 'soon'");
    }
}
