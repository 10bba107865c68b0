//! # vendsim-core: Pure Domain Logic for the Vending Machine Simulator
//!
//! This crate holds everything about the machine that does not depend on
//! time: money, the cash box, change-making, and the shape of the state.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Vendsim Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Front panel (vendsim-cli)                       │   │
//! │  │   insert 1000 ──► select cola ──► confirm ──► (tray)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │         vendsim-engine (state machine + simulation clock)       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vendsim-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  money   │ │  ledger  │ │  change  │ │ types / config   │  │   │
//! │  │   │  Money   │ │ deposit  │ │  greedy  │ │ Drink, MachineSt │  │   │
//! │  │   │  format  │ │ withdraw │ │  calc    │ │ MachineConfig    │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCKS • NO RANDOMNESS • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type and currency formatting
//! - [`denomination`] - The fixed note/coin set
//! - [`ledger`] - Cash box counts, deposit and withdraw
//! - [`change`] - Greedy change calculator
//! - [`types`] - Drinks, transaction, machine state
//! - [`config`] - Injected seed configuration
//! - [`validation`] - Input rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use vendsim_core::{calculate_change, CashInventory, Denomination, Money};
//!
//! let cash_box = CashInventory::new()
//!     .with(Denomination::Coin500, 1)
//!     .with(Denomination::Coin100, 1);
//!
//! let change = calculate_change(Money::new(600), &cash_box);
//! assert!(change.exact);
//! ```

pub mod change;
pub mod config;
pub mod denomination;
pub mod error;
pub mod ledger;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use change::{calculate_change, ChangeResult};
pub use config::{MachineConfig, Timing};
pub use denomination::Denomination;
pub use error::{ValidationError, ValidationResult, VendError};
pub use ledger::{deposit, withdraw, Breakdown, CashInventory};
pub use money::{format_currency, Money};
pub use types::*;
