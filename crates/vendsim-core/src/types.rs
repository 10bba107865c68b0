//! # Domain Types
//!
//! Core domain types shared by the engine and the front panel.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MachineState                                     │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │   Vec<Drink>    │   │    Transaction      │   │  CashInventory  │   │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ─────────────  │   │
//! │  │  id             │◄──│  selected_drink(id) │   │  10000 → n      │   │
//! │  │  name           │   │  inserted_amount    │   │   5000 → n      │   │
//! │  │  price          │   │  payment_method     │   │    ...          │   │
//! │  │  stock          │   │  status             │   │                 │   │
//! │  └─────────────────┘   │  error              │   └─────────────────┘   │
//! │                        └─────────────────────┘                          │
//! │  card_balance: Money          last_dispense: Option<DispenseReceipt>   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The transaction points at its drink by id. The drink list is the only
//! place stock lives, so there is no second copy to fall out of date.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::VendError;
use crate::ledger::{Breakdown, CashInventory};
use crate::money::Money;

// =============================================================================
// Drink
// =============================================================================

/// A drink slot in the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    /// Unique slot identifier (e.g. "cola").
    pub id: String,

    /// Display name shown on the panel.
    pub name: String,

    /// Price. Always positive once the seed config has been validated.
    pub price: Money,

    /// Cans left in the slot.
    pub stock: u32,
}

impl Drink {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: u64, stock: u32) -> Self {
        Drink {
            id: id.into(),
            name: name.into(),
            price: Money::new(price),
            stock,
        }
    }

    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Transaction Status
// =============================================================================

/// Where the current transaction is in its lifecycle.
///
/// ```text
///            insert_cash            select_drink        confirm / card
///  ┌──────┐ ───────────► ┌─────────┐ ──────────► ┌───────────┐ ─────────► ┌────────────┐
///  │ Idle │              │ Payment │             │ Selection │            │ Processing │
///  └──────┘ ◄─┐          └─────────┘             └───────────┘            └────────────┘
///      ▲      │               ▲  │                     │                        │
///      │      │  auto-clear   │  │ guard fails         │ guard fails            │ delay
///      │      │               │  ▼                     ▼                        ▼
///      │      └─────────── ┌───────┐ ◄─────────────────┘ ◄── card declined  ┌──────────┐
///      │                   │ Error │                                        │ Complete │
///      │                   └───────┘                                        └──────────┘
///      └──────────────────────────── auto-reset ────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Waiting for a customer.
    #[default]
    Idle,
    /// Cash has been inserted.
    Payment,
    /// A drink has been chosen and passed its checks.
    Selection,
    /// Dispensing or waiting on the card network.
    Processing,
    /// Drink dispensed; panel shows a thank-you until auto-reset.
    Complete,
    /// A guard failed; the panel shows the error until auto-clear.
    Error,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionStatus::Idle => "idle",
            TransactionStatus::Payment => "payment",
            TransactionStatus::Selection => "selection",
            TransactionStatus::Processing => "processing",
            TransactionStatus::Complete => "complete",
            TransactionStatus::Error => "error",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Notes and coins fed into the machine.
    Cash,
    /// Stored-value card tapped on the reader.
    Card,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => f.write_str("cash"),
            PaymentMethod::Card => f.write_str("card"),
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// The single live transaction.
///
/// Replaced wholesale on reset; `Transaction::default()` is the idle state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transaction {
    /// Id of the chosen drink, if any.
    pub selected_drink: Option<String>,

    /// Cash inserted so far.
    pub inserted_amount: Money,

    /// How the customer is paying. `None` until cash goes in or the card
    /// reader is used.
    pub payment_method: Option<PaymentMethod>,

    pub status: TransactionStatus,

    /// Set only while `status == Error`.
    pub error: Option<VendError>,
}

impl Transaction {
    /// Fresh transaction that has just finished dispensing.
    pub fn completed() -> Self {
        Transaction {
            status: TransactionStatus::Complete,
            ..Transaction::default()
        }
    }

    /// Panel message for the current error, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Status the error auto-clear returns to.
    pub fn recovery_status(&self) -> TransactionStatus {
        if self.payment_method.is_some() {
            TransactionStatus::Payment
        } else {
            TransactionStatus::Idle
        }
    }
}

// =============================================================================
// Dispense Receipt
// =============================================================================

/// What came out of the tray on the last successful purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispenseReceipt {
    pub drink_id: String,
    pub method: PaymentMethod,
    pub price: Money,
    /// Change paid out. Empty for card purchases and exact cash.
    pub change: Breakdown,
}

// =============================================================================
// Machine State
// =============================================================================

/// Everything the machine knows. The single source of truth the front
/// panel reads from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineState {
    pub drinks: Vec<Drink>,
    pub transaction: Transaction,
    pub cash_inventory: CashInventory,
    pub card_balance: Money,
    pub last_dispense: Option<DispenseReceipt>,
}

impl MachineState {
    pub fn new(drinks: Vec<Drink>, cash_inventory: CashInventory, card_balance: Money) -> Self {
        MachineState {
            drinks,
            transaction: Transaction::default(),
            cash_inventory,
            card_balance,
            last_dispense: None,
        }
    }

    /// Looks up a drink by id.
    pub fn drink(&self, id: &str) -> Option<&Drink> {
        self.drinks.iter().find(|d| d.id == id)
    }

    pub fn drink_mut(&mut self, id: &str) -> Option<&mut Drink> {
        self.drinks.iter_mut().find(|d| d.id == id)
    }

    /// The drink the current transaction points at.
    pub fn selected_drink(&self) -> Option<&Drink> {
        self.transaction
            .selected_drink
            .as_deref()
            .and_then(|id| self.drink(id))
    }

    /// Change the customer would get for the current selection.
    pub fn change_due(&self) -> Money {
        self.selected_drink()
            .map(|d| self.transaction.inserted_amount.saturating_sub(d.price))
            .unwrap_or_default()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> MachineState {
        MachineState::new(
            vec![Drink::new("cola", "Cola", 1100, 5), Drink::new("water", "Water", 600, 0)],
            CashInventory::new(),
            Money::new(5000),
        )
    }

    #[test]
    fn test_transaction_default_is_idle() {
        let tx = Transaction::default();
        assert_eq!(tx.status, TransactionStatus::Idle);
        assert_eq!(tx.inserted_amount, Money::zero());
        assert!(tx.selected_drink.is_none());
        assert!(tx.payment_method.is_none());
        assert!(tx.error.is_none());
    }

    #[test]
    fn test_completed_transaction() {
        let tx = Transaction::completed();
        assert_eq!(tx.status, TransactionStatus::Complete);
        assert_eq!(tx.inserted_amount, Money::zero());
    }

    #[test]
    fn test_recovery_status() {
        let mut tx = Transaction::default();
        assert_eq!(tx.recovery_status(), TransactionStatus::Idle);

        tx.payment_method = Some(PaymentMethod::Card);
        assert_eq!(tx.recovery_status(), TransactionStatus::Payment);
    }

    #[test]
    fn test_selected_drink_and_change_due() {
        let mut state = state();
        assert!(state.selected_drink().is_none());
        assert_eq!(state.change_due(), Money::zero());

        state.transaction.selected_drink = Some("cola".to_string());
        state.transaction.inserted_amount = Money::new(2000);
        assert_eq!(state.selected_drink().map(|d| d.name.as_str()), Some("Cola"));
        assert_eq!(state.change_due(), Money::new(900));
    }

    #[test]
    fn test_in_stock() {
        let state = state();
        assert!(state.drink("cola").unwrap().in_stock());
        assert!(!state.drink("water").unwrap().in_stock());
        assert!(state.drink("juice").is_none());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&TransactionStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        assert_eq!(TransactionStatus::Error.to_string(), "error");
    }
}
