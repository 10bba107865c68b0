//! # Money Module
//!
//! Provides the `Money` type for amounts handled by the machine.
//!
//! ## Why a Newtype?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ONE CURRENCY, NO FRACTIONS                                             │
//! │                                                                         │
//! │  The machine only ever sees whole notes and coins (100 .. 10,000).     │
//! │  There is no minor unit, so the raw value IS the displayed amount.     │
//! │                                                                         │
//! │  Amounts are never negative: a shortfall is expressed as a positive    │
//! │  amount owed, not as a negative balance.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vendsim_core::money::Money;
//!
//! let price = Money::new(1100);
//! let inserted = Money::new(1500);
//!
//! assert_eq!(inserted - price, Money::new(400));
//! assert_eq!(price.to_string(), "1,100원");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// Suffix appended to every formatted amount.
pub const CURRENCY_LABEL: &str = "원";

// =============================================================================
// Money Type
// =============================================================================

/// A non-negative amount of money in the machine's single currency.
///
/// ## Where Money is Used
/// ```text
/// Drink.price ──────────────┐
///                           ├──► shortfall / change owed
/// Transaction.inserted ─────┘
///
/// Denomination.value() × count ──► CashInventory::total()
///
/// MachineState.card_balance ──► card payment guard
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Creates a Money value from a raw amount.
    #[inline]
    pub const fn new(amount: u64) -> Self {
        Money(amount)
    }

    /// Returns the raw amount.
    #[inline]
    pub const fn amount(&self) -> u64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Subtracts, flooring at zero.
    ///
    /// ## Example
    /// ```rust
    /// use vendsim_core::money::Money;
    ///
    /// assert_eq!(Money::new(500).saturating_sub(Money::new(700)), Money::zero());
    /// ```
    #[inline]
    pub const fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Adds, capping at the largest representable amount.
    #[inline]
    pub const fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Subtracts, returning `None` if the result would be negative.
    #[inline]
    pub const fn checked_sub(self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }
}

/// Formats an amount with digits grouped in threes and the currency label.
///
/// ## Example
/// ```rust
/// use vendsim_core::money::{format_currency, Money};
///
/// assert_eq!(format_currency(Money::new(0)), "0원");
/// assert_eq!(format_currency(Money::new(1100)), "1,100원");
/// assert_eq!(format_currency(Money::new(1234567)), "1,234,567원");
/// ```
pub fn format_currency(amount: Money) -> String {
    let digits = amount.0.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + CURRENCY_LABEL.len());

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped.push_str(CURRENCY_LABEL);
    grouped
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_currency(*self))
    }
}

impl From<u64> for Money {
    fn from(amount: u64) -> Self {
        Money(amount)
    }
}

/// Addition saturates: balances and cash box totals cap at `u64::MAX`
/// instead of wrapping or panicking.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = self.saturating_add(other);
    }
}

/// Subtraction of two Money values.
///
/// Panics on underflow in debug builds, like the integer it wraps.
/// Use [`Money::saturating_sub`] or [`Money::checked_sub`] when the
/// ordering is not already known.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a count (denomination × units). Saturates like `Add`.
impl Mul<u64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: u64) -> Self {
        Money(self.0.saturating_mul(count))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
