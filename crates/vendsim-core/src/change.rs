//! # Change Calculator
//!
//! Greedy change-making over the fixed denomination set, bounded by what
//! the cash box actually holds.
//!
//! ## Algorithm
//! ```text
//! remaining = amount
//! for d in [10000, 5000, 1000, 500, 100]:
//!     take = min(remaining / d, available[d])
//!     remaining -= take × d
//! exact = (remaining == 0)
//! ```
//!
//! ## Greedy, Not Optimal
//! The calculator commits to the largest denomination it can use and never
//! backtracks. With a cash box that only holds a 10,000 note and a 5,000
//! note, asking for 5,000 works, but a box holding {1000: 1} cannot pay 300
//! no matter what: the answer is `exact = false`, never an error.

use serde::{Deserialize, Serialize};

use crate::denomination::Denomination;
use crate::ledger::{Breakdown, CashInventory};
use crate::money::Money;

/// Outcome of a change calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeResult {
    /// Units of each denomination to pay out. Only non-zero entries.
    pub breakdown: Breakdown,

    /// How much of the requested amount the breakdown pays.
    pub total_covered: Money,

    /// True iff `total_covered` equals the requested amount.
    pub exact: bool,
}

/// Computes a greedy change breakdown for `amount` from `inventory`.
///
/// ## Example
/// ```rust
/// use vendsim_core::change::calculate_change;
/// use vendsim_core::denomination::Denomination;
/// use vendsim_core::ledger::CashInventory;
/// use vendsim_core::money::Money;
///
/// let inv = CashInventory::new()
///     .with(Denomination::Note1000, 1)
///     .with(Denomination::Coin500, 1);
///
/// let result = calculate_change(Money::new(1500), &inv);
/// assert!(result.exact);
/// assert_eq!(result.breakdown.count(Denomination::Note1000), 1);
/// assert_eq!(result.breakdown.count(Denomination::Coin500), 1);
/// ```
pub fn calculate_change(amount: Money, inventory: &CashInventory) -> ChangeResult {
    let mut breakdown = CashInventory::new();
    let mut remaining = amount.amount();

    for denomination in Denomination::ALL {
        if remaining == 0 {
            break;
        }

        let wanted = remaining / denomination.value();
        let used = wanted.min(inventory.count(denomination));
        if used > 0 {
            breakdown.set(denomination, used);
            remaining -= used * denomination.value();
        }
    }

    ChangeResult {
        breakdown,
        total_covered: Money::new(amount.amount() - remaining),
        exact: remaining == 0,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exact_with_notes_and_coins() {
        let inv = CashInventory::new()
            .with(Denomination::Note1000, 1)
            .with(Denomination::Coin500, 1)
            .with(Denomination::Coin100, 0);

        let result = calculate_change(Money::new(1500), &inv);

        assert!(result.exact);
        assert_eq!(
            result.breakdown,
            CashInventory::new()
                .with(Denomination::Note1000, 1)
                .with(Denomination::Coin500, 1)
        );
        assert_eq!(result.total_covered, Money::new(1500));
    }

    #[test]
    fn test_falls_through_to_smaller_denominations() {
        let inv = CashInventory::new()
            .with(Denomination::Note1000, 0)
            .with(Denomination::Coin500, 1)
            .with(Denomination::Coin100, 1);

        let result = calculate_change(Money::new(600), &inv);

        assert!(result.exact);
        assert_eq!(
            result.breakdown,
            CashInventory::new()
                .with(Denomination::Coin500, 1)
                .with(Denomination::Coin100, 1)
        );
    }

    #[test]
    fn test_inexact_when_no_small_units() {
        let inv = CashInventory::new().with(Denomination::Note1000, 1);

        let result = calculate_change(Money::new(300), &inv);

        assert!(!result.exact);
        assert!(result.breakdown.is_empty());
        assert_eq!(result.total_covered, Money::zero());
    }

    #[test]
    fn test_zero_amount_is_trivially_exact() {
        let result = calculate_change(Money::zero(), &CashInventory::new());
        assert!(result.exact);
        assert!(result.breakdown.is_empty());
    }

    #[test]
    fn test_partial_cover_reports_total_covered() {
        let inv = CashInventory::new()
            .with(Denomination::Coin500, 1)
            .with(Denomination::Coin100, 2);

        let result = calculate_change(Money::new(900), &inv);

        assert!(!result.exact);
        assert_eq!(result.total_covered, Money::new(700));
    }

    #[test]
    fn test_limited_by_available_count() {
        let inv = CashInventory::new()
            .with(Denomination::Note5000, 1)
            .with(Denomination::Note1000, 10);

        let result = calculate_change(Money::new(8000), &inv);

        assert!(result.exact);
        assert_eq!(result.breakdown.count(Denomination::Note5000), 1);
        assert_eq!(result.breakdown.count(Denomination::Note1000), 3);
    }

    fn arb_inventory() -> impl Strategy<Value = CashInventory> {
        prop::collection::vec(0u64..20, 5).prop_map(|counts| {
            Denomination::ALL
                .iter()
                .copied()
                .zip(counts)
                .collect::<CashInventory>()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: an exact result pays exactly the amount and never uses
        /// more units than the inventory holds.
        #[test]
        fn exact_breakdown_sums_to_amount(amount in 0u64..100_000, inv in arb_inventory()) {
            let result = calculate_change(Money::new(amount), &inv);

            prop_assert!(inv.covers(&result.breakdown));
            prop_assert_eq!(result.breakdown.total(), result.total_covered);
            if result.exact {
                prop_assert_eq!(result.breakdown.total(), Money::new(amount));
            } else {
                prop_assert!(result.total_covered < Money::new(amount));
            }
        }

        /// Property: same inputs, same output.
        #[test]
        fn calculation_is_deterministic(amount in 0u64..100_000, inv in arb_inventory()) {
            let first = calculate_change(Money::new(amount), &inv);
            let second = calculate_change(Money::new(amount), &inv);
            prop_assert_eq!(first, second);
        }
    }
}
