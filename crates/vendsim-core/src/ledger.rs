//! # Cash Ledger
//!
//! Counts of each denomination held in the cash box, and the two pure
//! operations that move cash in and out of it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cash Box Flow                                    │
//! │                                                                         │
//! │  insert note/coin ──► deposit(inv, d) ──► inv' (d: +1)                 │
//! │                                                                         │
//! │  dispense change  ──► withdraw(inv, breakdown) ──► inv' (each d: -n,   │
//! │                                                     floored at 0)      │
//! │                                                                         │
//! │  Both return a NEW inventory; the input snapshot is left untouched.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::denomination::Denomination;
use crate::money::Money;

/// Denomination → count mapping.
///
/// Counts are unsigned, so an inventory can never hold a negative count.
/// Entries with a zero count may or may not be present; lookups treat a
/// missing entry as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CashInventory(BTreeMap<Denomination, u64>);

/// A concrete change payout. Same shape as the cash box itself.
pub type Breakdown = CashInventory;

impl CashInventory {
    /// Creates an empty inventory.
    pub fn new() -> Self {
        CashInventory(BTreeMap::new())
    }

    /// Number of units held for a denomination.
    #[inline]
    pub fn count(&self, denomination: Denomination) -> u64 {
        self.0.get(&denomination).copied().unwrap_or(0)
    }

    /// Sets the count for a denomination, replacing any previous value.
    pub fn set(&mut self, denomination: Denomination, count: u64) {
        self.0.insert(denomination, count);
    }

    /// Builder-style variant of [`CashInventory::set`].
    pub fn with(mut self, denomination: Denomination, count: u64) -> Self {
        self.set(denomination, count);
        self
    }

    /// Iterates non-zero entries, largest denomination first.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, u64)> + '_ {
        self.0
            .iter()
            .rev()
            .filter(|(_, count)| **count > 0)
            .map(|(d, count)| (*d, *count))
    }

    /// True when no denomination has a positive count.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|count| *count == 0)
    }

    /// Monetary value of everything in the inventory, capped at `u64::MAX`.
    pub fn total(&self) -> Money {
        self.iter().map(|(d, count)| d.money() * count).sum()
    }

    /// Whether withdrawing `breakdown` would be fully satisfied without
    /// hitting the zero floor.
    pub fn covers(&self, breakdown: &Breakdown) -> bool {
        breakdown.iter().all(|(d, count)| self.count(d) >= count)
    }
}

/// Two inventories are equal when they hold the same positive counts;
/// an explicit zero entry and a missing entry are the same thing.
impl PartialEq for CashInventory {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for CashInventory {}

impl FromIterator<(Denomination, u64)> for CashInventory {
    fn from_iter<I: IntoIterator<Item = (Denomination, u64)>>(iter: I) -> Self {
        CashInventory(iter.into_iter().collect())
    }
}

// =============================================================================
// Ledger Operations
// =============================================================================

/// Adds one unit of `denomination` to the inventory.
///
/// ## Example
/// ```rust
/// use vendsim_core::denomination::Denomination;
/// use vendsim_core::ledger::{deposit, CashInventory};
///
/// let before = CashInventory::new().with(Denomination::Coin500, 2);
/// let after = deposit(&before, Denomination::Coin500);
///
/// assert_eq!(after.count(Denomination::Coin500), 3);
/// assert_eq!(before.count(Denomination::Coin500), 2); // untouched
/// ```
pub fn deposit(inventory: &CashInventory, denomination: Denomination) -> CashInventory {
    let mut next = inventory.clone();
    let count = next.0.entry(denomination).or_insert(0);
    *count = count.saturating_add(1);
    next
}

/// Removes a payout from the inventory.
///
/// Each count is floored at zero. Hitting the floor means the caller asked
/// for cash the box does not hold; use [`CashInventory::covers`] to detect
/// that beforehand.
///
/// ## Example
/// ```rust
/// use vendsim_core::denomination::Denomination;
/// use vendsim_core::ledger::{withdraw, CashInventory};
///
/// let inv = CashInventory::new().with(Denomination::Note1000, 1);
/// let payout = CashInventory::new().with(Denomination::Note1000, 3);
///
/// assert_eq!(withdraw(&inv, &payout).count(Denomination::Note1000), 0);
/// ```
pub fn withdraw(inventory: &CashInventory, breakdown: &Breakdown) -> CashInventory {
    let mut next = inventory.clone();
    for (denomination, count) in breakdown.iter() {
        let held = next.count(denomination);
        next.set(denomination, held.saturating_sub(count));
    }
    next
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn seeded() -> CashInventory {
        CashInventory::new()
            .with(Denomination::Note10000, 2)
            .with(Denomination::Note5000, 3)
            .with(Denomination::Note1000, 10)
            .with(Denomination::Coin500, 15)
            .with(Denomination::Coin100, 20)
    }

    #[test]
    fn test_deposit_into_missing_entry() {
        let inv = deposit(&CashInventory::new(), Denomination::Note5000);
        assert_eq!(inv.count(Denomination::Note5000), 1);
        assert_eq!(inv.total(), Money::new(5000));
    }

    #[test]
    fn test_huge_seed_counts_saturate() {
        let inv = CashInventory::new()
            .with(Denomination::Note10000, u64::MAX)
            .with(Denomination::Coin100, 3);

        assert_eq!(inv.total(), Money::new(u64::MAX));

        let inv = deposit(&inv, Denomination::Note10000);
        assert_eq!(inv.count(Denomination::Note10000), u64::MAX);
    }

    #[test]
    fn test_withdraw_partial() {
        let payout = CashInventory::new()
            .with(Denomination::Coin500, 1)
            .with(Denomination::Coin100, 4);
        let inv = withdraw(&seeded(), &payout);

        assert_eq!(inv.count(Denomination::Coin500), 14);
        assert_eq!(inv.count(Denomination::Coin100), 16);
        assert_eq!(inv.count(Denomination::Note1000), 10);
    }

    #[test]
    fn test_total_and_covers() {
        let inv = seeded();
        assert_eq!(inv.total(), Money::new(20000 + 15000 + 10000 + 7500 + 2000));

        let too_much = CashInventory::new().with(Denomination::Note10000, 3);
        assert!(!inv.covers(&too_much));
        assert!(inv.covers(&CashInventory::new().with(Denomination::Note10000, 2)));
    }

    #[test]
    fn test_iter_is_descending_and_skips_zero() {
        let inv = CashInventory::new()
            .with(Denomination::Coin100, 1)
            .with(Denomination::Note1000, 0)
            .with(Denomination::Note5000, 2);
        let entries: Vec<_> = inv.iter().collect();
        assert_eq!(
            entries,
            vec![(Denomination::Note5000, 2), (Denomination::Coin100, 1)]
        );
    }

    #[test]
    fn test_zero_entries_do_not_affect_equality() {
        let explicit = CashInventory::new().with(Denomination::Coin100, 0);
        assert_eq!(explicit, CashInventory::new());
        assert!(explicit.is_empty());
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let inv: CashInventory = serde_json::from_str(r#"{"1000": 1, "500": 2}"#).unwrap();
        assert_eq!(inv.count(Denomination::Note1000), 1);
        assert_eq!(inv.count(Denomination::Coin500), 2);
    }

    fn arb_denomination() -> impl Strategy<Value = Denomination> {
        prop::sample::select(Denomination::ALL.to_vec())
    }

    fn arb_inventory() -> impl Strategy<Value = CashInventory> {
        prop::collection::vec(0u64..50, 5).prop_map(|counts| {
            Denomination::ALL
                .iter()
                .copied()
                .zip(counts)
                .collect::<CashInventory>()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: depositing a unit and withdrawing it again is a no-op.
        #[test]
        fn deposit_then_withdraw_round_trips(inv in arb_inventory(), d in arb_denomination()) {
            let one = CashInventory::new().with(d, 1);
            let back = withdraw(&deposit(&inv, d), &one);
            prop_assert_eq!(back, inv);
        }

        /// Property: withdrawing never drives a count below zero and never
        /// leaves more than was there.
        #[test]
        fn withdraw_is_floored(inv in arb_inventory(), payout in arb_inventory()) {
            let after = withdraw(&inv, &payout);
            for denomination in Denomination::ALL {
                prop_assert_eq!(
                    after.count(denomination),
                    inv.count(denomination).saturating_sub(payout.count(denomination))
                );
            }
        }
    }
}
