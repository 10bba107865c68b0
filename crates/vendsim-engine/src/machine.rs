//! # Vending Machine
//!
//! The transaction state machine. Owns the machine state, the simulation
//! clock, and the card network.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Action             From                 To                             │
//! │  ─────────────────  ───────────────────  ────────────────────────────   │
//! │  insert_cash        idle, payment        payment                        │
//! │  select_drink       any                  selection | error              │
//! │  confirm_purchase   selection (cash)     processing ─(2)─► complete     │
//! │  pay_with_card      drink selected       processing ─(3)─► complete     │
//! │                                                       └──► error        │
//! │  cancel_transaction any                  idle                           │
//! │  recharge_card      any                  (unchanged)                    │
//! │                                                                         │
//! │  Timed:  complete ─(3)─► idle        error ─(3)─► payment | idle        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stale Timers
//! Every accepted front-panel action bumps a generation counter. Each
//! scheduled task remembers the generation it was scheduled under and is
//! dropped on fire if the counter has moved on. Cancelling also empties the
//! clock outright.

use tracing::{debug, info, warn};
use vendsim_core::{
    calculate_change, deposit, withdraw, Denomination, DispenseReceipt, MachineConfig,
    MachineState, Money, PaymentMethod, Timing, Transaction, TransactionStatus, VendError,
};

use crate::card::{is_approved, OutcomeSource, RandomOutcome};
use crate::clock::{SimClock, Tick};
use crate::error::{Action, MachineError, MachineResult};

// =============================================================================
// Scheduled Tasks
// =============================================================================

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Dispense the drink and pay out change for a cash purchase.
    CompleteCashPurchase,
    /// Ask the card network for an outcome.
    ResolveCardPayment,
    /// `complete` → `idle`.
    ResetToIdle,
    /// `error` → `payment` / `idle`.
    ClearError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub kind: TaskKind,
    pub generation: u64,
}

// =============================================================================
// Vending Machine
// =============================================================================

/// A single vending machine running one transaction at a time.
///
/// ## Usage
/// ```rust
/// use vendsim_core::{Denomination, MachineConfig, TransactionStatus};
/// use vendsim_engine::{FixedOutcome, VendingMachine};
///
/// let mut machine = VendingMachine::new(&MachineConfig::default(), FixedOutcome::APPROVE)?;
///
/// machine.insert_cash(Denomination::Note1000)?;
/// machine.insert_cash(Denomination::Coin500)?;
/// machine.select_drink("cola")?;
/// machine.confirm_purchase()?;
///
/// machine.advance(2);
/// assert_eq!(machine.state().transaction.status, TransactionStatus::Complete);
///
/// machine.advance(3);
/// assert_eq!(machine.state().transaction.status, TransactionStatus::Idle);
/// # Ok::<(), vendsim_engine::MachineError>(())
/// ```
#[derive(Debug)]
pub struct VendingMachine<S = RandomOutcome> {
    state: MachineState,
    clock: SimClock<ScheduledTask>,
    generation: u64,
    timing: Timing,
    card_failure_rate: f64,
    outcomes: S,
}

impl VendingMachine<RandomOutcome> {
    /// Machine with a real random card network, optionally seeded.
    pub fn with_random(config: &MachineConfig, seed: Option<u64>) -> MachineResult<Self> {
        let outcomes = match seed {
            Some(seed) => RandomOutcome::seeded(seed),
            None => RandomOutcome::from_entropy(),
        };
        Self::new(config, outcomes)
    }
}

impl<S: OutcomeSource> VendingMachine<S> {
    /// Validates `config` and builds a machine in the idle state.
    pub fn new(config: &MachineConfig, outcomes: S) -> MachineResult<Self> {
        let state = config.initial_state()?;
        info!(
            drinks = state.drinks.len(),
            cash = %state.cash_inventory.total(),
            card_balance = %state.card_balance,
            "Vending machine initialized"
        );

        Ok(VendingMachine {
            state,
            clock: SimClock::new(),
            generation: 0,
            timing: config.timing,
            card_failure_rate: config.card_failure_rate,
            outcomes,
        })
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    /// Current state, read-only.
    #[inline]
    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> MachineState {
        self.state.clone()
    }

    #[inline]
    pub fn status(&self) -> TransactionStatus {
        self.state.transaction.status
    }

    /// Current simulated tick.
    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    /// Timers still queued, stale ones included.
    #[inline]
    pub fn pending_timers(&self) -> usize {
        self.clock.pending()
    }

    // =========================================================================
    // Front Panel Actions
    // =========================================================================

    /// Feeds a note or coin into the machine.
    ///
    /// Only accepted while `idle` or `payment`. The unit goes straight into
    /// the cash box.
    pub fn insert_cash(&mut self, denomination: Denomination) -> MachineResult<TransactionStatus> {
        let status = self.status();
        if !matches!(status, TransactionStatus::Idle | TransactionStatus::Payment) {
            return Err(MachineError::NotAllowed {
                action: Action::InsertCash,
                status,
            });
        }

        self.supersede();
        self.state.cash_inventory = deposit(&self.state.cash_inventory, denomination);

        let tx = &mut self.state.transaction;
        tx.inserted_amount = tx.inserted_amount.saturating_add(denomination.money());
        tx.payment_method = Some(PaymentMethod::Cash);
        tx.status = TransactionStatus::Payment;
        tx.error = None;

        debug!(%denomination, inserted = %tx.inserted_amount, "Cash inserted");
        Ok(self.status())
    }

    /// Chooses a drink.
    ///
    /// ## Guards (in order)
    /// 1. Out of stock → error, selection cleared
    /// 2. Cash and not enough inserted → error, selection kept
    /// 3. Cash and change cannot be made → error, selection kept
    ///
    /// Card or no payment yet skips 2 and 3; the card checks run at
    /// [`VendingMachine::pay_with_card`].
    pub fn select_drink(&mut self, drink_id: &str) -> MachineResult<TransactionStatus> {
        let drink = self
            .state
            .drink(drink_id)
            .cloned()
            .ok_or_else(|| MachineError::UnknownDrink(drink_id.to_string()))?;

        self.supersede();

        if !drink.in_stock() {
            self.state.transaction.selected_drink = None;
            self.fail(VendError::OutOfStock { drink: drink.name });
            return Ok(self.status());
        }

        let tx = &self.state.transaction;
        if tx.payment_method == Some(PaymentMethod::Cash) {
            let inserted = tx.inserted_amount;

            if inserted < drink.price {
                self.state.transaction.selected_drink = Some(drink.id);
                self.fail(VendError::InsufficientFunds {
                    shortfall: drink.price - inserted,
                });
                return Ok(self.status());
            }

            let change_due = inserted - drink.price;
            let can_pay_out = change_due.is_zero()
                || calculate_change(change_due, &self.state.cash_inventory).exact;
            if !can_pay_out {
                self.state.transaction.selected_drink = Some(drink.id);
                self.fail(VendError::InsufficientChange);
                return Ok(self.status());
            }
        }

        debug!(drink = %drink.id, price = %drink.price, "Drink selected");
        let tx = &mut self.state.transaction;
        tx.selected_drink = Some(drink.id);
        tx.status = TransactionStatus::Selection;
        tx.error = None;
        Ok(self.status())
    }

    /// Confirms a cash purchase. Dispenses after the processing delay.
    pub fn confirm_purchase(&mut self) -> MachineResult<TransactionStatus> {
        let tx = &self.state.transaction;
        let ready = tx.status == TransactionStatus::Selection
            && tx.payment_method == Some(PaymentMethod::Cash)
            && tx.selected_drink.is_some();
        if !ready {
            return Err(MachineError::NotAllowed {
                action: Action::ConfirmPurchase,
                status: tx.status,
            });
        }

        self.supersede();
        self.state.transaction.status = TransactionStatus::Processing;
        self.schedule(self.timing.processing_delay, TaskKind::CompleteCashPurchase);
        Ok(self.status())
    }

    /// Pays for the selected drink with the stored-value card.
    ///
    /// The balance check is immediate; the network outcome arrives after
    /// the card delay.
    pub fn pay_with_card(&mut self) -> MachineResult<TransactionStatus> {
        let drink = self
            .state
            .selected_drink()
            .cloned()
            .ok_or(MachineError::NoDrinkSelected)?;

        self.supersede();

        let balance = self.state.card_balance;
        if balance < drink.price {
            self.fail(VendError::InsufficientCardBalance {
                balance,
                required: drink.price,
            });
            return Ok(self.status());
        }

        let tx = &mut self.state.transaction;
        tx.status = TransactionStatus::Processing;
        tx.payment_method = Some(PaymentMethod::Card);
        tx.error = None;

        debug!(drink = %drink.id, price = %drink.price, "Card payment submitted");
        self.schedule(self.timing.card_delay, TaskKind::ResolveCardPayment);
        Ok(self.status())
    }

    /// Abandons the current transaction from any status.
    ///
    /// Inserted cash is not handed back: it is already in the cash box.
    pub fn cancel_transaction(&mut self) -> TransactionStatus {
        self.supersede();
        let dropped = self.clock.cancel_all();

        let abandoned = std::mem::take(&mut self.state.transaction);
        if abandoned.inserted_amount.is_positive() {
            info!(
                inserted = %abandoned.inserted_amount,
                "Transaction cancelled; inserted cash stays in the cash box"
            );
        } else {
            debug!(dropped_timers = dropped, "Transaction cancelled");
        }

        self.status()
    }

    /// Tops up the card balance. Allowed at any time; does not disturb the
    /// running transaction. The balance caps at `u64::MAX`.
    pub fn recharge_card(&mut self, amount: Money) -> Money {
        self.state.card_balance = self.state.card_balance.saturating_add(amount);
        info!(%amount, balance = %self.state.card_balance, "Card recharged");
        self.state.card_balance
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Moves simulated time forward, firing every task that falls due.
    /// Returns how many tasks fired (stale ones included).
    pub fn advance(&mut self, ticks: Tick) -> usize {
        let target = self.clock.now().saturating_add(ticks);
        let mut fired = 0;

        while let Some((_, task)) = self.clock.pop_due(target) {
            self.run(task);
            fired += 1;
        }

        self.clock.advance_to(target);
        fired
    }

    /// Advances until no timers remain. Returns the ticks that elapsed.
    pub fn settle(&mut self) -> Tick {
        let start = self.clock.now();
        while let Some(due) = self.clock.next_due() {
            let now = self.clock.now();
            self.advance(due.saturating_sub(now));
        }
        self.clock.now() - start
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn supersede(&mut self) {
        self.generation += 1;
    }

    fn schedule(&mut self, delay: Tick, kind: TaskKind) {
        let task = ScheduledTask {
            kind,
            generation: self.generation,
        };
        self.clock.schedule(delay, task);
        debug!(?kind, delay, at = self.clock.now(), "Timer scheduled");
    }

    /// Records a recoverable fault and arms the auto-clear.
    fn fail(&mut self, error: VendError) {
        info!(%error, "Transaction error");
        let tx = &mut self.state.transaction;
        tx.status = TransactionStatus::Error;
        tx.error = Some(error);
        self.schedule(self.timing.error_clear_delay, TaskKind::ClearError);
    }

    fn run(&mut self, task: ScheduledTask) {
        if task.generation != self.generation {
            debug!(kind = ?task.kind, "Stale timer suppressed");
            return;
        }

        match task.kind {
            TaskKind::CompleteCashPurchase => self.complete_cash_purchase(),
            TaskKind::ResolveCardPayment => self.resolve_card_payment(),
            TaskKind::ResetToIdle => {
                self.state.transaction.status = TransactionStatus::Idle;
                debug!("Ready for next customer");
            }
            TaskKind::ClearError => {
                let tx = &mut self.state.transaction;
                tx.status = tx.recovery_status();
                tx.error = None;
                debug!(status = %tx.status, "Error cleared");
            }
        }
    }

    fn complete_cash_purchase(&mut self) {
        let Some(drink) = self.state.selected_drink().cloned() else {
            warn!("Cash purchase fired without a selected drink");
            self.state.transaction = Transaction::default();
            return;
        };

        let change_due = self.state.transaction.inserted_amount.saturating_sub(drink.price);
        let change = calculate_change(change_due, &self.state.cash_inventory);
        if !change.exact {
            warn!(
                owed = %change_due,
                paid = %change.total_covered,
                "Change could not be made exactly at dispense time"
            );
        }

        if !self.state.cash_inventory.covers(&change.breakdown) {
            warn!(change = %change.total_covered, "Change exceeds cash box; withdrawal clamped");
        }
        self.state.cash_inventory = withdraw(&self.state.cash_inventory, &change.breakdown);
        self.dispense(&drink.id);
        self.state.last_dispense = Some(DispenseReceipt {
            drink_id: drink.id.clone(),
            method: PaymentMethod::Cash,
            price: drink.price,
            change: change.breakdown,
        });

        info!(drink = %drink.id, change = %change.total_covered, "Cash purchase complete");
        self.finish();
    }

    fn resolve_card_payment(&mut self) {
        let Some(drink) = self.state.selected_drink().cloned() else {
            warn!("Card outcome fired without a selected drink");
            self.state.transaction = Transaction::default();
            return;
        };

        let draw = self.outcomes.draw();
        if !is_approved(draw, self.card_failure_rate) {
            info!(drink = %drink.id, "Card payment declined");
            self.fail(VendError::CardDeclined);
            return;
        }

        self.dispense(&drink.id);
        self.state.card_balance = self.state.card_balance.saturating_sub(drink.price);
        self.state.last_dispense = Some(DispenseReceipt {
            drink_id: drink.id.clone(),
            method: PaymentMethod::Card,
            price: drink.price,
            change: Default::default(),
        });

        info!(
            drink = %drink.id,
            balance = %self.state.card_balance,
            "Card purchase complete"
        );
        self.finish();
    }

    fn dispense(&mut self, drink_id: &str) {
        if let Some(slot) = self.state.drink_mut(drink_id) {
            slot.stock = slot.stock.saturating_sub(1);
        }
    }

    /// Fresh transaction showing `complete`, then back to idle.
    fn finish(&mut self) {
        self.state.transaction = Transaction::completed();
        self.schedule(self.timing.complete_reset_delay, TaskKind::ResetToIdle);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
