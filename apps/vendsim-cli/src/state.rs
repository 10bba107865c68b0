//! # Shared Machine State
//!
//! One `VendingMachine` shared between the command loop and the ticker.
//!
//! ## Thread Safety
//! The machine is wrapped in `Arc<Mutex<T>>` because:
//! 1. The command loop and the ticker task both mutate it
//! 2. Every engine call is short and synchronous, so a std mutex is enough
//! 3. The lock is never held across an `.await`
//!
//! ## Who Touches the Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  stdin ──► command loop ──► with_machine_mut(|m| m.insert_cash(..))    │
//! │                                                                         │
//! │  ticker (every tick_ms) ──► with_machine_mut(|m| m.advance(1))         │
//! │                                                                         │
//! │  "state" ──► with_machine(|m| render(m.state()))   (read only)         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};
use vendsim_engine::VendingMachine;

/// Cloneable handle to the shared machine.
#[derive(Debug, Clone)]
pub struct MachineHandle {
    machine: Arc<Mutex<VendingMachine>>,
}

impl MachineHandle {
    pub fn new(machine: VendingMachine) -> Self {
        MachineHandle {
            machine: Arc::new(Mutex::new(machine)),
        }
    }

    /// Executes a function with read access to the machine.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let status = handle.with_machine(|m| m.status());
    /// ```
    pub fn with_machine<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&VendingMachine) -> R,
    {
        let machine = self.machine.lock().expect("Machine mutex poisoned");
        f(&machine)
    }

    /// Executes a function with write access to the machine.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// handle.with_machine_mut(|m| m.select_drink("cola"))?;
    /// ```
    pub fn with_machine_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut VendingMachine) -> R,
    {
        let mut machine = self.machine.lock().expect("Machine mutex poisoned");
        f(&mut machine)
    }
}

// =============================================================================
// Ticker
// =============================================================================

/// Handle to the background ticker task.
pub struct TickerHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl TickerHandle {
    /// Stops the ticker and waits for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.task.await;
    }
}

/// Spawns a task that advances the simulation clock by one tick every
/// `period` of wall-clock time.
///
/// The first tick lands one full `period` after spawning.
pub fn spawn_ticker(machine: MachineHandle, period: Duration) -> TickerHandle {
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

    let task = tokio::spawn(async move {
        info!(period_ms = period.as_millis() as u64, "Ticker starting");

        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let fired = machine.with_machine_mut(|m| m.advance(1));
                    if fired > 0 {
                        debug!(fired, "Timers fired");
                    }
                }

                _ = shutdown_rx.recv() => {
                    info!("Ticker shutting down");
                    break;
                }
            }
        }
    });

    TickerHandle { shutdown_tx, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendsim_core::{MachineConfig, TransactionStatus};

    fn handle() -> MachineHandle {
        let config = MachineConfig {
            card_failure_rate: 0.0,
            ..MachineConfig::default()
        };
        MachineHandle::new(VendingMachine::with_random(&config, Some(1)).unwrap())
    }

    #[test]
    fn test_clones_share_one_machine() {
        let a = handle();
        let b = a.clone();

        a.with_machine_mut(|m| m.select_drink("water")).unwrap();

        assert_eq!(b.with_machine(|m| m.status()), TransactionStatus::Selection);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_drives_card_payment() {
        let machine = handle();
        machine
            .with_machine_mut(|m| {
                m.select_drink("cola")?;
                m.pay_with_card()
            })
            .unwrap();

        let ticker = spawn_ticker(machine.clone(), Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(machine.with_machine(|m| m.now()), 2);
        assert_eq!(machine.with_machine(|m| m.status()), TransactionStatus::Processing);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(machine.with_machine(|m| m.status()), TransactionStatus::Complete);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(machine.with_machine(|m| m.status()), TransactionStatus::Idle);

        ticker.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_stops_on_shutdown() {
        let machine = handle();
        let ticker = spawn_ticker(machine.clone(), Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(35)).await;
        ticker.shutdown().await;
        let stopped_at = machine.with_machine(|m| m.now());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(machine.with_machine(|m| m.now()), stopped_at);
        assert_eq!(stopped_at, 3);
    }
}
