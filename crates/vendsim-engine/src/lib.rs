//! # vendsim-engine: Transaction State Machine
//!
//! Runs one customer transaction at a time on top of the pure logic in
//! `vendsim-core`.
//!
//! ## Transaction Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────┐  insert   ┌─────────┐  select   ┌───────────┐               │
//! │   │ idle │──────────►│ payment │──────────►│ selection │               │
//! │   └──────┘           └─────────┘           └─────┬─────┘               │
//! │      ▲                    ▲             confirm  │  card               │
//! │      │                    │                      ▼                     │
//! │      │               ┌────┴────┐  decline  ┌────────────┐              │
//! │      │               │  error  │◄──────────│ processing │              │
//! │      │               └─────────┘           └─────┬──────┘              │
//! │      │                                           │ dispense            │
//! │      │   reset       ┌──────────┐                │                     │
//! │      └───────────────│ complete │◄───────────────┘                     │
//! │                      └──────────┘                                      │
//! │                                                                         │
//! │   cancel: any ──► idle          timers: driven by SimClock             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`machine`] - `VendingMachine`, the actions and timed transitions
//! - [`clock`] - Virtual tick scheduler
//! - [`card`] - Card network outcome sources
//! - [`error`] - Refused-command errors

pub mod card;
pub mod clock;
pub mod error;
pub mod machine;

pub use card::{is_approved, FixedOutcome, OutcomeSource, RandomOutcome};
pub use clock::{SimClock, Tick};
pub use error::{Action, MachineError, MachineResult};
pub use machine::{ScheduledTask, TaskKind, VendingMachine};
