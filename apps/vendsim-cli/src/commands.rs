//! # Front Panel Commands
//!
//! Parses a line of input into a [`Command`], runs it against the shared
//! machine, and renders what the customer would see.
//!
//! ## Command Reference
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command              Engine call                                       │
//! │  ───────────────────  ────────────────────────────────────────────────  │
//! │  insert <amount>      insert_cash(Denomination)                        │
//! │  select <drink>       select_drink(id)                                 │
//! │  confirm              confirm_purchase()                               │
//! │  card                 pay_with_card()                                  │
//! │  cancel               cancel_transaction()                             │
//! │  recharge <amount>    recharge_card(Money)                             │
//! │  tick [n]             advance(n)            (manual clock, default 1)  │
//! │  state [--json]       snapshot()                                       │
//! │  help | quit                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt::Write;
use std::str::FromStr;

use vendsim_core::validation::validate_recharge_amount;
use vendsim_core::{format_currency, Denomination, MachineState, Money, TransactionStatus};
use vendsim_engine::Tick;

use crate::error::{AppError, AppResult};
use crate::state::MachineHandle;

pub const HELP: &str = "\
Commands:
  insert <amount>     insert a note or coin (10000, 5000, 1000, 500, 100)
  select <drink>      choose a drink by id
  confirm             confirm a cash purchase
  card                pay for the selected drink by card
  cancel              cancel the transaction (inserted cash is kept)
  recharge <amount>   top up the card
  tick [n]            advance the clock by n ticks (default 1)
  state [--json]      show the machine
  help                show this help
  quit                exit";

/// A parsed front panel command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert(Denomination),
    Select(String),
    Confirm,
    Card,
    Cancel,
    Recharge(Money),
    Tick(Tick),
    State { json: bool },
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(AppError::Usage("help"));
        };
        let arg = words.next();
        if words.next().is_some() {
            return Err(AppError::Usage(usage(name)));
        }

        let command = match (name.to_lowercase().as_str(), arg) {
            ("insert" | "i", Some(amount)) => Command::Insert(amount.parse()?),
            ("select" | "s", Some(drink)) => Command::Select(drink.to_lowercase()),
            ("confirm" | "c", None) => Command::Confirm,
            ("card", None) => Command::Card,
            ("cancel" | "x", None) => Command::Cancel,
            ("recharge" | "r", Some(amount)) => Command::Recharge(parse_amount(amount)?),
            ("tick" | "t", None) => Command::Tick(1),
            ("tick" | "t", Some(n)) => {
                Command::Tick(n.parse().map_err(|_| AppError::Usage(usage("tick")))?)
            }
            ("state", None) => Command::State { json: false },
            ("state", Some("--json")) => Command::State { json: true },
            ("help" | "h" | "?", None) => Command::Help,
            ("quit" | "exit" | "q", None) => Command::Quit,
            (other, _) => match usage(other) {
                "" => return Err(AppError::UnknownCommand(name.to_string())),
                text => return Err(AppError::Usage(text)),
            },
        };

        Ok(command)
    }
}

fn usage(command: &str) -> &'static str {
    match command {
        "insert" | "i" => "insert <10000|5000|1000|500|100>",
        "select" | "s" => "select <drink id>",
        "confirm" | "c" => "confirm",
        "card" => "card",
        "cancel" | "x" => "cancel",
        "recharge" | "r" => "recharge <amount>",
        "tick" | "t" => "tick [n]",
        "state" => "state [--json]",
        "help" | "h" | "?" => "help",
        "quit" | "exit" | "q" => "quit",
        _ => "",
    }
}

/// Parses a money amount, allowing `1,000` and `1_000`.
fn parse_amount(raw: &str) -> AppResult<Money> {
    let digits: String = raw.chars().filter(|c| !matches!(c, ',' | '_')).collect();
    let amount = digits
        .parse::<u64>()
        .map(Money::new)
        .map_err(|_| AppError::Usage(usage("recharge")))?;
    validate_recharge_amount(amount)?;
    Ok(amount)
}

// =============================================================================
// Execution
// =============================================================================

/// What the command loop should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Print(String),
    Quit,
}

/// Runs a command against the machine.
///
/// Commands that change the machine print the panel afterwards.
pub fn execute(command: Command, handle: &MachineHandle) -> AppResult<Outcome> {
    let output = match command {
        Command::Insert(denomination) => {
            handle.with_machine_mut(|m| m.insert_cash(denomination))?;
            handle.with_machine(|m| render_panel(m.state(), m.now()))
        }
        Command::Select(drink) => {
            handle.with_machine_mut(|m| m.select_drink(&drink))?;
            handle.with_machine(|m| render_panel(m.state(), m.now()))
        }
        Command::Confirm => {
            handle.with_machine_mut(|m| m.confirm_purchase())?;
            handle.with_machine(|m| render_panel(m.state(), m.now()))
        }
        Command::Card => {
            handle.with_machine_mut(|m| m.pay_with_card())?;
            handle.with_machine(|m| render_panel(m.state(), m.now()))
        }
        Command::Cancel => handle.with_machine_mut(|m| {
            m.cancel_transaction();
            render_panel(m.state(), m.now())
        }),
        Command::Recharge(amount) => {
            let balance = handle.with_machine_mut(|m| m.recharge_card(amount));
            format!("Card recharged by {}. Balance: {}", amount, balance)
        }
        Command::Tick(ticks) => handle.with_machine_mut(|m| {
            m.advance(ticks);
            render_panel(m.state(), m.now())
        }),
        Command::State { json: true } => {
            let snapshot = handle.with_machine(|m| m.snapshot());
            serde_json::to_string_pretty(&snapshot)?
        }
        Command::State { json: false } => handle.with_machine(|m| render_panel(m.state(), m.now())),
        Command::Help => HELP.to_string(),
        Command::Quit => return Ok(Outcome::Quit),
    };

    Ok(Outcome::Print(output))
}

// =============================================================================
// Rendering
// =============================================================================

/// Panel text for the customer.
///
/// ```text
/// [t=4] payment   inserted 1,500원   card 5,000원
///   cola     Cola      1,100원   5 left  ◄
///   water    Water       600원   3 left
///   coffee   Coffee      700원   sold out
///   selected Cola 1,100원   change due 400원
///   cash box: 10,000원 x2, 5,000원 x3, 1,000원 x11, 500원 x16, 100원 x20
/// ```
pub fn render_panel(state: &MachineState, now: Tick) -> String {
    let tx = &state.transaction;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "[t={}] {:<10} inserted {}   card {}",
        now,
        tx.status.to_string(),
        format_currency(tx.inserted_amount),
        format_currency(state.card_balance),
    );

    for drink in &state.drinks {
        let stock = if drink.in_stock() {
            format!("{} left", drink.stock)
        } else {
            "sold out".to_string()
        };
        let marker = if tx.selected_drink.as_deref() == Some(drink.id.as_str()) {
            "  ◄"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "  {:<8} {:<10} {:>8}   {}{}",
            drink.id,
            drink.name,
            format_currency(drink.price),
            stock,
            marker
        );
    }

    if tx.status != TransactionStatus::Complete {
        if let Some(drink) = state.selected_drink() {
            let _ = writeln!(
                out,
                "  selected {} {}   change due {}",
                drink.name,
                format_currency(drink.price),
                format_currency(state.change_due()),
            );
        }
    }

    let cash_box: Vec<String> = state
        .cash_inventory
        .iter()
        .map(|(d, n)| format!("{} x{}", d, n))
        .collect();
    let _ = writeln!(
        out,
        "  cash box: {}",
        if cash_box.is_empty() {
            "empty".to_string()
        } else {
            cash_box.join(", ")
        }
    );

    if let Some(message) = tx.error_message() {
        let _ = writeln!(out, "  ! {}", message);
    }

    if tx.status == TransactionStatus::Complete {
        if let Some(receipt) = &state.last_dispense {
            let _ = write!(out, "  Enjoy your {}!", receipt.drink_id);
            if !receipt.change.is_empty() {
                let coins: Vec<String> = receipt
                    .change
                    .iter()
                    .map(|(d, n)| format!("{} x{}", d, n))
                    .collect();
                let _ = write!(
                    out,
                    " Change: {} ({})",
                    receipt.change.total(),
                    coins.join(", ")
                );
            }
            out.push('\n');
        }
    }

    out.truncate(out.trim_end().len());
    out
}
