//! # Vendsim CLI
//!
//! Terminal front panel for the vending machine simulator.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Application Startup Flow                             │
//! │                                                                         │
//! │  1. Initialize Logging ─────────────────────────────────────────────►  │
//! │     • tracing-subscriber with env filter, written to stderr            │
//! │     • Default: INFO, can be overridden with RUST_LOG                   │
//! │                                                                         │
//! │  2. Load Configuration ─────────────────────────────────────────────►  │
//! │     • --config <path> or platform config dir                           │
//! │     • VENDSIM_* environment overrides                                  │
//! │                                                                         │
//! │  3. Build Machine ──────────────────────────────────────────────────►  │
//! │     • Validate seed data, seed the card network                        │
//! │                                                                         │
//! │  4. Start Ticker ───────────────────────────────────────────────────►  │
//! │     • advance(1) every tick_ms                                         │
//! │                                                                         │
//! │  5. Command Loop ───────────────────────────────────────────────────►  │
//! │     • One line per command until `quit` or EOF                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod commands;
mod config;
mod error;
mod state;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vendsim_engine::VendingMachine;

use commands::{execute, render_panel, Command, Outcome, HELP};
use config::AppConfig;
use error::{AppError, AppResult};
use state::{spawn_ticker, MachineHandle};

const USAGE: &str = "Usage: vendsim [--config <path>]";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "vendsim exited with an error");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> AppResult<()> {
    let Some(config_path) = parse_args(std::env::args().skip(1))? else {
        println!("{}", USAGE);
        return Ok(());
    };

    let config = AppConfig::load(config_path)?;
    let machine = VendingMachine::with_random(&config.machine, config.seed)?;
    info!(tick_ms = config.tick_ms, seeded = config.seed.is_some(), "Starting vendsim");

    let handle = MachineHandle::new(machine);
    let ticker = spawn_ticker(handle.clone(), Duration::from_millis(config.tick_ms));

    println!("{}\n", HELP);
    println!("{}", handle.with_machine(|m| render_panel(m.state(), m.now())));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>().and_then(|command| execute(command, &handle)) {
            Ok(Outcome::Print(text)) => println!("{}", text),
            Ok(Outcome::Quit) => break,
            Err(e) => println!("{}", e),
        }
    }

    ticker.shutdown().await;
    info!("Goodbye");
    Ok(())
}

/// Reads `--config <path>`. `Ok(None)` means `--help` was asked for.
fn parse_args(mut args: impl Iterator<Item = String>) -> AppResult<Option<Option<PathBuf>>> {
    let mut config_path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let path = args.next().ok_or(AppError::Usage(USAGE))?;
                config_path = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Ok(None),
            _ => return Err(AppError::Usage(USAGE)),
        }
    }

    Ok(Some(config_path))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show timer scheduling and suppressed timers
/// - `RUST_LOG=vendsim_engine=trace` - Everything from the engine
///
/// Logs go to stderr so they do not interleave with the panel on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args(args(&[])).unwrap(), Some(None));
        assert_eq!(
            parse_args(args(&["--config", "/tmp/v.toml"])).unwrap(),
            Some(Some(PathBuf::from("/tmp/v.toml")))
        );
        assert_eq!(parse_args(args(&["-h"])).unwrap(), None);
        assert!(parse_args(args(&["--config"])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
    }
}
