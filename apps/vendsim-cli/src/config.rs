//! # Application Configuration
//!
//! Where the machine's seed data and the real-time tick rate come from.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VENDSIM_CARD_BALANCE=3000                                          │
//! │     VENDSIM_FAILURE_RATE=0.5                                           │
//! │     VENDSIM_TICK_MS=250                                                │
//! │     VENDSIM_SEED=42                                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/vendsim/vendsim.toml (Linux)                             │
//! │     ~/Library/Application Support/dev.vendsim.vendsim/ (macOS)         │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Factory stock, 1000 ms per tick, unseeded card network             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! tick_ms = 500
//! seed = 7
//!
//! [machine]
//! card_balance = 3000
//! card_failure_rate = 0.15
//!
//! [machine.timing]
//! processing_delay = 2
//! card_delay = 3
//!
//! [[machine.drinks]]
//! id = "cola"
//! name = "Cola"
//! price = 1100
//! stock = 5
//!
//! [machine.cash_inventory]
//! 1000 = 10
//! 500 = 15
//! 100 = 20
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};
use vendsim_core::validation::validate_delay;
use vendsim_core::{MachineConfig, Money};

use crate::error::{AppError, AppResult};

/// Name of the config file looked up in the platform config dir.
pub const CONFIG_FILE_NAME: &str = "vendsim.toml";

fn default_tick_ms() -> u64 {
    1000
}

/// Complete CLI configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Seed data and simulation parameters for the machine.
    #[serde(default)]
    pub machine: MachineConfig,

    /// Wall-clock milliseconds per simulation tick.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Seed for the card network. Unset means OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            machine: MachineConfig::default(),
            tick_ms: default_tick_ms(),
            seed: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`vendsim.toml`)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` that does not exist is an error; a missing
    /// file in the default location is not.
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Reads and parses a TOML config file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        self.machine.validate()?;
        validate_delay("tick_ms", self.tick_ms)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) -> AppResult<()> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Applies `VENDSIM_*` overrides read through `lookup`.
    ///
    /// Unset variables are skipped; values that do not parse are rejected.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(balance) = parse_var::<u64, _>(&lookup, "VENDSIM_CARD_BALANCE")? {
            debug!(balance, "Overriding card balance from environment");
            self.machine.card_balance = Money::new(balance);
        }

        if let Some(rate) = parse_var::<f64, _>(&lookup, "VENDSIM_FAILURE_RATE")? {
            debug!(rate, "Overriding card failure rate from environment");
            self.machine.card_failure_rate = rate;
        }

        if let Some(tick_ms) = parse_var(&lookup, "VENDSIM_TICK_MS")? {
            self.tick_ms = tick_ms;
        }

        if let Some(seed) = parse_var(&lookup, "VENDSIM_SEED")? {
            debug!(seed, "Seeding card network from environment");
            self.seed = Some(seed);
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "vendsim", "vendsim")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

fn parse_var<T, F>(lookup: &F, var: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };

    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| AppError::InvalidEnv {
            var: var.to_string(),
            value,
        })
}
