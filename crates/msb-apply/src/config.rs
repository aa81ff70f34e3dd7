//! Ledger economics configuration.
//!
//! Every replica must run with identical values; they are part of the
//! deterministic transition function, not local tuning knobs.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use msb_core::{Balance, ErrorCode, PERCENT_SCALE};

/// Basis points paid to the validator out of each fee (75.00%)
pub const DEFAULT_VALIDATOR_REWARD_PERCENT: u32 = 7_500;

/// Configuration loading or validation failure
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// File is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Value out of range
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            ConfigError::Io(_) => "config_io",
            ConfigError::Parse(_) => "config_parse",
            ConfigError::Invalid { .. } => "config_invalid",
        }
    }
}

/// Fee, stake and bootstrap amounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Flat fee charged per operation
    pub fee: Balance,
    /// Amount locked when a participant becomes a writer
    pub writer_stake: Balance,
    /// Balance credited to the admin by add-admin
    pub admin_initial_balance: Balance,
    /// Stake recorded for the admin by add-admin
    pub admin_initial_stake: Balance,
    /// Share of the fee paid to the validator, in basis points
    pub validator_reward_percent: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            fee: Balance::from_raw(Balance::ONE.raw() / 100 * 3),
            writer_stake: Balance::whole(10),
            admin_initial_balance: Balance::whole(1_000),
            admin_initial_stake: Balance::whole(10),
            validator_reward_percent: DEFAULT_VALIDATOR_REWARD_PERCENT,
        }
    }
}

impl LedgerConfig {
    /// Parse from TOML text and validate
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: LedgerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file and validate
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if u128::from(self.validator_reward_percent) > PERCENT_SCALE.raw() {
            return Err(ConfigError::Invalid {
                field: "validator_reward_percent",
                reason: "exceeds 10000 basis points",
            });
        }
        if self.writer_stake.is_zero() {
            return Err(ConfigError::Invalid {
                field: "writer_stake",
                reason: "must be positive",
            });
        }
        Ok(())
    }

    /// Reward percentage as a balance-scaled factor
    pub fn reward_factor(&self) -> Balance {
        Balance::from_raw(u128::from(self.validator_reward_percent))
    }
}
