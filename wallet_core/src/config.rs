//! Wallet configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use asaflow_types::params::MIN_TXN_FEE;
use asaflow_types::SuggestedParams;

use crate::WalletError;

/// Configuration for wallet operations.
///
/// Can be loaded from a TOML file via [`WalletConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// How fractional issuance treats totals that are not powers of ten.
    #[serde(default)]
    pub decimals_policy: DecimalsPolicy,

    #[serde(default)]
    pub fee: FeeConfig,

    #[serde(default)]
    pub confirmation: ConfirmationConfig,
}

/// How transaction fees are chosen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Use the node's suggested per-byte fee instead of `flat_fee`.
    #[serde(default)]
    pub use_suggested: bool,

    /// Absolute fee in microunits paid by every transaction.
    #[serde(default = "default_flat_fee")]
    pub flat_fee: u64,
}

/// Round budget and retry policy for confirmation waits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    /// Status queries made before giving up.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u64,

    /// Retries of a single query after a transient failure.
    #[serde(default = "default_transient_retries")]
    pub transient_retries: u32,

    /// Delay before the first retry; doubles on each following retry.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

/// Handling of fractional totals that are not an exact power of ten.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalsPolicy {
    /// Reject the total.
    #[default]
    Strict,
    /// Use `floor(log10(total))` decimals anyway.
    Truncate,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_flat_fee() -> u64 {
    MIN_TXN_FEE
}

fn default_max_rounds() -> u64 {
    4
}

fn default_transient_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    250
}

// ── Impl ───────────────────────────────────────────────────────────────

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            use_suggested: false,
            flat_fee: default_flat_fee(),
        }
    }
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            transient_retries: default_transient_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl FeeConfig {
    /// Apply this fee policy to freshly fetched params.
    pub fn apply(&self, params: SuggestedParams) -> SuggestedParams {
        if self.use_suggested {
            params
        } else {
            params.with_flat_fee(self.flat_fee)
        }
    }
}

impl ConfirmationConfig {
    /// Delay before retry number `attempt` (starting at 1).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }
}

impl WalletConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, WalletError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| WalletError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, WalletError> {
        let config: Self = toml::from_str(s).map_err(|e| WalletError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, WalletError> {
        toml::to_string_pretty(self).map_err(|e| WalletError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), WalletError> {
        if !self.fee.use_suggested && self.fee.flat_fee < MIN_TXN_FEE {
            return Err(WalletError::Config(format!(
                "flat fee {} is below the minimum of {MIN_TXN_FEE}",
                self.fee.flat_fee
            )));
        }
        if self.confirmation.max_rounds == 0 {
            return Err(WalletError::Config("max_rounds must be at least 1".into()));
        }
        Ok(())
    }
}
