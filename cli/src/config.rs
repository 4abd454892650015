//! CLI configuration file.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use asaflow_utils::LogFormat;
use asaflow_wallet_core::WalletConfig;
use serde::Deserialize;

/// Contents of the `--config` TOML file. Every section is optional.
#[derive(Clone, Deserialize)]
pub struct CliConfig {
    /// JSON-RPC endpoint of the ledger node.
    #[serde(default = "default_node_url")]
    pub node_url: String,

    #[serde(default)]
    pub log: LogConfig,

    /// Named accounts and their recovery phrases.
    #[serde(default)]
    pub accounts: BTreeMap<String, String>,

    #[serde(default)]
    pub wallet: WalletConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_node_url() -> String {
    "http://127.0.0.1:4001".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_log_level(),
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            node_url: default_node_url(),
            log: LogConfig::default(),
            accounts: BTreeMap::new(),
            wallet: WalletConfig::default(),
        }
    }
}

impl CliConfig {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("invalid configuration")?;
        config.wallet.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn phrase(&self, name: &str) -> Option<&str> {
        self.accounts.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asaflow_wallet_core::DecimalsPolicy;
    use std::io::Write;

    #[test]
    fn empty_file_uses_defaults() {
        let config = CliConfig::from_toml_str("").unwrap();
        assert_eq!(config.node_url, "http://127.0.0.1:4001");
        assert_eq!(config.log, LogConfig::default());
        assert!(config.accounts.is_empty());
        assert_eq!(config.wallet, WalletConfig::default());
    }

    #[test]
    fn sections_are_read() {
        let toml = r#"
            node_url = "http://node:8080"

            [log]
            format = "json"
            level = "debug"

            [accounts]
            issuer = "abandon abandon art"

            [wallet]
            decimals_policy = "truncate"

            [wallet.confirmation]
            max_rounds = 8
        "#;
        let config = CliConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.node_url, "http://node:8080");
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.phrase("issuer"), Some("abandon abandon art"));
        assert_eq!(config.phrase("nobody"), None);
        assert_eq!(config.wallet.decimals_policy, DecimalsPolicy::Truncate);
        assert_eq!(config.wallet.confirmation.max_rounds, 8);
    }

    #[test]
    fn invalid_wallet_section_rejected() {
        assert!(CliConfig::from_toml_str("[wallet.fee]\nflat_fee = 1").is_err());
    }

    #[test]
    fn reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "node_url = \"http://10.0.0.1:4001\"").unwrap();
        let config = CliConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.node_url, "http://10.0.0.1:4001");
    }

    #[test]
    fn missing_file_names_path() {
        let err = CliConfig::from_toml_file(Path::new("/nonexistent/asaflow.toml"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("/nonexistent/asaflow.toml"));
    }
}
