//! asaflow: operator CLI for asset issuance and settlement through a ledger node.

mod config;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use asaflow_gateway::RpcGateway;
use asaflow_types::{Address, AssetId};
use asaflow_utils::{init_logging, LogFormat};
use asaflow_wallet_core::{
    Account, AtomicSwap, DistributionPlan, DistributionShare, IdentityProvider,
    PhraseIdentityProvider, Wallet,
};
use clap::Parser;
use rust_decimal::Decimal;

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "asaflow", about = "Issue, swap and distribute ledger assets")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "ASAFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint of the ledger node.
    #[arg(long, env = "ASAFLOW_NODE_URL")]
    node_url: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ASAFLOW_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "ASAFLOW_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Account management.
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Native balance of an account (config name or address).
    Balance { account: String },
    /// Units of an asset held by an account (config name or address).
    Holding { account: String, asset_id: AssetId },
    /// Mint a new asset from a configured account.
    Issue {
        account: String,
        name: String,
        total: u64,
        /// Mint a fractional NFT with decimals derived from the total.
        #[arg(long)]
        fractional: bool,
    },
    /// Register a configured account for an asset.
    OptIn { account: String, asset_id: AssetId },
    /// Buyer pays `price` microunits, seller sends `amount` units, atomically.
    Swap {
        buyer: String,
        seller: String,
        asset_id: AssetId,
        amount: u64,
        price: u64,
    },
    /// Send fractions of an asset to recipients given as `address=fraction`.
    Distribute {
        issuer: String,
        asset_id: AssetId,
        #[arg(required = true)]
        shares: Vec<String>,
    },
}

#[derive(clap::Subcommand)]
enum AccountAction {
    /// Generate a new account and print its address and recovery phrase.
    New,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CliConfig::from_toml_file(path)?,
        None => CliConfig::default(),
    };
    if let Some(url) = cli.node_url {
        config.node_url = url;
    }
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }
    if let Some(format) = cli.log_format.as_deref() {
        config.log.format = parse_log_format(format)?;
    }

    init_logging(config.log.format, &config.log.level)?;
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    let gateway = RpcGateway::new(config.node_url.clone())?;
    let wallet = Wallet::new(gateway, config.wallet.clone())?;

    match cli.command {
        Command::Account {
            action: AccountAction::New,
        } => {
            let account = PhraseIdentityProvider.generate();
            println!("address: {}", account.address());
            println!("phrase:  {}", account.recovery_phrase()?);
        }
        Command::Balance { account } => {
            let address = resolve_address(&config, &account)?;
            let balance = wallet.account_balance(&address).await?;
            println!("{address}: {balance} microunits");
        }
        Command::Holding { account, asset_id } => {
            let address = resolve_address(&config, &account)?;
            let holding = wallet.asset_holding(&address, asset_id).await?;
            println!("{address}: asset {asset_id}: {holding}");
        }
        Command::Issue {
            account,
            name,
            total,
            fractional,
        } => {
            let issuer = load_account(&config, &account)?;
            let asset_id = if fractional {
                wallet.issue_fractional_asset(&issuer, &name, total).await?
            } else {
                wallet.issue_standard_asset(&issuer, &name, total).await?
            };
            println!("created asset {asset_id}");
        }
        Command::OptIn { account, asset_id } => {
            let account = load_account(&config, &account)?;
            let confirmation = wallet.opt_in(&account, asset_id).await?;
            println!(
                "{} opted in to asset {asset_id} in round {}",
                account.address(),
                confirmation.confirmed_round
            );
        }
        Command::Swap {
            buyer,
            seller,
            asset_id,
            amount,
            price,
        } => {
            let buyer = load_account(&config, &buyer)?;
            let seller = load_account(&config, &seller)?;
            let receipt = wallet
                .atomic_swap(AtomicSwap {
                    buyer: &buyer,
                    seller: &seller,
                    asset_id,
                    asset_amount: amount,
                    price,
                })
                .await?;
            println!(
                "group {} confirmed in round {}",
                receipt.group_id, receipt.confirmation.confirmed_round
            );
            for tx_id in &receipt.tx_ids {
                println!("  {tx_id}");
            }
        }
        Command::Distribute {
            issuer,
            asset_id,
            shares,
        } => {
            let issuer = load_account(&config, &issuer)?;
            let shares = shares
                .iter()
                .map(|raw| parse_share(&config, raw))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let plan = DistributionPlan::new(shares)?;
            let report = wallet.distribute(&issuer, asset_id, &plan).await?;
            println!("{report}");
            if !report.all_succeeded() {
                bail!("{} of {} transfers failed", report.failed().count(), report.outcomes.len());
            }
        }
    }

    Ok(())
}

fn parse_log_format(raw: &str) -> anyhow::Result<LogFormat> {
    match raw.to_lowercase().as_str() {
        "human" => Ok(LogFormat::Human),
        "json" => Ok(LogFormat::Json),
        other => bail!("unknown log format {other:?}, expected \"human\" or \"json\""),
    }
}

/// Recover a named account from the config's `[accounts]` table.
fn load_account(config: &CliConfig, name: &str) -> anyhow::Result<Account> {
    let phrase = config
        .phrase(name)
        .ok_or_else(|| anyhow!("no account named {name:?} in [accounts]"))?;
    PhraseIdentityProvider
        .recover(phrase)
        .with_context(|| format!("account {name:?}"))
}

/// A configured account name, or a literal address.
fn resolve_address(config: &CliConfig, raw: &str) -> anyhow::Result<Address> {
    if config.phrase(raw).is_some() {
        return Ok(load_account(config, raw)?.address().clone());
    }
    Address::parse(raw).with_context(|| format!("{raw:?} is neither a configured account nor an address"))
}

fn parse_share(config: &CliConfig, raw: &str) -> anyhow::Result<DistributionShare> {
    let (recipient, fraction) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("share {raw:?} must look like address=fraction"))?;
    let fraction = Decimal::from_str(fraction.trim())
        .with_context(|| format!("bad fraction in share {raw:?}"))?;
    Ok(DistributionShare::new(
        resolve_address(config, recipient.trim())?,
        fraction,
    ))
}
