//! In-memory ledger state and the rules for applying a transaction to it.

use std::collections::{BTreeMap, HashMap};

use asaflow_gateway::{AccountInfo, AssetHolding, AssetInfo, Rejection};
use asaflow_transactions::Transaction;
use asaflow_types::params::MIN_TXN_FEE;
use asaflow_types::{Address, AssetId, Round, TxId};

/// First id handed out to a created asset.
const FIRST_ASSET_ID: u64 = 1_001;

#[derive(Clone, Debug, Default)]
pub(crate) struct AccountState {
    pub amount: u64,
    pub holdings: BTreeMap<AssetId, u64>,
    pub created: Vec<AssetId>,
}

#[derive(Clone, Debug)]
pub(crate) struct TxRecord {
    pub submitted_round: Round,
    pub asset_index: Option<AssetId>,
}

#[derive(Clone, Debug)]
pub(crate) struct LedgerState {
    pub round: Round,
    pub accounts: BTreeMap<Address, AccountState>,
    pub assets: BTreeMap<AssetId, AssetInfo>,
    pub next_asset_id: u64,
    pub txs: HashMap<TxId, TxRecord>,
}

impl LedgerState {
    pub fn new(round: Round) -> Self {
        Self {
            round,
            accounts: BTreeMap::new(),
            assets: BTreeMap::new(),
            next_asset_id: FIRST_ASSET_ID,
            txs: HashMap::new(),
        }
    }

    pub fn account_info(&self, address: &Address) -> Option<AccountInfo> {
        let account = self.accounts.get(address)?;
        Some(AccountInfo {
            address: address.clone(),
            amount: account.amount,
            min_balance: 0,
            assets: account
                .holdings
                .iter()
                .map(|(asset_id, amount)| AssetHolding {
                    asset_id: *asset_id,
                    amount: *amount,
                    frozen: false,
                })
                .collect(),
            created_assets: account.created.clone(),
        })
    }

    /// Apply one transaction. Returns the id of a created asset, if any.
    ///
    /// On error the state may be partially modified; callers apply batches to
    /// a copy and keep it only if every member succeeds.
    pub fn apply(&mut self, tx: &Transaction) -> Result<Option<AssetId>, Rejection> {
        let sender = tx.sender().clone();
        if tx.fee() < MIN_TXN_FEE {
            return Err(Rejection::Other {
                reason: format!("fee {} below minimum {MIN_TXN_FEE}", tx.fee()),
            });
        }
        self.debit(&sender, tx.fee())?;

        match tx {
            Transaction::Payment(pay) => {
                self.debit(&sender, pay.amount)?;
                let receiver = self.accounts.entry(pay.receiver.clone()).or_default();
                receiver.amount = receiver.amount.saturating_add(pay.amount);
                Ok(None)
            }
            Transaction::AssetConfig(cfg) => {
                let asset_id = AssetId::new(self.next_asset_id);
                self.next_asset_id += 1;
                self.assets.insert(
                    asset_id,
                    AssetInfo {
                        id: asset_id,
                        creator: sender.clone(),
                        total: cfg.params.total,
                        decimals: cfg.params.decimals,
                        unit_name: cfg.params.unit_name.clone(),
                        asset_name: cfg.params.asset_name.clone(),
                    },
                );
                let creator = self.accounts.entry(sender).or_default();
                creator.holdings.insert(asset_id, cfg.params.total);
                creator.created.push(asset_id);
                Ok(Some(asset_id))
            }
            Transaction::AssetOptIn(opt) => {
                self.require_asset(opt.asset_id)?;
                self.accounts
                    .entry(sender)
                    .or_default()
                    .holdings
                    .entry(opt.asset_id)
                    .or_insert(0);
                Ok(None)
            }
            Transaction::AssetTransfer(xfer) => {
                self.require_asset(xfer.asset_id)?;
                let receiver_opted_in = self
                    .accounts
                    .get(&xfer.receiver)
                    .is_some_and(|a| a.holdings.contains_key(&xfer.asset_id));
                if !receiver_opted_in {
                    return Err(Rejection::NotOptedIn {
                        address: xfer.receiver.clone(),
                        asset_id: xfer.asset_id,
                    });
                }

                let holding = self
                    .accounts
                    .get_mut(&sender)
                    .and_then(|a| a.holdings.get_mut(&xfer.asset_id))
                    .ok_or_else(|| Rejection::NotOptedIn {
                        address: sender.clone(),
                        asset_id: xfer.asset_id,
                    })?;
                if *holding < xfer.amount {
                    return Err(Rejection::InsufficientFunds {
                        address: sender,
                        needed: xfer.amount,
                        available: *holding,
                    });
                }
                *holding -= xfer.amount;

                if let Some(held) = self
                    .accounts
                    .get_mut(&xfer.receiver)
                    .and_then(|a| a.holdings.get_mut(&xfer.asset_id))
                {
                    *held = held.saturating_add(xfer.amount);
                }
                Ok(None)
            }
        }
    }

    fn debit(&mut self, address: &Address, amount: u64) -> Result<(), Rejection> {
        let available = self.accounts.get(address).map_or(0, |a| a.amount);
        if available < amount {
            return Err(Rejection::InsufficientFunds {
                address: address.clone(),
                needed: amount,
                available,
            });
        }
        if let Some(account) = self.accounts.get_mut(address) {
            account.amount -= amount;
        }
        Ok(())
    }

    fn require_asset(&self, asset_id: AssetId) -> Result<(), Rejection> {
        if self.assets.contains_key(&asset_id) {
            Ok(())
        } else {
            Err(Rejection::Other {
                reason: format!("asset {asset_id} does not exist"),
            })
        }
    }
}
