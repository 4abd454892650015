//! Nullable ledger: a closed in-memory ledger behind the gateway trait.

use std::cell::{Cell, RefCell};

use asaflow_gateway::{
    AccountInfo, AssetInfo, GatewayError, LedgerGateway, Rejection, TransactionStatus,
};
use asaflow_transactions::encoding::decode_signed_batch;
use asaflow_transactions::{compute_group_id, SignedTransaction, Transaction};
use asaflow_types::{Address, AssetId, Round, SuggestedParams, TxId};

use crate::state::{LedgerState, TxRecord};

/// Genesis id of the in-memory network.
pub const GENESIS_ID: &str = "nullnet-v1";

/// Genesis hash of the in-memory network.
pub const GENESIS_HASH: [u8; 32] = [0x4e; 32];

/// Round the ledger starts at.
pub const START_ROUND: u64 = 1_000;

/// Validity window handed out in suggested params.
const PARAMS_WINDOW: u64 = 1_000;

#[derive(Debug, Default)]
struct Faults {
    never_confirm: bool,
    failing_status_queries: usize,
    failing_submits: usize,
}

/// A test ledger that applies submissions in memory.
///
/// Effects of an accepted submission are visible in account state at once;
/// the transaction reports a confirmed round once the ledger has advanced
/// `confirm_after` rounds past the round it was submitted in. Rounds only
/// advance through `wait_for_round_after` or [`NullLedger::advance`].
pub struct NullLedger {
    state: RefCell<LedgerState>,
    faults: RefCell<Faults>,
    confirm_after: Cell<u64>,
    submitted: RefCell<Vec<Vec<SignedTransaction>>>,
    submit_calls: Cell<usize>,
    status_queries: Cell<usize>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(LedgerState::new(Round::new(START_ROUND))),
            faults: RefCell::new(Faults::default()),
            confirm_after: Cell::new(1),
            submitted: RefCell::new(Vec::new()),
            submit_calls: Cell::new(0),
            status_queries: Cell::new(0),
        }
    }

    /// Credit `amount` microunits to `address`, creating the account if needed.
    pub fn fund(&self, address: &Address, amount: u64) {
        let mut state = self.state.borrow_mut();
        let account = state.accounts.entry(address.clone()).or_default();
        account.amount = account.amount.saturating_add(amount);
    }

    /// Number of rounds between submission and confirmation.
    pub fn set_confirm_after(&self, rounds: u64) {
        self.confirm_after.set(rounds);
    }

    /// Accept submissions but never report them confirmed.
    pub fn never_confirm(&self) {
        self.faults.borrow_mut().never_confirm = true;
    }

    /// Make the next `n` status queries fail with a transport error.
    pub fn fail_next_status_queries(&self, n: usize) {
        self.faults.borrow_mut().failing_status_queries = n;
    }

    /// Make the next `n` submissions fail with a transport error before reaching the ledger.
    pub fn fail_next_submits(&self, n: usize) {
        self.faults.borrow_mut().failing_submits = n;
    }

    /// Advance the ledger by `rounds`.
    pub fn advance(&self, rounds: u64) {
        let mut state = self.state.borrow_mut();
        state.round = state.round.saturating_add(rounds);
    }

    pub fn round(&self) -> Round {
        self.state.borrow().round
    }

    /// Calls made to `submit`, accepted or not.
    pub fn submit_calls(&self) -> usize {
        self.submit_calls.get()
    }

    /// Calls made to `transaction_status`, including injected failures.
    pub fn status_queries(&self) -> usize {
        self.status_queries.get()
    }

    /// Every accepted batch, in submission order.
    pub fn submitted(&self) -> Vec<Vec<SignedTransaction>> {
        self.submitted.borrow().clone()
    }

    fn check_batch(&self, batch: &[SignedTransaction]) -> Result<(), Rejection> {
        let Some(first) = batch.first() else {
            return Err(Rejection::Other {
                reason: "empty submission".into(),
            });
        };

        let group = first.txn.group().copied();
        if batch.len() > 1 || group.is_some() {
            let Some(group) = group else {
                return Err(Rejection::InvalidGroup {
                    reason: "batch of several transactions without a group id".into(),
                });
            };
            if batch.iter().any(|s| s.txn.group() != Some(&group)) {
                return Err(Rejection::InvalidGroup {
                    reason: "members carry different group ids".into(),
                });
            }
            let cleared: Vec<Transaction> = batch
                .iter()
                .map(|s| {
                    let mut tx = s.txn.clone();
                    tx.header_mut().group = None;
                    tx
                })
                .collect();
            let expected = compute_group_id(&cleared).map_err(|e| Rejection::InvalidGroup {
                reason: e.to_string(),
            })?;
            if expected != group {
                return Err(Rejection::InvalidGroup {
                    reason: format!("group id {group} does not match members"),
                });
            }
        }

        let round = self.round();
        for signed in batch {
            let tx_id = signed.tx_id().map_err(|e| Rejection::Other {
                reason: e.to_string(),
            })?;
            signed
                .verify()
                .map_err(|_| Rejection::InvalidSignature { tx_id })?;

            let header = signed.txn.header();
            if header.genesis_hash != GENESIS_HASH {
                return Err(Rejection::Other {
                    reason: "transaction is for another network".into(),
                });
            }
            if round < header.first_valid || round > header.last_valid {
                return Err(Rejection::Other {
                    reason: format!(
                        "round {round} outside validity window {}..={}",
                        header.first_valid, header.last_valid
                    ),
                });
            }
            if self.state.borrow().txs.contains_key(&tx_id) {
                return Err(Rejection::Other {
                    reason: format!("transaction {tx_id} already in ledger"),
                });
            }
        }
        Ok(())
    }

    fn apply_batch(&self, batch: &[SignedTransaction]) -> Result<TxId, Rejection> {
        self.check_batch(batch)?;

        let mut next = self.state.borrow().clone();
        let mut first_id = None;
        for signed in batch {
            let asset_index = next.apply(&signed.txn)?;
            let tx_id = signed.tx_id().map_err(|e| Rejection::Other {
                reason: e.to_string(),
            })?;
            first_id.get_or_insert(tx_id);
            next.txs.insert(
                tx_id,
                TxRecord {
                    submitted_round: next.round,
                    asset_index,
                },
            );
        }
        *self.state.borrow_mut() = next;

        first_id.ok_or_else(|| Rejection::Other {
            reason: "empty submission".into(),
        })
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerGateway for NullLedger {
    async fn suggested_params(&self) -> Result<SuggestedParams, GatewayError> {
        let round = self.round();
        Ok(SuggestedParams {
            fee: 0,
            flat_fee: false,
            first_valid: round,
            last_valid: round.saturating_add(PARAMS_WINDOW),
            genesis_id: GENESIS_ID.into(),
            genesis_hash: GENESIS_HASH,
        })
    }

    async fn account_info(&self, address: &Address) -> Result<AccountInfo, GatewayError> {
        self.state
            .borrow()
            .account_info(address)
            .ok_or_else(|| GatewayError::AccountNotFound(address.clone()))
    }

    async fn asset_info(&self, asset_id: AssetId) -> Result<AssetInfo, GatewayError> {
        self.state
            .borrow()
            .assets
            .get(&asset_id)
            .cloned()
            .ok_or(GatewayError::AssetNotFound(asset_id))
    }

    async fn submit(&self, signed_bytes: &[u8]) -> Result<TxId, GatewayError> {
        self.submit_calls.set(self.submit_calls.get() + 1);
        {
            let mut faults = self.faults.borrow_mut();
            if faults.failing_submits > 0 {
                faults.failing_submits -= 1;
                return Err(GatewayError::Transport("injected submit failure".into()));
            }
        }

        let batch = decode_signed_batch(signed_bytes).map_err(|e| {
            GatewayError::Rejected(Rejection::Other {
                reason: format!("malformed submission: {e}"),
            })
        })?;

        match self.apply_batch(&batch) {
            Ok(tx_id) => {
                tracing::debug!(tx_id = %tx_id, members = batch.len(), "null ledger accepted batch");
                self.submitted.borrow_mut().push(batch);
                Ok(tx_id)
            }
            Err(rejection) => {
                tracing::debug!(%rejection, "null ledger rejected batch");
                Err(GatewayError::Rejected(rejection))
            }
        }
    }

    async fn transaction_status(&self, tx_id: &TxId) -> Result<TransactionStatus, GatewayError> {
        self.status_queries.set(self.status_queries.get() + 1);
        {
            let mut faults = self.faults.borrow_mut();
            if faults.failing_status_queries > 0 {
                faults.failing_status_queries -= 1;
                return Err(GatewayError::Transport("injected status failure".into()));
            }
            if faults.never_confirm {
                return Ok(TransactionStatus::pending());
            }
        }

        let state = self.state.borrow();
        let record = state
            .txs
            .get(tx_id)
            .ok_or(GatewayError::TransactionNotFound(*tx_id))?;
        let confirmed_at = record.submitted_round.saturating_add(self.confirm_after.get());
        if state.round < confirmed_at {
            return Ok(TransactionStatus::pending());
        }
        Ok(TransactionStatus {
            confirmed_round: Some(confirmed_at),
            asset_index: record.asset_index,
            pool_error: None,
        })
    }

    async fn last_round(&self) -> Result<Round, GatewayError> {
        Ok(self.round())
    }

    async fn wait_for_round_after(&self, round: Round) -> Result<Round, GatewayError> {
        let mut state = self.state.borrow_mut();
        if state.round <= round {
            state.round = round.next();
        }
        Ok(state.round)
    }
}
