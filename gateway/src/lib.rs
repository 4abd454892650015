//! The seam between the wallet core and a ledger node.
//!
//! [`LedgerGateway`] is everything the core needs from a ledger: suggested
//! params, account and asset state, submission of signed bytes and per-round
//! confirmation status. [`RpcGateway`] speaks to a real node over JSON-RPC;
//! tests use the in-memory ledger from `asaflow-nullables`.

pub mod error;
pub mod ledger;
pub mod rpc;

pub use error::{GatewayError, Rejection};
pub use ledger::{AccountInfo, AssetHolding, AssetInfo, LedgerGateway, TransactionStatus};
pub use rpc::RpcGateway;
