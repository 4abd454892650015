//! Nullable infrastructure for deterministic testing.
//!
//! [`NullLedger`] stands in for a ledger node behind `LedgerGateway`. It:
//! - Applies submissions to in-memory state, all-or-nothing per batch
//! - Checks signatures, group ids, validity windows, opt-ins and balances
//! - Confirms by round only when the test lets rounds advance
//! - Counts calls and injects faults on request
//!
//! Usage: construct one per test, fund the accounts the test needs, and pass
//! it wherever a gateway is expected.

pub mod ledger;
mod state;

pub use ledger::NullLedger;
