//! Ledger round numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A ledger round. Transactions are valid within a window of rounds and
/// become final in the round that confirms them.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Round(u64);

impl Round {
    pub const ZERO: Self = Self(0);

    pub fn new(round: u64) -> Self {
        Self(round)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// The round immediately after this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn saturating_add(self, rounds: u64) -> Self {
        Self(self.0.saturating_add(rounds))
    }

    /// Number of rounds from `earlier` to `self` (zero if `earlier` is later).
    pub fn since(&self, earlier: Round) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
