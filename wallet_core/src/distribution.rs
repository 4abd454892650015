//! Fractional distribution: one independent transfer per recipient.
//!
//! A distribution is a batch of separate transactions, not an atomic group.
//! A failed recipient does not undo earlier ones; the report says which
//! recipients received their share and why the others did not.

use std::collections::HashSet;
use std::fmt;

use asaflow_gateway::LedgerGateway;
use asaflow_transactions::{build_asset_transfer, Signers};
use asaflow_types::{Address, AssetId, SuggestedParams};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::account::Account;
use crate::confirmation::Confirmation;
use crate::wallet::Wallet;
use crate::WalletError;

/// One recipient and the fraction of the total it receives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistributionShare {
    pub recipient: Address,
    pub fraction: Decimal,
}

impl DistributionShare {
    pub fn new(recipient: Address, fraction: Decimal) -> Self {
        Self {
            recipient,
            fraction,
        }
    }

    /// Base units this share receives out of `total`: `floor(fraction × total)`.
    pub fn amount_of(&self, total: u64) -> Result<u64, WalletError> {
        self.fraction
            .checked_mul(Decimal::from(total))
            .and_then(|product| product.floor().to_u64())
            .ok_or_else(|| {
                WalletError::InvalidParameter(format!(
                    "share {} of {total} is out of range",
                    self.fraction
                ))
            })
    }
}

/// An ordered, validated list of shares.
///
/// Every fraction lies in `(0, 1]`, the fractions sum to at most 1 and no
/// recipient appears twice. Whatever is not allocated stays with the issuer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistributionPlan {
    shares: Vec<DistributionShare>,
}

impl DistributionPlan {
    pub fn new(shares: Vec<DistributionShare>) -> Result<Self, WalletError> {
        if shares.is_empty() {
            return Err(WalletError::InvalidParameter(
                "distribution plan is empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        let mut sum = Decimal::ZERO;
        for share in &shares {
            if share.fraction <= Decimal::ZERO || share.fraction > Decimal::ONE {
                return Err(WalletError::InvalidParameter(format!(
                    "fraction {} for {} is outside (0, 1]",
                    share.fraction, share.recipient
                )));
            }
            if !seen.insert(&share.recipient) {
                return Err(WalletError::InvalidParameter(format!(
                    "{} appears more than once",
                    share.recipient
                )));
            }
            sum += share.fraction;
        }
        if sum > Decimal::ONE {
            return Err(WalletError::InvalidParameter(format!(
                "fractions sum to {sum}, more than the whole asset"
            )));
        }

        Ok(Self { shares })
    }

    pub fn shares(&self) -> &[DistributionShare] {
        &self.shares
    }

    /// Sum of all fractions.
    pub fn allocated(&self) -> Decimal {
        self.shares.iter().map(|s| s.fraction).sum()
    }
}

/// What happened to one recipient's share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipientOutcome {
    pub recipient: Address,
    pub fraction: Decimal,
    pub amount: u64,
    pub result: Result<Confirmation, WalletError>,
}

impl RecipientOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-recipient results of a distribution, in plan order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistributionReport {
    pub asset_id: AssetId,
    pub total: u64,
    pub outcomes: Vec<RecipientOutcome>,
}

impl DistributionReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &RecipientOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &RecipientOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(RecipientOutcome::is_success)
    }

    /// Base units that reached recipients.
    pub fn distributed(&self) -> u64 {
        self.succeeded().map(|o| o.amount).sum()
    }

    /// Base units left with the issuer.
    pub fn unallocated(&self) -> u64 {
        self.total.saturating_sub(self.distributed())
    }
}

impl fmt::Display for DistributionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(confirmation) => writeln!(
                    f,
                    "{} <- {} ({}) confirmed in round {}",
                    outcome.recipient, outcome.amount, outcome.fraction, confirmation.confirmed_round
                )?,
                Err(e) => writeln!(f, "{} <- {} failed: {e}", outcome.recipient, outcome.amount)?,
            }
        }
        write!(
            f,
            "distributed {} of {}, {} left with issuer",
            self.distributed(),
            self.total,
            self.unallocated()
        )
    }
}

impl<G: LedgerGateway> Wallet<G> {
    /// Send each share of `asset_id` from `issuer` to its recipient, in plan order.
    ///
    /// Errors only when the batch cannot start (the asset cannot be read or the
    /// params cannot be fetched); per-recipient failures are in the report.
    pub async fn distribute(
        &self,
        issuer: &Account,
        asset_id: AssetId,
        plan: &DistributionPlan,
    ) -> Result<DistributionReport, WalletError> {
        let total = self.gateway().asset_info(asset_id).await?.total;
        let params = self.params().await?;
        let signers = Signers::new().add(issuer.keypair());

        let mut outcomes = Vec::with_capacity(plan.shares().len());
        for share in plan.shares() {
            let (amount, result) = match share.amount_of(total) {
                Ok(amount) => (
                    amount,
                    self.send_share(&signers, issuer, &params, share, asset_id, amount)
                        .await,
                ),
                Err(e) => (0, Err(e)),
            };
            if let Err(e) = &result {
                tracing::warn!(
                    recipient = %share.recipient,
                    asset_id = %asset_id,
                    amount,
                    error = %e,
                    "distribution to recipient failed"
                );
            }
            outcomes.push(RecipientOutcome {
                recipient: share.recipient.clone(),
                fraction: share.fraction,
                amount,
                result,
            });
        }

        let report = DistributionReport {
            asset_id,
            total,
            outcomes,
        };
        tracing::info!(
            asset_id = %asset_id,
            succeeded = report.succeeded().count(),
            failed = report.failed().count(),
            distributed = report.distributed(),
            unallocated = report.unallocated(),
            "distribution finished"
        );
        Ok(report)
    }

    async fn send_share(
        &self,
        signers: &Signers<'_>,
        issuer: &Account,
        params: &SuggestedParams,
        share: &DistributionShare,
        asset_id: AssetId,
        amount: u64,
    ) -> Result<Confirmation, WalletError> {
        if amount == 0 {
            return Err(WalletError::InvalidParameter(format!(
                "share {} rounds down to zero units",
                share.fraction
            )));
        }
        let tx = build_asset_transfer(issuer.address(), params, &share.recipient, amount, asset_id)?;
        let signed = signers.sign(tx)?;
        self.submit_single(signed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn share(seed: u8, fraction: &str) -> DistributionShare {
        DistributionShare::new(
            Account::from_seed(&[seed; 32]).address().clone(),
            Decimal::from_str(fraction).unwrap(),
        )
    }

    #[test]
    fn amounts_floor_exactly() {
        assert_eq!(share(1, "0.40").amount_of(100).unwrap(), 40);
        assert_eq!(share(1, "0.30").amount_of(100).unwrap(), 30);
        assert_eq!(share(1, "0.20").amount_of(100).unwrap(), 20);
        assert_eq!(share(1, "0.333").amount_of(10).unwrap(), 3);
        assert_eq!(share(1, "1").amount_of(u64::MAX).unwrap(), u64::MAX);
    }

    #[test]
    fn plan_keeps_order_and_remainder() {
        let plan =
            DistributionPlan::new(vec![share(1, "0.40"), share(2, "0.30"), share(3, "0.20")]).unwrap();
        assert_eq!(plan.shares().len(), 3);
        assert_eq!(plan.allocated(), Decimal::from_str("0.90").unwrap());
    }

    #[test]
    fn fraction_bounds_enforced() {
        assert!(DistributionPlan::new(vec![share(1, "0")]).is_err());
        assert!(DistributionPlan::new(vec![share(1, "-0.1")]).is_err());
        assert!(DistributionPlan::new(vec![share(1, "1.01")]).is_err());
        assert!(DistributionPlan::new(vec![share(1, "1")]).is_ok());
    }

    #[test]
    fn over_allocation_rejected() {
        let err = DistributionPlan::new(vec![share(1, "0.6"), share(2, "0.5")]).unwrap_err();
        assert!(err.to_string().contains("sum"));
    }

    #[test]
    fn duplicate_recipient_rejected() {
        assert!(DistributionPlan::new(vec![share(1, "0.1"), share(1, "0.2")]).is_err());
    }

    #[test]
    fn empty_plan_rejected() {
        assert!(DistributionPlan::new(vec![]).is_err());
    }
}
