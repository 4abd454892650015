//! Local field checks run before any transaction leaves the process.

use asaflow_crypto::validate_address;
use asaflow_types::params::{
    MAX_ASSET_NAME_LEN, MAX_DECIMALS, MAX_NOTE_LEN, MAX_TXN_LIFE, MAX_UNIT_NAME_LEN, MAX_URL_LEN,
};
use asaflow_types::Address;

use crate::asset_config::AssetParams;
use crate::header::TxHeader;
use crate::{Transaction, TransactionError};

/// Check every bound a transaction must satisfy to be accepted by the ledger.
///
/// The fee and group fields are not checked here: builders derive the fee and
/// the group coordinator owns the group id.
pub fn validate_transaction(tx: &Transaction) -> Result<(), TransactionError> {
    validate_header(tx.header())?;

    match tx {
        Transaction::AssetConfig(cfg) => validate_asset_params(&cfg.params),
        Transaction::AssetOptIn(opt) => {
            if opt.asset_id.is_zero() {
                return Err(TransactionError::invalid("opt-in requires a non-zero asset id"));
            }
            Ok(())
        }
        Transaction::AssetTransfer(xfer) => {
            if xfer.asset_id.is_zero() {
                return Err(TransactionError::invalid("transfer requires a non-zero asset id"));
            }
            check_address("receiver", &xfer.receiver)?;
            if xfer.amount == 0 {
                return Err(TransactionError::invalid("transfer amount must be positive"));
            }
            Ok(())
        }
        Transaction::Payment(pay) => {
            check_address("receiver", &pay.receiver)?;
            if pay.amount == 0 {
                return Err(TransactionError::invalid("payment amount must be positive"));
            }
            Ok(())
        }
    }
}

fn validate_header(header: &TxHeader) -> Result<(), TransactionError> {
    check_address("sender", &header.sender)?;

    if header.first_valid > header.last_valid {
        return Err(TransactionError::invalid(format!(
            "validity window is inverted: first {} > last {}",
            header.first_valid, header.last_valid
        )));
    }
    let window = header.last_valid.since(header.first_valid);
    if window > MAX_TXN_LIFE {
        return Err(TransactionError::invalid(format!(
            "validity window of {window} rounds exceeds {MAX_TXN_LIFE}"
        )));
    }
    if header.genesis_hash == [0u8; 32] {
        return Err(TransactionError::invalid("genesis hash is missing"));
    }
    if let Some(note) = &header.note {
        if note.len() > MAX_NOTE_LEN {
            return Err(TransactionError::invalid(format!(
                "note of {} bytes exceeds {MAX_NOTE_LEN}",
                note.len()
            )));
        }
    }
    Ok(())
}

fn validate_asset_params(params: &AssetParams) -> Result<(), TransactionError> {
    if params.total == 0 {
        return Err(TransactionError::invalid("asset total must be positive"));
    }
    if params.decimals > MAX_DECIMALS {
        return Err(TransactionError::invalid(format!(
            "decimals {} exceeds {MAX_DECIMALS}",
            params.decimals
        )));
    }
    check_len("unit name", &params.unit_name, MAX_UNIT_NAME_LEN)?;
    check_len("asset name", &params.asset_name, MAX_ASSET_NAME_LEN)?;
    if let Some(url) = &params.url {
        check_len("url", url, MAX_URL_LEN)?;
    }
    for control in params.controls.iter() {
        check_address("control address", control)?;
    }
    Ok(())
}

fn check_address(role: &str, address: &Address) -> Result<(), TransactionError> {
    if address.is_empty() {
        return Err(TransactionError::invalid(format!("{role} is empty")));
    }
    if !validate_address(address.as_str()) {
        return Err(TransactionError::invalid(format!("{role} {address} is not a valid address")));
    }
    Ok(())
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), TransactionError> {
    if value.len() > max {
        return Err(TransactionError::invalid(format!(
            "{field} {value:?} is {} bytes, limit is {max}",
            value.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::tests::{address, payment_between};
    use asaflow_types::Round;

    #[test]
    fn built_payment_is_valid() {
        assert!(validate_transaction(&payment_between(1, 2, 10)).is_ok());
    }

    #[test]
    fn inverted_window_rejected() {
        let mut tx = payment_between(1, 2, 10);
        tx.header_mut().last_valid = Round::new(1);
        let err = validate_transaction(&tx).unwrap_err();
        assert!(err.to_string().contains("inverted"));
    }

    #[test]
    fn overlong_window_rejected() {
        let mut tx = payment_between(1, 2, 10);
        let first = tx.header().first_valid;
        tx.header_mut().last_valid = first.saturating_add(MAX_TXN_LIFE + 1);
        assert!(validate_transaction(&tx).is_err());
    }

    #[test]
    fn corrupted_receiver_rejected() {
        let mut tx = payment_between(1, 2, 10);
        if let Transaction::Payment(pay) = &mut tx {
            let mut raw = pay.receiver.as_str().to_string();
            raw.replace_range(0..1, if raw.starts_with('A') { "B" } else { "A" });
            pay.receiver = Address::new(raw);
        }
        let err = validate_transaction(&tx).unwrap_err();
        assert!(err.to_string().contains("receiver"));
    }

    #[test]
    fn oversized_note_rejected() {
        let mut tx = payment_between(1, 2, 10);
        tx.header_mut().note = Some(vec![0u8; MAX_NOTE_LEN + 1]);
        assert!(validate_transaction(&tx).is_err());
        tx.header_mut().note = Some(vec![0u8; MAX_NOTE_LEN]);
        assert!(validate_transaction(&tx).is_ok());
    }

    #[test]
    fn sender_must_be_well_formed() {
        let mut tx = payment_between(1, 2, 10);
        tx.header_mut().sender = Address::new("not-an-address");
        assert!(validate_transaction(&tx).is_err());
        tx.header_mut().sender = address(3);
        assert!(validate_transaction(&tx).is_ok());
    }
}
