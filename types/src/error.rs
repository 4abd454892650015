//! Errors raised while parsing or constructing fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid {kind}: {reason}")]
    Parse { kind: &'static str, reason: String },
}
