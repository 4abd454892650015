//! JSON-RPC gateway to a ledger node.
//!
//! Every request is a POST of `{"action": <name>, ...params}`; the node answers
//! with either `{"result": ...}` or `{"error": <message>, "code": <code>}`.
//! Submissions additionally carry a `rejection` object describing why the
//! ledger refused them.

use std::time::Duration;

use asaflow_types::{Address, AssetId, Round, SuggestedParams, TxId};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{AccountInfo, AssetInfo, GatewayError, LedgerGateway, Rejection, TransactionStatus};

/// HTTP client for a ledger node's JSON-RPC endpoint.
#[derive(Clone)]
pub struct RpcGateway {
    http: reqwest::Client,
    node_url: String,
}

/// What a not-found answer refers to.
#[derive(Clone, Copy)]
enum Subject<'a> {
    Node,
    Account(&'a Address),
    Asset(AssetId),
    Transaction(&'a TxId),
}

impl RpcGateway {
    /// Create a gateway targeting the given base URL (e.g. `http://127.0.0.1:4001`).
    pub fn new(node_url: impl Into<String>) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            node_url: node_url.into(),
        })
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    /// Send a JSON-RPC request and return the `result` field.
    async fn rpc_call(
        &self,
        action: &str,
        params: Value,
        subject: Subject<'_>,
    ) -> Result<Value, GatewayError> {
        let mut body = params;
        body.as_object_mut()
            .ok_or_else(|| GatewayError::InvalidResponse("params must be a JSON object".into()))?
            .insert("action".to_string(), json!(action));

        tracing::trace!(action, url = %self.node_url, "rpc request");
        let response = self
            .http
            .post(&self.node_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(format!("request failed: {e}")))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(GatewayError::Transport(format!("node returned HTTP {status}")));
        }
        if !status.is_success() {
            return Err(GatewayError::InvalidResponse(format!("node returned HTTP {status}")));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("invalid JSON response: {e}")))?;

        unwrap_result(json, subject)
    }

    async fn call<T: for<'de> Deserialize<'de>>(
        &self,
        action: &str,
        params: Value,
        subject: Subject<'_>,
    ) -> Result<T, GatewayError> {
        let result = self.rpc_call(action, params, subject).await?;
        serde_json::from_value(result)
            .map_err(|e| GatewayError::InvalidResponse(format!("invalid {action} response: {e}")))
    }
}

impl LedgerGateway for RpcGateway {
    async fn suggested_params(&self) -> Result<SuggestedParams, GatewayError> {
        let wire: WireParams = self.call("suggested_params", json!({}), Subject::Node).await?;
        wire.try_into()
    }

    async fn account_info(&self, address: &Address) -> Result<AccountInfo, GatewayError> {
        self.call(
            "account_info",
            json!({ "account": address }),
            Subject::Account(address),
        )
        .await
    }

    async fn asset_info(&self, asset_id: AssetId) -> Result<AssetInfo, GatewayError> {
        self.call(
            "asset_info",
            json!({ "asset_id": asset_id }),
            Subject::Asset(asset_id),
        )
        .await
    }

    async fn submit(&self, signed_bytes: &[u8]) -> Result<TxId, GatewayError> {
        let wire: WireSubmitted = self
            .call(
                "submit",
                json!({ "txn": hex::encode(signed_bytes) }),
                Subject::Node,
            )
            .await?;
        let tx_id = parse_tx_id(&wire.tx_id)?;
        tracing::debug!(tx_id = %tx_id, bytes = signed_bytes.len(), "node accepted submission");
        Ok(tx_id)
    }

    async fn transaction_status(&self, tx_id: &TxId) -> Result<TransactionStatus, GatewayError> {
        self.call(
            "transaction_status",
            json!({ "tx_id": tx_id.to_string() }),
            Subject::Transaction(tx_id),
        )
        .await
    }

    async fn last_round(&self) -> Result<Round, GatewayError> {
        let wire: WireRound = self.call("status", json!({}), Subject::Node).await?;
        Ok(wire.last_round)
    }

    async fn wait_for_round_after(&self, round: Round) -> Result<Round, GatewayError> {
        let wire: WireRound = self
            .call(
                "wait_for_round_after",
                json!({ "round": round }),
                Subject::Node,
            )
            .await?;
        Ok(wire.last_round)
    }
}

// ── Wire formats ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireParams {
    fee: u64,
    #[serde(default)]
    flat_fee: bool,
    first_valid: Round,
    last_valid: Round,
    genesis_id: String,
    genesis_hash: String,
}

impl TryFrom<WireParams> for SuggestedParams {
    type Error = GatewayError;

    fn try_from(wire: WireParams) -> Result<Self, Self::Error> {
        let genesis_hash: [u8; 32] = hex::decode(&wire.genesis_hash)
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| {
                GatewayError::InvalidResponse(format!("bad genesis hash {:?}", wire.genesis_hash))
            })?;
        Ok(SuggestedParams {
            fee: wire.fee,
            flat_fee: wire.flat_fee,
            first_valid: wire.first_valid,
            last_valid: wire.last_valid,
            genesis_id: wire.genesis_id,
            genesis_hash,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WireSubmitted {
    tx_id: String,
}

#[derive(Debug, Deserialize)]
struct WireRound {
    last_round: Round,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum WireRejection {
    NotOptedIn {
        address: Address,
        asset_id: AssetId,
    },
    InsufficientFunds {
        address: Address,
        needed: u64,
        available: u64,
    },
    InvalidSignature {
        tx_id: String,
    },
    InvalidGroup {
        reason: String,
    },
    Other {
        reason: String,
    },
}

impl From<WireRejection> for Rejection {
    fn from(wire: WireRejection) -> Self {
        match wire {
            WireRejection::NotOptedIn { address, asset_id } => {
                Rejection::NotOptedIn { address, asset_id }
            }
            WireRejection::InsufficientFunds {
                address,
                needed,
                available,
            } => Rejection::InsufficientFunds {
                address,
                needed,
                available,
            },
            WireRejection::InvalidSignature { tx_id } => match tx_id.parse() {
                Ok(tx_id) => Rejection::InvalidSignature { tx_id },
                Err(_) => Rejection::Other {
                    reason: format!("invalid signature on {tx_id}"),
                },
            },
            WireRejection::InvalidGroup { reason } => Rejection::InvalidGroup { reason },
            WireRejection::Other { reason } => Rejection::Other { reason },
        }
    }
}

fn parse_tx_id(raw: &str) -> Result<TxId, GatewayError> {
    raw.parse()
        .map_err(|e| GatewayError::InvalidResponse(format!("bad transaction id: {e}")))
}

/// Split a node answer into its `result` or a typed error.
fn unwrap_result(json: Value, subject: Subject<'_>) -> Result<Value, GatewayError> {
    let Some(message) = json.get("error").and_then(Value::as_str) else {
        return Ok(json.get("result").cloned().unwrap_or(json));
    };

    let code = json.get("code").and_then(Value::as_str).unwrap_or_default();
    let err = match (code, subject) {
        ("account_not_found", Subject::Account(address)) => {
            GatewayError::AccountNotFound(address.clone())
        }
        ("asset_not_found", Subject::Asset(asset_id)) => GatewayError::AssetNotFound(asset_id),
        ("transaction_not_found", Subject::Transaction(tx_id)) => {
            GatewayError::TransactionNotFound(*tx_id)
        }
        ("rejected", _) => {
            let rejection = json
                .get("rejection")
                .cloned()
                .and_then(|r| serde_json::from_value::<WireRejection>(r).ok())
                .map(Rejection::from)
                .unwrap_or_else(|| Rejection::Other {
                    reason: message.to_string(),
                });
            GatewayError::Rejected(rejection)
        }
        ("unavailable", _) => GatewayError::Transport(format!("node error: {message}")),
        _ => GatewayError::InvalidResponse(format!("node error: {message}")),
    };
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_field_is_unwrapped() {
        let value = unwrap_result(json!({ "result": { "last_round": 9 } }), Subject::Node).unwrap();
        let wire: WireRound = serde_json::from_value(value).unwrap();
        assert_eq!(wire.last_round, Round::new(9));
    }

    #[test]
    fn bare_body_is_the_result() {
        let value = unwrap_result(json!({ "last_round": 3 }), Subject::Node).unwrap();
        assert_eq!(value["last_round"], 3);
    }

    #[test]
    fn not_found_maps_to_subject() {
        let address = Address::new("ALICE");
        let err = unwrap_result(
            json!({ "error": "no such account", "code": "account_not_found" }),
            Subject::Account(&address),
        )
        .unwrap_err();
        assert_eq!(err, GatewayError::AccountNotFound(address));

        let err = unwrap_result(
            json!({ "error": "no such asset", "code": "asset_not_found" }),
            Subject::Asset(AssetId::new(4)),
        )
        .unwrap_err();
        assert_eq!(err, GatewayError::AssetNotFound(AssetId::new(4)));
    }

    #[test]
    fn rejection_is_decoded() {
        let err = unwrap_result(
            json!({
                "error": "receiver not opted in",
                "code": "rejected",
                "rejection": { "kind": "not_opted_in", "address": "BOB", "asset_id": 42 }
            }),
            Subject::Node,
        )
        .unwrap_err();
        assert_eq!(
            err,
            GatewayError::Rejected(Rejection::NotOptedIn {
                address: Address::new("BOB"),
                asset_id: AssetId::new(42),
            })
        );
    }

    #[test]
    fn undecodable_rejection_keeps_message() {
        let err = unwrap_result(
            json!({ "error": "overspend", "code": "rejected" }),
            Subject::Node,
        )
        .unwrap_err();
        assert_eq!(
            err,
            GatewayError::Rejected(Rejection::Other {
                reason: "overspend".into()
            })
        );
    }

    #[test]
    fn unavailable_is_transient() {
        let err = unwrap_result(json!({ "error": "catching up", "code": "unavailable" }), Subject::Node)
            .unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn params_wire_decodes_genesis_hash() {
        let wire: WireParams = serde_json::from_value(json!({
            "fee": 0,
            "flat_fee": false,
            "first_valid": 100,
            "last_valid": 1100,
            "genesis_id": "closednet-v1",
            "genesis_hash": "ab".repeat(32),
        }))
        .unwrap();
        let params = SuggestedParams::try_from(wire).unwrap();
        assert_eq!(params.genesis_hash, [0xab; 32]);
        assert_eq!(params.validity_window(), 1_000);
    }

    #[test]
    fn short_genesis_hash_rejected() {
        let wire: WireParams = serde_json::from_value(json!({
            "fee": 1000,
            "first_valid": 1,
            "last_valid": 2,
            "genesis_id": "x",
            "genesis_hash": "abcd",
        }))
        .unwrap();
        assert!(matches!(
            SuggestedParams::try_from(wire),
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_node_is_transport_error() {
        let gateway = RpcGateway::new("http://127.0.0.1:1").unwrap();
        let err = gateway.last_round().await.unwrap_err();
        assert!(err.is_transient(), "unexpected error: {err:?}");
    }
}
