//! The chain connection used by the account page, and its Solana JSON-RPC
//! implementation.

use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use dioxus_logger::tracing;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use serde_json::Value;

use crate::prefs::cluster_preference::Commitment;
use crate::types::Signature;
use crate::types::SignatureInfo;
use crate::types::TransactionRecord;
use crate::types::WalletIdentity;
use crate::ApiError;

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Read access to a chain, as needed by the account page.
pub trait ChainConnection {
    /// Returns up to `limit` signature descriptors for `address`, newest first.
    async fn signatures_for_address(
        &self,
        address: &WalletIdentity,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>, ApiError>;

    /// Resolves each signature into a parsed transaction.
    ///
    /// The result has exactly one entry per input signature, in input order.
    /// Transactions the node cannot resolve are `None`.
    async fn parsed_transactions(
        &self,
        signatures: &[Signature],
    ) -> Result<Vec<Option<TransactionRecord>>, ApiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    Http(u16),
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: Value,
}

impl JsonRpcRequest {
    fn new(method: &'static str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id: REQUEST_ID.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

impl JsonRpcResponse {
    /// Splits the response into its result, turning an error object into [`RpcError::Rpc`].
    fn into_result(self) -> Result<Option<Value>, RpcError> {
        match self.error {
            Some(e) => Err(RpcError::Rpc {
                code: e.code,
                message: e.message,
            }),
            None => Ok(self.result),
        }
    }
}

/// Matches batch responses back to the request ids, in request order.
///
/// JSON-RPC servers may answer a batch in any order.
fn order_batch_responses(
    ids: &[u64],
    responses: Vec<JsonRpcResponse>,
) -> Result<Vec<Option<Value>>, RpcError> {
    let mut by_id = HashMap::with_capacity(responses.len());
    for response in responses {
        let id = response
            .id
            .as_ref()
            .and_then(Value::as_u64)
            .ok_or_else(|| RpcError::InvalidResponse("batch entry without numeric id".into()))?;
        by_id.insert(id, response);
    }

    ids.iter()
        .map(|id| {
            by_id
                .remove(id)
                .ok_or_else(|| RpcError::InvalidResponse(format!("no response for request {id}")))?
                .into_result()
        })
        .collect()
}

/// A Solana JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct RpcConnection {
    endpoint: String,
    commitment: Commitment,
    client: Client,
}

impl PartialEq for RpcConnection {
    fn eq(&self, other: &Self) -> bool {
        self.endpoint == other.endpoint && self.commitment == other.commitment
    }
}

impl RpcConnection {
    pub fn new(endpoint: impl Into<String>, commitment: Commitment) -> Self {
        let endpoint = endpoint.into();
        tracing::info!("chain connection: {} ({})", endpoint, commitment);
        Self {
            endpoint,
            commitment,
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    async fn post<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        body: &T,
    ) -> Result<R, RpcError> {
        let response = self.client.post(&self.endpoint).json(body).send().await?;

        if !response.status().is_success() {
            return Err(RpcError::Http(response.status().as_u16()));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("failed to parse JSON-RPC response: {e}")))
    }

    async fn call(&self, method: &'static str, params: Value) -> Result<Value, RpcError> {
        let request = JsonRpcRequest::new(method, params);
        tracing::debug!("-> RPC {}: {}", method, request.params);

        let response: JsonRpcResponse = self.post(&request).await?;
        response
            .into_result()?
            .ok_or_else(|| RpcError::InvalidResponse(format!("no result for {method}")))
    }

    async fn call_batch(
        &self,
        method: &'static str,
        params: Vec<Value>,
    ) -> Result<Vec<Option<Value>>, RpcError> {
        let requests: Vec<JsonRpcRequest> = params
            .into_iter()
            .map(|p| JsonRpcRequest::new(method, p))
            .collect();
        let ids: Vec<u64> = requests.iter().map(|r| r.id).collect();
        tracing::debug!("-> RPC batch {} x{}", method, requests.len());

        let responses: Vec<JsonRpcResponse> = self.post(&requests).await?;
        order_batch_responses(&ids, responses)
    }
}

impl ChainConnection for RpcConnection {
    async fn signatures_for_address(
        &self,
        address: &WalletIdentity,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>, ApiError> {
        let result = self
            .call(
                "getSignaturesForAddress",
                json!([address.as_str(), { "limit": limit, "commitment": self.commitment }]),
            )
            .await?;

        let infos: Vec<SignatureInfo> = serde_json::from_value(result)
            .map_err(|e| RpcError::InvalidResponse(format!("signature listing: {e}")))?;
        Ok(infos)
    }

    async fn parsed_transactions(
        &self,
        signatures: &[Signature],
    ) -> Result<Vec<Option<TransactionRecord>>, ApiError> {
        if signatures.is_empty() {
            return Ok(vec![]);
        }

        let params = signatures
            .iter()
            .map(|s| {
                json!([s.as_str(), {
                    "encoding": "jsonParsed",
                    "maxSupportedTransactionVersion": 0,
                    "commitment": self.commitment,
                }])
            })
            .collect();

        let results = self.call_batch("getTransaction", params).await?;

        let records = results
            .into_iter()
            .map(|result| match result {
                None | Some(Value::Null) => Ok(None),
                Some(value) => serde_json::from_value::<TransactionRecord>(value)
                    .map(Some)
                    .map_err(|e| RpcError::InvalidResponse(format!("parsed transaction: {e}"))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: Value) -> JsonRpcResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn batch_responses_follow_request_order() {
        let responses = vec![
            response(json!({ "jsonrpc": "2.0", "id": 12, "result": { "slot": 2 } })),
            response(json!({ "jsonrpc": "2.0", "id": 10, "result": null })),
            response(json!({ "jsonrpc": "2.0", "id": 11, "result": { "slot": 1 } })),
        ];

        let ordered = order_batch_responses(&[10, 11, 12], responses).unwrap();

        assert_eq!(ordered[0], None);
        assert_eq!(ordered[1], Some(json!({ "slot": 1 })));
        assert_eq!(ordered[2], Some(json!({ "slot": 2 })));
    }

    #[test]
    fn batch_entry_error_fails_the_batch() {
        let responses = vec![
            response(json!({ "jsonrpc": "2.0", "id": 1, "result": null })),
            response(json!({
                "jsonrpc": "2.0",
                "id": 2,
                "error": { "code": 429, "message": "Too many requests" }
            })),
        ];

        let err = order_batch_responses(&[1, 2], responses).unwrap_err();
        assert!(matches!(err, RpcError::Rpc { code: 429, .. }));
    }

    #[test]
    fn batch_missing_response_is_invalid() {
        let responses = vec![response(json!({ "jsonrpc": "2.0", "id": 1, "result": null }))];

        let err = order_batch_responses(&[1, 2], responses).unwrap_err();
        assert!(matches!(err, RpcError::InvalidResponse(_)));
    }

    #[test]
    fn request_ids_are_unique() {
        let a = JsonRpcRequest::new("getHealth", json!([]));
        let b = JsonRpcRequest::new("getHealth", json!([]));
        assert_ne!(a.id, b.id);
        assert_eq!(a.jsonrpc, "2.0");
    }

    #[tokio::test]
    async fn empty_signature_list_needs_no_request() {
        // nothing listens on this port; a request would fail
        let connection = RpcConnection::new("http://127.0.0.1:9", Commitment::Confirmed);
        let records = connection.parsed_transactions(&[]).await.unwrap();
        assert!(records.is_empty());
    }
}
