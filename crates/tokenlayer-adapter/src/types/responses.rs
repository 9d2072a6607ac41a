/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use alloy::primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::{ActionType, InfoType};
use super::serde_helpers::{self, checksummed_option};

/// Error body returned on any non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiErrorBody {
    /// Build from an arbitrary JSON body; `code` may arrive as string or number.
    pub fn from_value(status: u16, value: &Value) -> Self {
        let error = value
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {status} request failed"));
        let code = match value.get("code") {
            Some(Value::String(code)) => Some(code.clone()),
            Some(Value::Number(code)) => Some(code.to_string()),
            _ => None,
        };
        let details = value.get("details").filter(|v| !v.is_null()).cloned();
        Self {
            error,
            code,
            details,
        }
    }

    pub fn non_json(status: u16) -> Self {
        Self {
            error: format!("HTTP {status} with non-JSON response"),
            code: None,
            details: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(rename = "actionType")]
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "checksummed_option")]
    pub wallet_address: Option<Address>,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

/// Untrusted, server-supplied transaction.
///
/// Fields stay as sent so that non-EVM entries still decode; conversion to
/// EVM types happens in `execution::validate_batch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<Value>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::deserialize_chain_id"
    )]
    pub chain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenResponse {
    #[serde(rename = "actionType")]
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
    /// Single-transaction shape used by older deployments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::deserialize_chain_id"
    )]
    pub chain_id: Option<u64>,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl CreateTokenResponse {
    /// Transactions to execute, normalizing the legacy single-transaction shape.
    pub fn pending_transactions(&self) -> Vec<Transaction> {
        if let Some(transactions) = self.transactions.as_ref().filter(|txs| !txs.is_empty()) {
            return transactions.clone();
        }

        match &self.transaction {
            Some(transaction) => vec![Transaction {
                chain_id: self.chain_id,
                ..transaction.clone()
            }],
            None => Vec::new(),
        }
    }
}

/// Response of any bearer-authenticated action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(rename = "actionType")]
    pub action_type: ActionType,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

/// Record of a broadcast transaction, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutedTransaction {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    pub hash: TxHash,
    #[serde(
        serialize_with = "serde_helpers::serialize_checksummed",
        deserialize_with = "serde_helpers::deserialize_address"
    )]
    pub to: Address,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTokenResult {
    pub response: CreateTokenResponse,
    /// Present only when execution was requested.
    pub executions: Option<Vec<ExecutedTransaction>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoResponse {
    #[serde(rename = "type")]
    pub info_type: InfoType,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}
