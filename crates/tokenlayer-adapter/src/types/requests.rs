/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use alloy::primitives::{Address, Bytes, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::{ActionType, Source};
use super::serde_helpers::{self, checksummed_option};

/// Integrator attribution attached to createToken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Builder {
    #[serde(
        serialize_with = "serde_helpers::serialize_checksummed",
        deserialize_with = "serde_helpers::deserialize_address"
    )]
    pub code: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
}

/// createToken action as supplied by the caller (the `type` tag is added on dispatch).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenAction {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    pub chain_slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_chains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "checksummed_option")]
    pub user_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder: Option<Builder>,
    #[serde(
        rename = "token_referral",
        default,
        skip_serializing_if = "Option::is_none",
        with = "checksummed_option"
    )]
    pub token_referral: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<TokenLinks>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::str_option"
    )]
    pub amount_in: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::str_option"
    )]
    pub tokens_out: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::str_option"
    )]
    pub max_amount_in: Option<Decimal>,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterParams {
    /// Must match the signing account when given.
    pub wallet_address: Option<Address>,
    pub source: Option<Source>,
    pub nonce: Option<u64>,
    pub expires_after: Option<u64>,
    pub signature_chain_id: Option<u64>,
    /// Replaces the generated SIWE message.
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateTokenParams {
    pub action: CreateTokenAction,
    pub source: Option<Source>,
    pub expires_after: Option<u64>,
    pub nonce: Option<u64>,
    pub signature_chain_id: Option<u64>,
}

impl CreateTokenParams {
    pub fn new(action: CreateTokenAction) -> Self {
        Self {
            action,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateTokenOptions {
    /// Broadcast the transactions returned by the server.
    pub execute: bool,
}

/// Parameters for a bearer-authenticated action.
#[derive(Debug, Clone)]
pub struct ActionParams<A> {
    pub action: A,
    pub source: Option<Source>,
    pub expires_after: Option<u64>,
}

impl<A> ActionParams<A> {
    pub fn new(action: A) -> Self {
        Self {
            action,
            source: None,
            expires_after: None,
        }
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_expires_after(mut self, expires_after: u64) -> Self {
        self.expires_after = Some(expires_after);
        self
    }
}

/// Wallet-signed envelope (register, createToken under wallet auth).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedActionRequest {
    pub source: Source,
    pub nonce: u64,
    pub expires_after: u64,
    /// `0x`-prefixed hex chain id of the EIP-712 domain.
    pub signature_chain_id: String,
    pub signature: String,
    pub action: Value,
}

/// Bearer envelope; the token travels in the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BearerActionRequest {
    pub source: Source,
    pub expires_after: u64,
    pub action: Value,
}

/// Wire shape of the register action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterAction {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub method: String,
    pub message: String,
    pub signature: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetTokensV2Params {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "checksummed_option")]
    pub builder_code: Option<Address>,
    /// Filters not modelled above are passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A validated transaction handed to a wallet for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSubmission {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas: Option<u64>,
    pub chain_id: u64,
}
