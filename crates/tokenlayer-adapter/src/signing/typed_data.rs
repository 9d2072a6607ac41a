/*
[INPUT]:  Register/createToken parameters and the signature chain id
[OUTPUT]: EIP-712 typed data ready for wallet signing
[POS]:    Signing layer - typed-data construction
[UPDATE]: When the signed struct layouts or domain change
*/

use alloy::dyn_abi::TypedData;
use alloy::primitives::Address;
use serde_json::{Value, json};

use crate::http::Result;
use crate::types::{CreateTokenAction, Source};

use super::canonical::{
    amount_string, checksum_or_zero, chain_id_hex, hash_links, hash_string_list,
};

pub const DOMAIN_NAME: &str = "TokenLayerSignTransaction";
pub const DOMAIN_VERSION: &str = "1";
pub const DEFAULT_POOL_TYPE: &str = "meme";
pub const TOKEN_TYPE: &str = "coin";

const DOMAIN_FIELDS: [(&str, &str); 4] = [
    ("name", "string"),
    ("version", "string"),
    ("chainId", "uint256"),
    ("verifyingContract", "address"),
];

const REGISTER_FIELDS: [(&str, &str); 5] = [
    ("type", "string"),
    ("method", "string"),
    ("source", "string"),
    ("nonce", "uint64"),
    ("expiresAfter", "uint64"),
];

/// Signing order of `CreateTokenAction`
pub const CREATE_TOKEN_FIELDS: [(&str, &str); 23] = [
    ("type", "string"),
    ("source", "string"),
    ("name", "string"),
    ("symbol", "string"),
    ("description", "string"),
    ("image", "string"),
    ("banner", "string"),
    ("video", "string"),
    ("chainSlug", "string"),
    ("destinationChainsHash", "bytes32"),
    ("poolType", "string"),
    ("userAddress", "address"),
    ("builderCode", "address"),
    ("builderFee", "uint256"),
    ("tokenReferral", "address"),
    ("tagsHash", "bytes32"),
    ("linksHash", "bytes32"),
    ("tokenType", "string"),
    ("amountIn", "string"),
    ("tokensOut", "string"),
    ("maxAmountIn", "string"),
    ("nonce", "uint64"),
    ("expiresAfter", "uint64"),
];

fn fields(layout: &[(&str, &str)]) -> Value {
    Value::Array(
        layout
            .iter()
            .map(|(name, ty)| json!({ "name": name, "type": ty }))
            .collect(),
    )
}

fn domain(signature_chain_id: u64) -> Value {
    json!({
        "name": DOMAIN_NAME,
        "version": DOMAIN_VERSION,
        "chainId": chain_id_hex(signature_chain_id),
        "verifyingContract": Address::ZERO.to_checksum(None),
    })
}

fn typed_data(
    primary_type: &str,
    layout: &[(&str, &str)],
    signature_chain_id: u64,
    message: Value,
) -> Result<TypedData> {
    let raw = json!({
        "types": {
            "EIP712Domain": fields(&DOMAIN_FIELDS),
            primary_type: fields(layout),
        },
        "primaryType": primary_type,
        "domain": domain(signature_chain_id),
        "message": message,
    });
    Ok(serde_json::from_value(raw)?)
}

/// `RegisterAction{type, method, source, nonce, expiresAfter}`
pub fn register_typed_data(
    source: Source,
    nonce: u64,
    expires_after: u64,
    signature_chain_id: u64,
) -> Result<TypedData> {
    typed_data(
        "RegisterAction",
        &REGISTER_FIELDS,
        signature_chain_id,
        json!({
            "type": "register",
            "method": "web3",
            "source": source.as_str(),
            "nonce": nonce,
            "expiresAfter": expires_after,
        }),
    )
}

/// Canonical `CreateTokenAction` message.
///
/// `action.user_address` must already be defaulted to the signing account.
pub fn create_token_message(
    action: &CreateTokenAction,
    source: Source,
    nonce: u64,
    expires_after: u64,
) -> Value {
    let builder = action.builder.as_ref();
    json!({
        "type": "createToken",
        "source": source.as_str(),
        "name": action.name,
        "symbol": action.symbol,
        "description": action.description,
        "image": action.image,
        "banner": action.banner.as_deref().unwrap_or(""),
        "video": action.video.as_deref().unwrap_or(""),
        "chainSlug": action.chain_slug,
        "destinationChainsHash": hash_string_list(action.destination_chains.as_deref()),
        "poolType": action
            .pool_type
            .as_deref()
            .filter(|pool_type| !pool_type.is_empty())
            .unwrap_or(DEFAULT_POOL_TYPE),
        "userAddress": checksum_or_zero(action.user_address),
        "builderCode": checksum_or_zero(builder.map(|builder| builder.code)),
        "builderFee": builder.and_then(|builder| builder.fee).unwrap_or(0),
        "tokenReferral": checksum_or_zero(action.token_referral),
        "tagsHash": hash_string_list(action.tags.as_deref()),
        "linksHash": hash_links(action.links.as_ref()),
        "tokenType": TOKEN_TYPE,
        "amountIn": amount_string(action.amount_in),
        "tokensOut": amount_string(action.tokens_out),
        "maxAmountIn": amount_string(action.max_amount_in),
        "nonce": nonce,
        "expiresAfter": expires_after,
    })
}

pub fn create_token_typed_data(
    action: &CreateTokenAction,
    source: Source,
    nonce: u64,
    expires_after: u64,
    signature_chain_id: u64,
) -> Result<TypedData> {
    typed_data(
        "CreateTokenAction",
        &CREATE_TOKEN_FIELDS,
        signature_chain_id,
        create_token_message(action, source, nonce, expires_after),
    )
}
