/*
[INPUT]:  Variable-length createToken fields (lists, links, addresses, amounts)
[OUTPUT]: Fixed-size canonical values for EIP-712 struct slots
[POS]:    Signing layer - deterministic canonicalization
[UPDATE]: When the server changes how it canonicalizes signed fields
*/

use alloy::primitives::{Address, B256, keccak256};
use rust_decimal::Decimal;

use crate::types::TokenLinks;

/// Substituted for absent address fields
pub const ZERO_ADDRESS: Address = Address::ZERO;

/// Separator for joined list/link values
pub const JOIN_SEPARATOR: &str = "|";

/// keccak256 of the `|`-joined values.
///
/// An absent or empty list hashes like the empty string, never to `B256::ZERO`.
pub fn hash_string_list(values: Option<&[String]>) -> B256 {
    match values {
        Some(values) if !values.is_empty() => keccak256(values.join(JOIN_SEPARATOR)),
        _ => keccak256(""),
    }
}

/// keccak256 of website|twitter|youtube|discord|telegram
pub fn hash_links(links: Option<&TokenLinks>) -> B256 {
    let Some(links) = links else {
        return keccak256("");
    };

    let canonical = [
        &links.website,
        &links.twitter,
        &links.youtube,
        &links.discord,
        &links.telegram,
    ]
    .iter()
    .map(|slot| slot.as_deref().unwrap_or(""))
    .collect::<Vec<_>>()
    .join(JOIN_SEPARATOR);

    keccak256(canonical)
}

/// EIP-55 form, with the zero address standing in for `None`
pub fn checksum_or_zero(address: Option<Address>) -> String {
    address.unwrap_or(ZERO_ADDRESS).to_checksum(None)
}

/// Decimal amounts stay strings; absent amounts sign as "0"
pub fn amount_string(amount: Option<Decimal>) -> String {
    match amount {
        Some(amount) if !amount.is_zero() => amount.to_string(),
        _ => "0".to_string(),
    }
}

/// `0x`-prefixed lowercase hex, as used for `signatureChainId`
pub fn chain_id_hex(chain_id: u64) -> String {
    format!("{chain_id:#x}")
}
