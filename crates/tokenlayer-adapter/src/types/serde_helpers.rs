/*
[INPUT]:  Raw JSON values from requests and server responses
[OUTPUT]: Checksummed addresses and lenient numeric decoding
[POS]:    Data layer - serde adapters shared by request/response types
[UPDATE]: When the wire encoding of addresses or quantities changes
*/

use std::str::FromStr;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Serialize an address as an EIP-55 checksummed string.
pub fn serialize_checksummed<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&address.to_checksum(None))
}

/// Accept any hex casing for an address.
pub fn deserialize_address<'de, D>(deserializer: D) -> Result<Address, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Address::from_str(raw.trim()).map_err(serde::de::Error::custom)
}

pub mod checksummed_option {
    use super::*;

    pub fn serialize<S>(address: &Option<Address>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match address {
            Some(address) => serialize_checksummed(address, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Address::from_str(value)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Parse a quantity given as a JSON number, a decimal string or a `0x` hex string.
pub fn parse_quantity(value: &Value) -> Option<U256> {
    match value {
        Value::Number(number) => number.as_u64().map(U256::from),
        Value::String(raw) => {
            let raw = raw.trim();
            let (digits, radix) = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
                Some(hex) => (hex, 16),
                None => (raw, 10),
            };
            if digits.is_empty() {
                return None;
            }
            U256::from_str_radix(digits, radix).ok()
        }
        _ => None,
    }
}

/// Chain ids must be integral JSON numbers (`8453` or `8453.0`); anything
/// else is kept as "absent" so batch validation can reject it with the
/// transaction index attached.
pub fn deserialize_chain_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(integral_u64))
}

fn integral_u64(value: &Value) -> Option<u64> {
    if let Some(integer) = value.as_u64() {
        return Some(integer);
    }
    let float = value.as_f64()?;
    (float >= 0.0 && float.fract() == 0.0 && float < u64::MAX as f64).then_some(float as u64)
}
