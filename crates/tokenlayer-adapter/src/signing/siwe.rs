/*
[INPUT]:  Wallet address, chain id, timestamp nonce and expiry
[OUTPUT]: EIP-4361 (Sign-In with Ethereum) plaintext message
[POS]:    Signing layer - register proof message
[UPDATE]: When the register message layout changes
*/

use alloy::primitives::Address;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::http::{Result, TokenLayerError};

pub const DEFAULT_SIWE_DOMAIN: &str = "app.tokenlayer.network";
pub const DEFAULT_SIWE_URI: &str = "https://app.tokenlayer.network";

/// Fields of a register SIWE message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiweMessage {
    pub domain: String,
    pub address: Address,
    pub statement: String,
    pub uri: String,
    pub chain_id: u64,
    /// Millisecond timestamp, also used as `Issued At`
    pub nonce: u64,
    /// Adds `Expiration Time` when non-zero
    pub expires_after_ms: u64,
}

impl SiweMessage {
    /// Register message with the default domain, uri and statement
    pub fn register(address: Address, chain_id: u64, nonce: u64, expires_after_ms: u64) -> Self {
        Self {
            domain: DEFAULT_SIWE_DOMAIN.to_string(),
            address,
            statement: format!("TokenLayer register timestamp: {nonce}"),
            uri: DEFAULT_SIWE_URI.to_string(),
            chain_id,
            nonce,
            expires_after_ms,
        }
    }

    pub fn to_message(&self) -> Result<String> {
        let mut message = format!(
            "{domain} wants you to sign in with your Ethereum account:\n\
             {address}\n\n\
             {statement}\n\n\
             URI: {uri}\n\
             Version: 1\n\
             Chain ID: {chain_id}\n\
             Nonce: {nonce}\n\
             Issued At: {issued_at}",
            domain = self.domain,
            address = self.address.to_checksum(None),
            statement = self.statement,
            uri = self.uri,
            chain_id = self.chain_id,
            nonce = self.nonce,
            issued_at = iso_millis(self.nonce)?,
        );

        if self.expires_after_ms > 0 {
            let expiration = self.nonce.saturating_add(self.expires_after_ms);
            message.push_str(&format!("\nExpiration Time: {}", iso_millis(expiration)?));
        }

        Ok(message)
    }
}

/// `2024-01-01T00:00:00.000Z`
fn iso_millis(timestamp_ms: u64) -> Result<String> {
    let timestamp = i64::try_from(timestamp_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .ok_or_else(|| {
            TokenLayerError::InvalidRequest(format!("timestamp {timestamp_ms} is out of range"))
        })?;
    Ok(timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}
