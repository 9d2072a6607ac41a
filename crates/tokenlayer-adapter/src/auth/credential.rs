/*
[INPUT]:  Wallet signers, JWTs and API keys supplied by the caller
[OUTPUT]: The single credential authorizing a call
[POS]:    Auth layer - credential model and resolution
[UPDATE]: When adding credential kinds or changing token validation
*/

use std::fmt;
use std::sync::Arc;

use alloy::primitives::Address;

use crate::http::{BearerKind, Result, TokenLayerError};

use super::WalletSigner;

/// Wallet credential: signs register/createToken and executes transactions
#[derive(Clone)]
pub struct WalletCredential {
    pub signer: Arc<dyn WalletSigner>,
    /// Expected account address; checked against the signer before signing
    pub address: Option<Address>,
    /// Default EIP-712 domain chain id for this credential
    pub signature_chain_id: Option<u64>,
}

impl WalletCredential {
    pub fn new(signer: Arc<dyn WalletSigner>) -> Self {
        Self {
            signer,
            address: None,
            signature_chain_id: None,
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_signature_chain_id(mut self, chain_id: u64) -> Self {
        self.signature_chain_id = Some(chain_id);
        self
    }
}

impl fmt::Debug for WalletCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletCredential")
            .field("signer", &self.signer.address())
            .field("address", &self.address)
            .field("signature_chain_id", &self.signature_chain_id)
            .finish()
    }
}

/// Credential used for a call. Exactly one kind is active at a time.
#[derive(Clone)]
pub enum AuthCredential {
    Wallet(WalletCredential),
    Jwt(String),
    ApiKey(String),
}

impl AuthCredential {
    pub fn wallet(signer: Arc<dyn WalletSigner>) -> Self {
        AuthCredential::Wallet(WalletCredential::new(signer))
    }

    pub fn jwt(token: impl Into<String>) -> Self {
        AuthCredential::Jwt(token.into())
    }

    pub fn api_key(token: impl Into<String>) -> Self {
        AuthCredential::ApiKey(token.into())
    }

    /// Wire name of the credential kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            AuthCredential::Wallet(_) => "wallet",
            AuthCredential::Jwt(_) => "jwt",
            AuthCredential::ApiKey(_) => "apiKey",
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            AuthCredential::Wallet(_) => Ok(()),
            AuthCredential::Jwt(token) if is_invalid_bearer_token(token) => {
                Err(TokenLayerError::InvalidToken {
                    kind: BearerKind::Jwt,
                })
            }
            AuthCredential::ApiKey(token) if is_invalid_bearer_token(token) => {
                Err(TokenLayerError::InvalidToken {
                    kind: BearerKind::ApiKey,
                })
            }
            AuthCredential::Jwt(_) | AuthCredential::ApiKey(_) => Ok(()),
        }
    }
}

// Tokens never reach Debug output.
impl fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthCredential::Wallet(wallet) => f.debug_tuple("Wallet").field(wallet).finish(),
            AuthCredential::Jwt(_) => f.write_str("Jwt(<redacted>)"),
            AuthCredential::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
        }
    }
}

/// Empty, whitespace-only, or a stringified `undefined`/`null`
pub fn is_invalid_bearer_token(token: &str) -> bool {
    let normalized = token.trim().to_ascii_lowercase();
    normalized.is_empty() || normalized == "undefined" || normalized == "null"
}

/// Picks the credential for a call: per-call override first, then the default
#[derive(Debug, Clone, Default)]
pub struct AuthResolver {
    default: Option<AuthCredential>,
}

impl AuthResolver {
    pub fn new(default: Option<AuthCredential>) -> Self {
        Self { default }
    }

    pub fn default_credential(&self) -> Option<&AuthCredential> {
        self.default.as_ref()
    }

    /// Active credential, validated
    pub fn resolve<'a>(
        &'a self,
        override_auth: Option<&'a AuthCredential>,
    ) -> Result<&'a AuthCredential> {
        let credential = override_auth
            .or(self.default.as_ref())
            .ok_or(TokenLayerError::MissingAuth)?;
        credential.validate()?;
        Ok(credential)
    }

    /// Bearer token for an operation that cannot be wallet-signed
    pub fn resolve_bearer<'a>(
        &'a self,
        override_auth: Option<&'a AuthCredential>,
        operation: &str,
    ) -> Result<&'a str> {
        bearer_token(self.resolve(override_auth)?, operation)
    }

    /// Like [`AuthResolver::resolve_bearer`], but anonymous when nothing is configured
    pub fn resolve_optional_bearer<'a>(
        &'a self,
        override_auth: Option<&'a AuthCredential>,
        operation: &str,
    ) -> Result<Option<&'a str>> {
        if override_auth.is_none() && self.default.is_none() {
            return Ok(None);
        }
        self.resolve_bearer(override_auth, operation).map(Some)
    }

    /// Wallet credential for an operation that must be wallet-signed
    pub fn require_wallet<'a>(
        &'a self,
        override_auth: Option<&'a AuthCredential>,
        operation: &str,
    ) -> Result<&'a WalletCredential> {
        match self.resolve(override_auth)? {
            AuthCredential::Wallet(wallet) => Ok(wallet),
            other => Err(TokenLayerError::AuthTypeMismatch {
                operation: operation.to_string(),
                expected: "wallet",
                actual: other.kind_name(),
            }),
        }
    }
}

fn bearer_token<'a>(credential: &'a AuthCredential, operation: &str) -> Result<&'a str> {
    match credential {
        AuthCredential::Jwt(token) | AuthCredential::ApiKey(token) => Ok(token.as_str()),
        AuthCredential::Wallet(_) => Err(TokenLayerError::AuthTypeMismatch {
            operation: operation.to_string(),
            expected: "jwt or apiKey",
            actual: "wallet",
        }),
    }
}
