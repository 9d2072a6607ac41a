/*
[INPUT]:  Error sources (HTTP, API, serialization, auth, signing, chain metadata)
[OUTPUT]: Structured error types carrying expected-vs-actual context
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::types::ExecutedTransaction;

/// Bearer credential flavour, used in auth error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BearerKind {
    Jwt,
    ApiKey,
}

impl std::fmt::Display for BearerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BearerKind::Jwt => f.write_str("jwt"),
            BearerKind::ApiKey => f.write_str("apiKey"),
        }
    }
}

/// Coarse classification of [`TokenLayerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    Protocol,
    ChainValidation,
    ChainMismatch,
    Transport,
    Signing,
    Execution,
    Config,
    Serialization,
}

/// Main error type for the Token Layer adapter
#[derive(Error, Debug)]
pub enum TokenLayerError {
    /// Neither a per-call override nor a default credential is configured
    #[error("No auth configured. Configure a default credential or pass an auth override")]
    MissingAuth,

    /// Bearer token is empty or a stringified null/undefined
    #[error("Invalid {kind} token. Provide a non-empty token value")]
    InvalidToken { kind: BearerKind },

    /// The active credential kind cannot authorize this operation
    #[error("{operation} requires {expected} auth, got {actual}")]
    AuthTypeMismatch {
        operation: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Explicit wallet address differs from the signing account
    #[error("Wallet address mismatch: provided {provided}, signer {signer}")]
    AddressMismatch { provided: String, signer: String },

    /// No chain id available for the EIP-712 domain
    #[error("signatureChainId is required when the wallet is not bound to a chain")]
    SignatureChainIdRequired,

    /// Response tag differs from the requested action/query
    #[error("Unexpected {field} for {expected}: {actual:?}")]
    ProtocolMismatch {
        field: &'static str,
        expected: String,
        actual: Option<String>,
    },

    /// Transaction targets a different chain than the action declared
    #[error(
        "Refusing to execute transaction #{index}: chainSlug mismatch (expected {expected}, got {actual:?})"
    )]
    StaleOrMismatchedChain {
        index: usize,
        expected: String,
        actual: Option<String>,
    },

    /// Transaction is for a non-EVM chain
    #[error("Refusing to execute transaction #{index}: unsupported chainType {chain_type}")]
    UnsupportedChainType { index: usize, chain_type: String },

    /// Transaction lacks an integer chain id
    #[error("Refusing to execute transaction #{index}: missing/invalid chainId in API response")]
    MissingTransactionChainId { index: usize },

    /// Transaction field is missing or not a valid EVM encoding
    #[error("Refusing to execute transaction #{index}: invalid {field} ({reason})")]
    InvalidTransactionField {
        index: usize,
        field: &'static str,
        reason: String,
    },

    /// Signing client is bound to another chain and cannot switch
    #[error(
        "Transaction chain mismatch for chainId {required} (wallet bound to {bound}). Configure an RPC endpoint for this chain or use a switchable wallet"
    )]
    ChainMismatch { index: usize, required: u64, bound: u64 },

    /// A submission failed after at least one transaction was already broadcast
    #[error("Transaction #{failed_index} failed after {} broadcast: {source}", .completed.len())]
    ExecutionAborted {
        failed_index: usize,
        completed: Vec<ExecutedTransaction>,
        #[source]
        source: Box<TokenLayerError>,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
        details: Option<Value>,
    },

    /// Wallet signing failed
    #[error("Signing failed: {0}")]
    Signing(String),

    /// RPC submission failed
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Request could not be built from the given parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TokenLayerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenLayerError::MissingAuth
            | TokenLayerError::InvalidToken { .. }
            | TokenLayerError::AuthTypeMismatch { .. }
            | TokenLayerError::AddressMismatch { .. } => ErrorKind::Auth,
            TokenLayerError::ProtocolMismatch { .. } => ErrorKind::Protocol,
            TokenLayerError::StaleOrMismatchedChain { .. }
            | TokenLayerError::UnsupportedChainType { .. }
            | TokenLayerError::MissingTransactionChainId { .. }
            | TokenLayerError::InvalidTransactionField { .. } => ErrorKind::ChainValidation,
            TokenLayerError::ChainMismatch { .. } => ErrorKind::ChainMismatch,
            TokenLayerError::Http(_) | TokenLayerError::Api { .. } => ErrorKind::Transport,
            TokenLayerError::SignatureChainIdRequired | TokenLayerError::Signing(_) => {
                ErrorKind::Signing
            }
            TokenLayerError::ExecutionAborted { .. } | TokenLayerError::Rpc(_) => {
                ErrorKind::Execution
            }
            TokenLayerError::UrlParse(_)
            | TokenLayerError::InvalidRequest(_)
            | TokenLayerError::Config(_) => ErrorKind::Config,
            TokenLayerError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Check if error indicates an authentication problem
    pub fn is_auth_error(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }

    /// Check if a transaction batch was rejected before anything was sent
    pub fn is_chain_validation_error(&self) -> bool {
        self.kind() == ErrorKind::ChainValidation
    }

    /// Transactions broadcast before a mid-batch failure.
    pub fn completed_transactions(&self) -> &[ExecutedTransaction] {
        match self {
            TokenLayerError::ExecutionAborted { completed, .. } => completed,
            _ => &[],
        }
    }

    /// Create an API error from status code and decoded error body
    pub fn api_error(status: StatusCode, body: crate::types::ApiErrorBody) -> Self {
        TokenLayerError::Api {
            status: status.as_u16(),
            message: body.error,
            code: body.code,
            details: body.details,
        }
    }

    /// HTTP status of a transport failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            TokenLayerError::Api { status, .. } => Some(*status),
            TokenLayerError::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for Token Layer operations
pub type Result<T> = std::result::Result<T, TokenLayerError>;
