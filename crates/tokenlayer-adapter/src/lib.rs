/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Token Layer adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod defaults;
pub mod execution;
pub mod http;
pub mod signing;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    AuthCredential,
    AuthResolver,
    EvmWalletSigner,
    MockWalletSigner,
    WalletCredential,
    WalletSigner,
};

pub use defaults::{BuilderDefaults, TokenLayerDefaults};

pub use execution::{RpcEndpoints, TransactionExecutor};

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    ErrorKind,
    Result,
    TokenLayerClient,
    TokenLayerError,
};

pub use signing::{RequestSigner, SigningContext};

// Re-export all types
pub use types::*;
