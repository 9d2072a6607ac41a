/*
[INPUT]:  Wallet signers, JWTs and API keys
[OUTPUT]: Resolved credentials and wallet signatures
[POS]:    Auth layer - handles Token Layer authentication
[UPDATE]: When auth kinds or signature methods change
*/

pub mod credential;
pub mod evm_wallet;
pub mod wallet;

pub use credential::{AuthCredential, AuthResolver, WalletCredential, is_invalid_bearer_token};
pub use evm_wallet::EvmWalletSigner;
pub use wallet::{MOCK_PRIVATE_KEY, MockWalletSigner, RecordedSubmission, WalletSigner, signature_hex};
