/*
[INPUT]:  Wallet credentials and action parameters
[OUTPUT]: Canonical EIP-712/SIWE payloads and signed request envelopes
[POS]:    Signing layer - wallet-signed actions
[UPDATE]: When signed struct layouts or canonicalization rules change
*/

pub mod canonical;
pub mod nonce;
pub mod signer;
pub mod siwe;
pub mod typed_data;

pub use canonical::{ZERO_ADDRESS, hash_links, hash_string_list};
pub use nonce::NonceSource;
pub use signer::{RequestSigner, SigningContext, tagged_action, with_type_tag};
pub use siwe::SiweMessage;
pub use typed_data::{create_token_typed_data, register_typed_data};
