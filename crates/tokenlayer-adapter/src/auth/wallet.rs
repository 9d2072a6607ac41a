/*
[INPUT]:  Messages, EIP-712 typed data and validated transactions
[OUTPUT]: Signatures, transaction hashes and per-chain wallet clients
[POS]:    Auth layer - wallet integration abstraction
[UPDATE]: When adding new wallet types or changing signature format
*/

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use alloy::dyn_abi::TypedData;
use alloy::primitives::{Address, TxHash, keccak256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::{Signature, Signer};
use async_trait::async_trait;
use url::Url;

use crate::http::{Result, TokenLayerError};
use crate::types::TransactionSubmission;

/// Trait for wallet signing operations
///
/// Implement this trait for your wallet type (raw key, browser bridge, remote
/// signer). The trait is async to support hardware wallets and external signers.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Address of the signing account
    fn address(&self) -> Address;

    /// Chain the wallet is currently bound to, if any
    fn chain_id(&self) -> Option<u64>;

    /// Whether [`WalletSigner::switch_chain`] is available
    fn supports_chain_switch(&self) -> bool {
        false
    }

    /// Re-bind the wallet to another chain
    async fn switch_chain(&self, chain_id: u64) -> Result<()> {
        Err(TokenLayerError::Signing(format!(
            "wallet cannot switch to chain {chain_id}"
        )))
    }

    /// Dedicated client for `chain_id` talking to `rpc_url`.
    ///
    /// Only raw-key accounts can be re-bound; externally managed wallets
    /// return `None` and are used as-is.
    fn bind_rpc(&self, _rpc_url: &Url, _chain_id: u64) -> Option<Arc<dyn WalletSigner>> {
        None
    }

    /// Sign a plaintext message (EIP-191 personal_sign)
    async fn sign_message(&self, message: &str) -> Result<Signature>;

    /// Sign EIP-712 typed data
    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Signature>;

    /// Broadcast a transaction and return its hash once the node accepted it
    async fn send_transaction(&self, transaction: &TransactionSubmission) -> Result<TxHash>;
}

/// Hex encoding used on the wire: `0x` + r ‖ s ‖ v (65 bytes)
pub fn signature_hex(signature: &Signature) -> String {
    format!("0x{}", hex::encode(signature.as_bytes()))
}

/// EIP-712 digest of `typed_data`
pub fn typed_data_hash(typed_data: &TypedData) -> Result<alloy::primitives::B256> {
    typed_data
        .eip712_signing_hash()
        .map_err(|e| TokenLayerError::Signing(format!("Failed to hash typed data: {e}")))
}

/// Private key of Anvil's first default account, used by the mock signer
pub const MOCK_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Transaction seen by [`MockWalletSigner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
    pub transaction: TransactionSubmission,
    /// RPC endpoint of the client that sent it (`None` for the base wallet)
    pub rpc_url: Option<Url>,
    pub bound_chain_id: Option<u64>,
}

/// Mock wallet signer for testing
///
/// Signs with a real key but records submissions instead of broadcasting.
/// Clients produced by `bind_rpc` share the same submission log.
#[derive(Debug, Clone)]
pub struct MockWalletSigner {
    signer: PrivateKeySigner,
    chain_id: Arc<Mutex<Option<u64>>>,
    switchable: bool,
    raw_key: bool,
    rpc_url: Option<Url>,
    fail_at: Option<usize>,
    submissions: Arc<Mutex<Vec<RecordedSubmission>>>,
    switches: Arc<Mutex<Vec<u64>>>,
    bound_clients: Arc<Mutex<Vec<(Url, u64)>>>,
}

impl MockWalletSigner {
    /// Create a mock signer backed by [`MOCK_PRIVATE_KEY`], not bound to a chain
    pub fn new() -> Self {
        let signer = MOCK_PRIVATE_KEY
            .parse::<PrivateKeySigner>()
            .unwrap_or_else(|_| PrivateKeySigner::random());
        Self {
            signer,
            chain_id: Arc::new(Mutex::new(None)),
            switchable: false,
            raw_key: false,
            rpc_url: None,
            fail_at: None,
            submissions: Arc::new(Mutex::new(Vec::new())),
            switches: Arc::new(Mutex::new(Vec::new())),
            bound_clients: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_chain_id(self, chain_id: u64) -> Self {
        *locked(&self.chain_id) = Some(chain_id);
        self
    }

    /// Allow `switch_chain`
    pub fn switchable(mut self) -> Self {
        self.switchable = true;
        self
    }

    /// Behave like a raw-key account that can be bound to RPC endpoints
    pub fn raw_key(mut self) -> Self {
        self.raw_key = true;
        self
    }

    /// Fail the `index`-th submission (0-based, counted across bound clients)
    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    pub fn submissions(&self) -> Vec<RecordedSubmission> {
        locked(&self.submissions).clone()
    }

    pub fn submission_count(&self) -> usize {
        locked(&self.submissions).len()
    }

    pub fn chain_switches(&self) -> Vec<u64> {
        locked(&self.switches).clone()
    }

    /// `(rpc_url, chain_id)` of every dedicated client created via `bind_rpc`
    pub fn bound_clients(&self) -> Vec<(Url, u64)> {
        locked(&self.bound_clients).clone()
    }
}

// Poisoning is ignored; the guarded data is plain records.
fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Default for MockWalletSigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletSigner for MockWalletSigner {
    fn address(&self) -> Address {
        self.signer.address()
    }

    fn chain_id(&self) -> Option<u64> {
        *locked(&self.chain_id)
    }

    fn supports_chain_switch(&self) -> bool {
        self.switchable
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<()> {
        if !self.switchable {
            return Err(TokenLayerError::Signing(format!(
                "wallet cannot switch to chain {chain_id}"
            )));
        }
        *locked(&self.chain_id) = Some(chain_id);
        locked(&self.switches).push(chain_id);
        Ok(())
    }

    fn bind_rpc(&self, rpc_url: &Url, chain_id: u64) -> Option<Arc<dyn WalletSigner>> {
        if !self.raw_key {
            return None;
        }
        locked(&self.bound_clients).push((rpc_url.clone(), chain_id));
        Some(Arc::new(Self {
            chain_id: Arc::new(Mutex::new(Some(chain_id))),
            rpc_url: Some(rpc_url.clone()),
            ..self.clone()
        }))
    }

    async fn sign_message(&self, message: &str) -> Result<Signature> {
        self.signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| TokenLayerError::Signing(e.to_string()))
    }

    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Signature> {
        let hash = typed_data_hash(typed_data)?;
        self.signer
            .sign_hash(&hash)
            .await
            .map_err(|e| TokenLayerError::Signing(e.to_string()))
    }

    async fn send_transaction(&self, transaction: &TransactionSubmission) -> Result<TxHash> {
        let mut submissions = locked(&self.submissions);
        let index = submissions.len();
        if self.fail_at == Some(index) {
            return Err(TokenLayerError::Rpc(format!(
                "mock submission #{index} rejected"
            )));
        }

        submissions.push(RecordedSubmission {
            transaction: transaction.clone(),
            rpc_url: self.rpc_url.clone(),
            bound_chain_id: *locked(&self.chain_id),
        });
        Ok(keccak256(format!("{}:{index}", transaction.chain_id)))
    }
}
