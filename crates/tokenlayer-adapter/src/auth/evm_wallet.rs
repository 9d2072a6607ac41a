/*
[INPUT]:  EVM private key (hex string), optional RPC endpoint and chain id
[OUTPUT]: Signed messages/typed data and broadcast transaction hashes
[POS]:    Auth layer - raw-key EVM wallet implementation
[UPDATE]: When signing logic or transaction submission changes
*/

use std::str::FromStr;
use std::sync::Arc;

use alloy::dyn_abi::TypedData;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::{Signature, Signer};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::auth::wallet::typed_data_hash;
use crate::auth::WalletSigner;
use crate::http::{Result, TokenLayerError};
use crate::types::TransactionSubmission;

/// Signer for EVM wallets holding a raw private key
///
/// Without an RPC endpoint it can only sign; `bind_rpc` produces a copy bound
/// to a specific chain that can broadcast.
#[derive(Debug, Clone)]
pub struct EvmWalletSigner {
    signer: PrivateKeySigner,
    chain_id: Option<u64>,
    rpc_url: Option<Url>,
}

impl EvmWalletSigner {
    /// Create a new EVM wallet signer from a hex-encoded private key
    ///
    /// Supports both "0x"-prefixed and non-prefixed hex strings.
    pub fn new(private_key_hex: &str) -> Result<Self> {
        let private_key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
        let signer = PrivateKeySigner::from_str(private_key_hex)
            .map_err(|e| TokenLayerError::Config(format!("Invalid EVM private key: {}", e)))?;

        Ok(Self {
            signer,
            chain_id: None,
            rpc_url: None,
        })
    }

    /// Bind to a chain id (used as the default EIP-712 domain chain)
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Broadcast through `rpc_url`
    pub fn with_rpc_url(mut self, rpc_url: Url) -> Self {
        self.rpc_url = Some(rpc_url);
        self
    }

    pub fn rpc_url(&self) -> Option<&Url> {
        self.rpc_url.as_ref()
    }
}

#[async_trait]
impl WalletSigner for EvmWalletSigner {
    fn address(&self) -> Address {
        self.signer.address()
    }

    fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    fn bind_rpc(&self, rpc_url: &Url, chain_id: u64) -> Option<Arc<dyn WalletSigner>> {
        Some(Arc::new(Self {
            signer: self.signer.clone(),
            chain_id: Some(chain_id),
            rpc_url: Some(rpc_url.clone()),
        }))
    }

    async fn sign_message(&self, message: &str) -> Result<Signature> {
        self.signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| TokenLayerError::Signing(format!("Failed to sign EVM message: {}", e)))
    }

    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Signature> {
        let hash = typed_data_hash(typed_data)?;
        self.signer
            .sign_hash(&hash)
            .await
            .map_err(|e| TokenLayerError::Signing(format!("Failed to sign typed data: {}", e)))
    }

    async fn send_transaction(&self, transaction: &TransactionSubmission) -> Result<TxHash> {
        let rpc_url = self.rpc_url.clone().ok_or_else(|| {
            TokenLayerError::Config(format!(
                "No RPC endpoint bound for chain {}",
                transaction.chain_id
            ))
        })?;

        let wallet = EthereumWallet::from(self.signer.clone());
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(rpc_url);

        let mut request = TransactionRequest::default()
            .with_from(self.signer.address())
            .with_to(transaction.to)
            .with_input(transaction.data.clone())
            .with_value(transaction.value)
            .with_chain_id(transaction.chain_id);
        if let Some(gas) = transaction.gas {
            request = request.with_gas_limit(gas);
        }

        let pending = provider
            .send_transaction(request)
            .await
            .map_err(|e| TokenLayerError::Rpc(format!("Failed to send transaction: {}", e)))?;
        let hash = *pending.tx_hash();

        debug!(chain_id = transaction.chain_id, tx_hash = %hash, "transaction accepted by node");
        Ok(hash)
    }
}
