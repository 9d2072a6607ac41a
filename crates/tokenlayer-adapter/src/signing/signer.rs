/*
[INPUT]:  Wallet credential, action parameters, nonce and expiry
[OUTPUT]: Wallet-signed register/createToken request envelopes
[POS]:    Signing layer - request signing for wallet-authenticated actions
[UPDATE]: When signing flow or envelope layout changes
*/

use alloy::primitives::Address;
use serde_json::Value;
use tracing::debug;

use crate::auth::{WalletCredential, WalletSigner, signature_hex};
use crate::http::{Result, TokenLayerError};
use crate::types::{ActionType, CreateTokenAction, RegisterAction, SignedActionRequest, Source};

use super::canonical::chain_id_hex;
use super::siwe::SiweMessage;
use super::typed_data::{create_token_typed_data, register_typed_data};

/// Envelope fields shared by every signed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningContext {
    pub source: Source,
    pub nonce: u64,
    pub expires_after: u64,
    /// Per-call EIP-712 domain chain id
    pub signature_chain_id: Option<u64>,
}

/// Signs register and createToken requests with a wallet credential
pub struct RequestSigner<'a> {
    wallet: &'a WalletCredential,
}

impl<'a> RequestSigner<'a> {
    pub fn new(wallet: &'a WalletCredential) -> Self {
        Self { wallet }
    }

    fn signer(&self) -> &dyn WalletSigner {
        self.wallet.signer.as_ref()
    }

    /// Domain chain id: per-call value, then credential, then the wallet's chain
    pub fn signature_chain_id(&self, explicit: Option<u64>) -> Result<u64> {
        explicit
            .or(self.wallet.signature_chain_id)
            .or_else(|| self.signer().chain_id())
            .ok_or(TokenLayerError::SignatureChainIdRequired)
    }

    /// Signing account, checked against `provided` and the credential's address
    pub fn account_address(&self, provided: Option<Address>) -> Result<Address> {
        let account = self.signer().address();
        for expected in [provided, self.wallet.address].into_iter().flatten() {
            if expected != account {
                return Err(TokenLayerError::AddressMismatch {
                    provided: expected.to_checksum(None),
                    signer: account.to_checksum(None),
                });
            }
        }
        Ok(account)
    }

    /// Register: SIWE plaintext signature inside the action, typed-data signature outside
    pub async fn sign_register(
        &self,
        context: SigningContext,
        wallet_address: Option<Address>,
        message: Option<String>,
    ) -> Result<SignedActionRequest> {
        let address = self.account_address(wallet_address)?;
        let chain_id = self.signature_chain_id(context.signature_chain_id)?;

        let message = match message.filter(|message| !message.is_empty()) {
            Some(message) => message,
            None => SiweMessage::register(address, chain_id, context.nonce, context.expires_after)
                .to_message()?,
        };

        let action_signature = self.signer().sign_message(&message).await?;
        let typed = register_typed_data(
            context.source,
            context.nonce,
            context.expires_after,
            chain_id,
        )?;
        let typed_signature = self.signer().sign_typed_data(&typed).await?;

        debug!(
            action = %ActionType::Register,
            signature_chain_id = chain_id,
            nonce = context.nonce,
            "signed register request"
        );

        let action = RegisterAction {
            action_type: ActionType::Register,
            method: "web3".to_string(),
            message,
            signature: signature_hex(&action_signature),
        };

        Ok(SignedActionRequest {
            source: context.source,
            nonce: context.nonce,
            expires_after: context.expires_after,
            signature_chain_id: chain_id_hex(chain_id),
            signature: signature_hex(&typed_signature),
            action: serde_json::to_value(action)?,
        })
    }

    /// CreateToken: one typed-data signature over the canonical action
    ///
    /// A missing `user_address` is filled with the signing account, both in
    /// the signed struct and in the dispatched action.
    pub async fn sign_create_token(
        &self,
        context: SigningContext,
        action: &CreateTokenAction,
    ) -> Result<SignedActionRequest> {
        let account = self.account_address(None)?;
        let chain_id = self.signature_chain_id(context.signature_chain_id)?;

        let action = CreateTokenAction {
            user_address: Some(action.user_address.unwrap_or(account)),
            ..action.clone()
        };

        let typed = create_token_typed_data(
            &action,
            context.source,
            context.nonce,
            context.expires_after,
            chain_id,
        )?;
        let signature = self.signer().sign_typed_data(&typed).await?;

        debug!(
            action = %ActionType::CreateToken,
            chain_slug = %action.chain_slug,
            signature_chain_id = chain_id,
            nonce = context.nonce,
            "signed createToken request"
        );

        Ok(SignedActionRequest {
            source: context.source,
            nonce: context.nonce,
            expires_after: context.expires_after,
            signature_chain_id: chain_id_hex(chain_id),
            signature: signature_hex(&signature),
            action: tagged_action(&action, ActionType::CreateToken)?,
        })
    }
}

/// Serialize `payload` as a JSON object tagged with `action_type`
pub fn tagged_action<T: serde::Serialize + ?Sized>(
    payload: &T,
    action_type: ActionType,
) -> Result<Value> {
    with_type_tag(payload, action_type.as_str())
}

/// Serialize `payload` as a JSON object and set its `type` field to `tag`
pub fn with_type_tag<T: serde::Serialize + ?Sized>(payload: &T, tag: &str) -> Result<Value> {
    let mut value = serde_json::to_value(payload)?;
    let object = value.as_object_mut().ok_or_else(|| {
        TokenLayerError::InvalidRequest(format!("{tag} payload must be a JSON object"))
    })?;
    object.insert("type".to_string(), Value::String(tag.to_string()));
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MockWalletSigner;
    use crate::auth::wallet::typed_data_hash;
    use alloy::signers::Signature;
    use std::str::FromStr;
    use std::sync::Arc;

    fn credential(chain_id: Option<u64>) -> WalletCredential {
        let signer = match chain_id {
            Some(chain_id) => MockWalletSigner::new().with_chain_id(chain_id),
            None => MockWalletSigner::new(),
        };
        WalletCredential::new(Arc::new(signer))
    }

    fn context() -> SigningContext {
        SigningContext {
            source: Source::Mainnet,
            nonce: 1_704_067_200_000,
            expires_after: 300_000,
            signature_chain_id: None,
        }
    }

    fn action() -> CreateTokenAction {
        CreateTokenAction {
            name: "Layer".to_string(),
            symbol: "LYR".to_string(),
            description: "test token".to_string(),
            image: "https://img.example/lyr.png".to_string(),
            chain_slug: "base".to_string(),
            tags: Some(vec!["meme".to_string(), "ai".to_string()]),
            ..CreateTokenAction::default()
        }
    }

    #[test]
    fn test_signature_chain_id_resolution_order() {
        let wallet = credential(Some(1)).with_signature_chain_id(10);
        let signer = RequestSigner::new(&wallet);
        assert_eq!(signer.signature_chain_id(Some(8453)).unwrap(), 8453);
        assert_eq!(signer.signature_chain_id(None).unwrap(), 10);

        let wallet = credential(Some(1));
        assert_eq!(RequestSigner::new(&wallet).signature_chain_id(None).unwrap(), 1);

        let wallet = credential(None);
        assert!(matches!(
            RequestSigner::new(&wallet).signature_chain_id(None),
            Err(TokenLayerError::SignatureChainIdRequired)
        ));
    }

    #[tokio::test]
    async fn test_create_token_defaults_user_address_and_recovers() {
        let wallet = credential(Some(8453));
        let signer = RequestSigner::new(&wallet);

        let request = signer.sign_create_token(context(), &action()).await.unwrap();
        assert_eq!(request.signature_chain_id, "0x2105");
        assert_eq!(request.action["type"], "createToken");
        assert_eq!(
            request.action["userAddress"],
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );

        let signed = CreateTokenAction {
            user_address: Some(wallet.signer.address()),
            ..action()
        };
        let typed = create_token_typed_data(&signed, Source::Mainnet, 1_704_067_200_000, 300_000, 8453)
            .unwrap();
        let hash = typed_data_hash(&typed).unwrap();
        let signature = Signature::from_str(&request.signature).unwrap();
        assert_eq!(
            signature.recover_address_from_prehash(&hash).unwrap(),
            wallet.signer.address()
        );
    }

    #[tokio::test]
    async fn test_create_token_without_chain_id_fails() {
        let wallet = credential(None);
        let err = RequestSigner::new(&wallet)
            .sign_create_token(context(), &action())
            .await
            .unwrap_err();
        assert!(matches!(err, TokenLayerError::SignatureChainIdRequired));
    }

    #[tokio::test]
    async fn test_register_envelope() {
        let wallet = credential(None);
        let signer = RequestSigner::new(&wallet);
        let context = SigningContext {
            signature_chain_id: Some(8453),
            ..context()
        };

        let request = signer.sign_register(context, None, None).await.unwrap();
        assert_eq!(request.signature_chain_id, "0x2105");
        assert_eq!(request.action["type"], "register");
        assert_eq!(request.action["method"], "web3");

        let message = request.action["message"].as_str().unwrap();
        assert!(message.contains("Chain ID: 8453"));
        assert!(message.contains("Nonce: 1704067200000"));

        let plaintext = Signature::from_str(request.action["signature"].as_str().unwrap()).unwrap();
        assert_eq!(
            plaintext.recover_address_from_msg(message).unwrap(),
            wallet.signer.address()
        );
    }

    #[tokio::test]
    async fn test_register_address_mismatch() {
        let wallet = credential(Some(8453));
        let other = Address::from_str("0x0000000000000000000000000000000000000001").unwrap();

        let err = RequestSigner::new(&wallet)
            .sign_register(context(), Some(other), None)
            .await
            .unwrap_err();
        assert!(matches!(err, TokenLayerError::AddressMismatch { .. }));
    }

    #[test]
    fn test_tagged_action_rejects_non_objects() {
        let err = tagged_action(&vec![1, 2], ActionType::TradeToken).unwrap_err();
        assert!(matches!(err, TokenLayerError::InvalidRequest(_)));

        let tagged = tagged_action(&serde_json::json!({"amount": "1"}), ActionType::TradeToken)
            .unwrap();
        assert_eq!(tagged["type"], "tradeToken");
    }
}
