/*
[INPUT]:  Action parameters and the active credential
[OUTPUT]: Tagged action responses (and broadcast transactions for createToken)
[POS]:    HTTP layer - action endpoint (wallet-signed and bearer actions)
[UPDATE]: When adding actions or changing envelope/auth rules
*/

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::auth::{AuthCredential, WalletCredential};
use crate::execution::TransactionExecutor;
use crate::http::client::decode_tagged;
use crate::http::{Result, TokenLayerClient, TokenLayerError};
use crate::signing::{RequestSigner, SigningContext, tagged_action};
use crate::types::{
    ActionParams, ActionResponse, ActionType, BearerActionRequest, CreateTokenOptions,
    CreateTokenParams, CreateTokenResponse, CreateTokenResult, RegisterParams, RegisterResponse,
};

const ACTION_TYPE_FIELD: &str = "actionType";

impl TokenLayerClient {
    /// Register the wallet account
    ///
    /// POST /token-layer
    /// Requires: wallet auth (SIWE + EIP-712 signatures in the body)
    pub async fn register(
        &self,
        params: RegisterParams,
        auth: Option<&AuthCredential>,
    ) -> Result<RegisterResponse> {
        let wallet = self.auth.require_wallet(auth, ActionType::Register.as_str())?;
        let context = SigningContext {
            source: params.source.unwrap_or(self.source()),
            nonce: params.nonce.unwrap_or_else(|| self.next_nonce()),
            expires_after: params.expires_after.unwrap_or(self.expires_after_ms()),
            signature_chain_id: params.signature_chain_id,
        };

        let request = RequestSigner::new(wallet)
            .sign_register(context, params.wallet_address, params.message)
            .await?;

        let payload = self.post_signed(wallet, &request).await?;
        decode_tagged(payload, ACTION_TYPE_FIELD, ActionType::Register.as_str())
    }

    /// Create a token, optionally executing the returned transactions
    ///
    /// POST /token-layer
    /// Wallet auth signs the canonical action; JWT/API key auth sends a bearer envelope.
    /// `options.execute` requires wallet auth and is checked before any request.
    pub async fn create_token(
        &self,
        params: CreateTokenParams,
        options: CreateTokenOptions,
        auth: Option<&AuthCredential>,
    ) -> Result<CreateTokenResult> {
        let credential = self.auth.resolve(auth)?;
        let executor_wallet = match credential {
            AuthCredential::Wallet(wallet) => Some(wallet),
            other if options.execute => {
                return Err(TokenLayerError::AuthTypeMismatch {
                    operation: "createToken with execute".to_string(),
                    expected: "wallet",
                    actual: other.kind_name(),
                });
            }
            _ => None,
        };

        let action = self.defaults.apply_to_create_token(params.action);
        let source = params.source.unwrap_or(self.source());
        let expires_after = params.expires_after.unwrap_or(self.expires_after_ms());

        let payload = match credential {
            AuthCredential::Wallet(wallet) => {
                let context = SigningContext {
                    source,
                    nonce: params.nonce.unwrap_or_else(|| self.next_nonce()),
                    expires_after,
                    signature_chain_id: params.signature_chain_id,
                };
                let request = RequestSigner::new(wallet)
                    .sign_create_token(context, &action)
                    .await?;
                self.post_signed(wallet, &request).await?
            }
            AuthCredential::Jwt(token) | AuthCredential::ApiKey(token) => {
                let request = BearerActionRequest {
                    source,
                    expires_after,
                    action: tagged_action(&action, ActionType::CreateToken)?,
                };
                self.post_json(self.action_url(), &request, Some(token.as_str()))
                    .await?
            }
        };

        let response: CreateTokenResponse =
            decode_tagged(payload, ACTION_TYPE_FIELD, ActionType::CreateToken.as_str())?;
        info!(
            chain_slug = %action.chain_slug,
            transactions = response.pending_transactions().len(),
            "createToken accepted"
        );

        let executions = match executor_wallet {
            Some(wallet) if options.execute => Some(
                TransactionExecutor::new(wallet, &self.endpoints)
                    .execute(&response, &action.chain_slug)
                    .await?,
            ),
            _ => None,
        };

        Ok(CreateTokenResult {
            response,
            executions,
        })
    }

    pub async fn trade_token<A: Serialize>(
        &self,
        params: ActionParams<A>,
        auth: Option<&AuthCredential>,
    ) -> Result<ActionResponse> {
        self.dispatch_action(ActionType::TradeToken, params, auth).await
    }

    pub async fn send_transaction<A: Serialize>(
        &self,
        params: ActionParams<A>,
        auth: Option<&AuthCredential>,
    ) -> Result<ActionResponse> {
        self.dispatch_action(ActionType::SendTransaction, params, auth)
            .await
    }

    pub async fn transfer_token<A: Serialize>(
        &self,
        params: ActionParams<A>,
        auth: Option<&AuthCredential>,
    ) -> Result<ActionResponse> {
        self.dispatch_action(ActionType::TransferToken, params, auth)
            .await
    }

    pub async fn claim_rewards<A: Serialize>(
        &self,
        params: ActionParams<A>,
        auth: Option<&AuthCredential>,
    ) -> Result<ActionResponse> {
        self.dispatch_action(ActionType::ClaimRewards, params, auth)
            .await
    }

    pub async fn create_referral_code<A: Serialize>(
        &self,
        params: ActionParams<A>,
        auth: Option<&AuthCredential>,
    ) -> Result<ActionResponse> {
        self.dispatch_action(ActionType::CreateReferralCode, params, auth)
            .await
    }

    pub async fn enter_referral_code<A: Serialize>(
        &self,
        params: ActionParams<A>,
        auth: Option<&AuthCredential>,
    ) -> Result<ActionResponse> {
        self.dispatch_action(ActionType::EnterReferralCode, params, auth)
            .await
    }

    pub async fn mint_usd<A: Serialize>(
        &self,
        params: ActionParams<A>,
        auth: Option<&AuthCredential>,
    ) -> Result<ActionResponse> {
        self.dispatch_action(ActionType::MintUsd, params, auth).await
    }

    /// Send a bearer-authenticated action and check the response tag
    ///
    /// Body: `{source, expiresAfter, action: {...payload, type}}`
    pub async fn dispatch_action<A: Serialize>(
        &self,
        action_type: ActionType,
        params: ActionParams<A>,
        auth: Option<&AuthCredential>,
    ) -> Result<ActionResponse> {
        if !action_type.is_bearer_only() {
            return Err(TokenLayerError::InvalidRequest(format!(
                "{action_type} is wallet-signed; use the dedicated method"
            )));
        }

        let token = self.auth.resolve_bearer(auth, action_type.as_str())?;
        let request = BearerActionRequest {
            source: params.source.unwrap_or(self.source()),
            expires_after: params.expires_after.unwrap_or(self.expires_after_ms()),
            action: tagged_action(&params.action, action_type)?,
        };

        debug!(action = %action_type, "dispatching bearer action");
        let payload = self
            .post_json(self.action_url(), &request, Some(token))
            .await?;
        decode_tagged(payload, ACTION_TYPE_FIELD, action_type.as_str())
    }

    /// Wallet-signed requests carry the checksummed account as bearer
    async fn post_signed<B: Serialize>(&self, wallet: &WalletCredential, request: &B) -> Result<Value> {
        let bearer = wallet.signer.address().to_checksum(None);
        self.post_json(self.action_url(), request, Some(&bearer))
            .await
    }
}
