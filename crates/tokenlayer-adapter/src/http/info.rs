/*
[INPUT]:  Query parameters and optional credentials
[OUTPUT]: Tagged info responses (tokens, quotes, pools, balances, fees)
[POS]:    HTTP layer - info endpoint (public, optional-auth and bearer queries)
[UPDATE]: When adding info queries or changing their auth requirements
*/

use serde::Serialize;
use serde_json::{Map, Value};

use crate::auth::AuthCredential;
use crate::http::client::decode_tagged;
use crate::http::{Result, TokenLayerClient};
use crate::signing::with_type_tag;
use crate::types::{GetTokensV2Params, InfoAccess, InfoResponse, InfoType};

const INFO_TYPE_FIELD: &str = "type";

impl TokenLayerClient {
    /// List tokens
    ///
    /// POST /info {type: "getTokensV2"}
    /// Optional auth. The default builder code is injected when `builder_code` is absent.
    pub async fn get_tokens_v2(
        &self,
        params: GetTokensV2Params,
        auth: Option<&AuthCredential>,
    ) -> Result<InfoResponse> {
        let params = self.defaults.apply_to_get_tokens_v2(params);
        self.query_info(InfoType::GetTokensV2, &params, auth).await
    }

    /// Price quote for a buy/sell (always anonymous)
    pub async fn quote_token<P: Serialize>(&self, params: &P) -> Result<InfoResponse> {
        self.query_info(InfoType::QuoteToken, params, None).await
    }

    /// Profile of the authenticated user
    pub async fn me(&self, auth: Option<&AuthCredential>) -> Result<InfoResponse> {
        self.query_info(InfoType::Me, &Map::new(), auth).await
    }

    pub async fn get_pool_data<P: Serialize>(
        &self,
        params: &P,
        auth: Option<&AuthCredential>,
    ) -> Result<InfoResponse> {
        self.query_info(InfoType::GetPoolData, params, auth).await
    }

    pub async fn get_user_balance<P: Serialize>(
        &self,
        params: &P,
        auth: Option<&AuthCredential>,
    ) -> Result<InfoResponse> {
        self.query_info(InfoType::GetUserBalance, params, auth).await
    }

    pub async fn search_token<P: Serialize>(
        &self,
        params: &P,
        auth: Option<&AuthCredential>,
    ) -> Result<InfoResponse> {
        self.query_info(InfoType::SearchToken, params, auth).await
    }

    pub async fn check_token_ownership<P: Serialize>(
        &self,
        params: &P,
        auth: Option<&AuthCredential>,
    ) -> Result<InfoResponse> {
        self.query_info(InfoType::CheckTokenOwnership, params, auth)
            .await
    }

    pub async fn get_user_fees<P: Serialize>(
        &self,
        params: &P,
        auth: Option<&AuthCredential>,
    ) -> Result<InfoResponse> {
        self.query_info(InfoType::GetUserFees, params, auth).await
    }

    pub async fn get_user_fee_history<P: Serialize>(
        &self,
        params: &P,
        auth: Option<&AuthCredential>,
    ) -> Result<InfoResponse> {
        self.query_info(InfoType::GetUserFeeHistory, params, auth)
            .await
    }

    pub async fn get_leaderboard<P: Serialize>(
        &self,
        params: &P,
        auth: Option<&AuthCredential>,
    ) -> Result<InfoResponse> {
        self.query_info(InfoType::GetLeaderboard, params, auth).await
    }

    pub async fn get_user_portfolio<P: Serialize>(
        &self,
        params: &P,
        auth: Option<&AuthCredential>,
    ) -> Result<InfoResponse> {
        self.query_info(InfoType::GetUserPortfolio, params, auth)
            .await
    }

    /// POST `{type, ...params}` to the info endpoint and check the response `type`
    ///
    /// The bearer token is resolved according to [`InfoType::access`].
    pub async fn query_info<P: Serialize + ?Sized>(
        &self,
        info_type: InfoType,
        params: &P,
        auth: Option<&AuthCredential>,
    ) -> Result<InfoResponse> {
        let operation = info_type.as_str();
        let bearer = match info_type.access() {
            InfoAccess::Public => None,
            InfoAccess::OptionalBearer => self.auth.resolve_optional_bearer(auth, operation)?,
            InfoAccess::Bearer => Some(self.auth.resolve_bearer(auth, operation)?),
        };

        let body: Value = with_type_tag(params, operation)?;
        let payload = self.post_json(self.info_url(), &body, bearer).await?;
        decode_tagged(payload, INFO_TYPE_FIELD, operation)
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::AuthCredential;
    use crate::http::{ClientConfig, TokenLayerClient, TokenLayerError};
    use crate::types::InfoType;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> TokenLayerClient {
        TokenLayerClient::with_config(ClientConfig {
            base_url: server.uri(),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_quote_token_is_anonymous() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/info"))
            .and(body_partial_json(json!({"type": "quoteToken", "tokenId": "t1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "quoteToken",
                "amountOut": "12.5"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server).await.as_jwt("jwt");
        let response = client.quote_token(&json!({"tokenId": "t1"})).await.unwrap();
        assert_eq!(response.info_type, InfoType::QuoteToken);

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_me_requires_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/info"))
            .and(header("authorization", "Bearer api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "me",
                "walletAddress": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let anonymous = client(&server).await;
        assert!(matches!(
            anonymous.me(None).await.unwrap_err(),
            TokenLayerError::MissingAuth
        ));

        let override_auth = AuthCredential::api_key("api-key");
        let response = anonymous.me(Some(&override_auth)).await.unwrap();
        assert_eq!(response.info_type, InfoType::Me);
    }

    #[tokio::test]
    async fn test_info_type_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"type": "searchToken"})))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .get_leaderboard(&json!({}), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TokenLayerError::ProtocolMismatch { field: "type", .. }
        ));
    }
}
