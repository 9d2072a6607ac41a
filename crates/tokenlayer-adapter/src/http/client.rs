/*
[INPUT]:  HTTP configuration (base URL, timeouts, defaults, RPC endpoints, credentials)
[OUTPUT]: Configured client and decoded JSON responses
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::{AuthCredential, AuthResolver, WalletCredential, WalletSigner};
use crate::defaults::TokenLayerDefaults;
use crate::execution::RpcEndpoints;
use crate::http::{Result, TokenLayerError};
use crate::signing::NonceSource;
use crate::types::{ApiErrorBody, Source};

/// Production API base
pub const DEFAULT_BASE_URL: &str = "https://api.tokenlayer.network/functions/v1";

/// Default signature validity window
pub const DEFAULT_EXPIRES_AFTER_MS: u64 = 300_000;

const ACTION_PATH: &str = "/token-layer";
const INFO_PATH: &str = "/info";

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub source: Source,
    pub expires_after_ms: u64,
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,
    pub defaults: TokenLayerDefaults,
    pub rpc_by_chain_id: HashMap<u64, Url>,
    pub rpc_by_chain_slug: HashMap<String, Url>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            source: Source::default(),
            expires_after_ms: DEFAULT_EXPIRES_AFTER_MS,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            defaults: TokenLayerDefaults::default(),
            rpc_by_chain_id: HashMap::new(),
            rpc_by_chain_slug: HashMap::new(),
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// Main HTTP client for the Token Layer API
///
/// Cloning is cheap; clones share the connection pool and nonce source.
#[derive(Debug, Clone)]
pub struct TokenLayerClient {
    http_client: Client,
    action_url: Url,
    info_url: Url,
    source: Source,
    expires_after_ms: u64,
    pub(crate) auth: AuthResolver,
    pub(crate) defaults: TokenLayerDefaults,
    pub(crate) endpoints: RpcEndpoints,
    nonces: Arc<NonceSource>,
}

impl TokenLayerClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let api_base = normalize_api_base_url(&config.base_url);
        Ok(Self {
            http_client,
            action_url: Url::parse(&format!("{api_base}{ACTION_PATH}"))?,
            info_url: Url::parse(&format!("{api_base}{INFO_PATH}"))?,
            source: config.source,
            expires_after_ms: config.expires_after_ms,
            auth: AuthResolver::default(),
            defaults: config.defaults,
            endpoints: RpcEndpoints::new(config.rpc_by_chain_slug, config.rpc_by_chain_id),
            nonces: Arc::new(NonceSource::new()),
        })
    }

    /// Client sharing this configuration with `credential` as its default auth
    pub fn with_auth(&self, credential: AuthCredential) -> Self {
        Self {
            auth: AuthResolver::new(Some(credential)),
            ..self.clone()
        }
    }

    pub fn as_wallet(
        &self,
        signer: Arc<dyn WalletSigner>,
        wallet_address: Option<Address>,
        signature_chain_id: Option<u64>,
    ) -> Self {
        self.with_auth(AuthCredential::Wallet(WalletCredential {
            signer,
            address: wallet_address,
            signature_chain_id,
        }))
    }

    pub fn as_jwt(&self, token: impl Into<String>) -> Self {
        self.with_auth(AuthCredential::jwt(token))
    }

    pub fn as_api_key(&self, token: impl Into<String>) -> Self {
        self.with_auth(AuthCredential::api_key(token))
    }

    pub fn action_url(&self) -> &Url {
        &self.action_url
    }

    pub fn info_url(&self) -> &Url {
        &self.info_url
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn expires_after_ms(&self) -> u64 {
        self.expires_after_ms
    }

    pub fn defaults(&self) -> &TokenLayerDefaults {
        &self.defaults
    }

    pub fn rpc_endpoints(&self) -> &RpcEndpoints {
        &self.endpoints
    }

    pub fn auth(&self) -> &AuthResolver {
        &self.auth
    }

    /// Fresh timestamp nonce, strictly greater than any issued by this client
    pub fn next_nonce(&self) -> u64 {
        self.nonces.next()
    }

    /// POST a JSON body and return the decoded JSON response
    ///
    /// Non-2xx responses become [`TokenLayerError::Api`].
    pub(crate) async fn post_json<B>(&self, url: &Url, body: &B, bearer: Option<&str>) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self
            .http_client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        debug!(url = %url, authenticated = bearer.is_some(), "POST");
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let payload = serde_json::from_str::<Value>(&text);

        if !status.is_success() {
            let body = match &payload {
                Ok(value) => ApiErrorBody::from_value(status.as_u16(), value),
                Err(_) => ApiErrorBody::non_json(status.as_u16()),
            };
            warn!(
                status = status.as_u16(),
                code = body.code.as_deref().unwrap_or(""),
                error = %body.error,
                "Token Layer API error"
            );
            return Err(TokenLayerError::api_error(status, body));
        }

        Ok(payload?)
    }
}

/// Strip trailing slashes and a trailing `/token-layer` or `/info` segment
pub fn normalize_api_base_url(base_url: &str) -> &str {
    let clean = base_url.trim_end_matches('/');
    clean
        .strip_suffix(ACTION_PATH)
        .or_else(|| clean.strip_suffix(INFO_PATH))
        .unwrap_or(clean)
}

/// Check the response tag `field` equals `expected`, then decode
pub(crate) fn decode_tagged<T: DeserializeOwned>(
    payload: Value,
    field: &'static str,
    expected: &str,
) -> Result<T> {
    let actual = payload.get(field).and_then(Value::as_str);
    if actual != Some(expected) {
        return Err(TokenLayerError::ProtocolMismatch {
            field,
            expected: expected.to_string(),
            actual: payload.get(field).map(|tag| match tag {
                Value::String(tag) => tag.clone(),
                other => other.to_string(),
            }),
        });
    }
    Ok(serde_json::from_value(payload)?)
}
