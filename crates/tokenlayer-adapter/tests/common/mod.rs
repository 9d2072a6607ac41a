/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for tokenlayer-adapter tests

#![allow(dead_code)]

use serde_json::{Value, json};
use tokenlayer_adapter::{ClientConfig, CreateTokenAction, TokenLayerClient};
use wiremock::MockServer;

/// Checksummed address of the mock signer key
pub const MOCK_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Builder code used by the defaults tests
pub const BUILDER_CODE: &str = "0xBEEF000000000000000000000000000000BEEF";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client whose action/info endpoints point at `server`
pub fn client_for(server: &MockServer, config: ClientConfig) -> TokenLayerClient {
    TokenLayerClient::with_config(ClientConfig {
        base_url: server.uri(),
        ..config
    })
    .expect("client should build")
}

/// Mock JWT token for testing
pub fn mock_jwt_token() -> String {
    "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test.signature".to_string()
}

pub fn sample_create_token_action() -> CreateTokenAction {
    CreateTokenAction {
        name: "Layer Cat".to_string(),
        symbol: "LCAT".to_string(),
        description: "integration test token".to_string(),
        image: "https://img.example/lcat.png".to_string(),
        chain_slug: "base".to_string(),
        tags: Some(vec!["cat".to_string(), "meme".to_string()]),
        ..CreateTokenAction::default()
    }
}

/// Server-side transaction on `chain_slug`/`chain_id`
pub fn server_transaction(chain_slug: &str, chain_id: u64) -> Value {
    json!({
        "to": "0x4200000000000000000000000000000000000006",
        "data": "0xd0e30db0",
        "value": "1000",
        "gasLimit": 120000,
        "chainId": chain_id,
        "chainSlug": chain_slug,
        "chainType": "evm"
    })
}

/// JSON body of the `index`-th request received by `server`
pub async fn request_body(server: &MockServer, index: usize) -> Value {
    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    serde_json::from_slice(&requests[index].body).expect("JSON request body")
}
