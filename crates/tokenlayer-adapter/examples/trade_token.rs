/*
[INPUT]:  JWT or API key and trade parameters
[OUTPUT]: Quote and tradeToken responses
[POS]:    Examples - bearer actions and info queries
[UPDATE]: When bearer action or info API changes
*/

use std::env;

use serde_json::json;
use tokenlayer_adapter::*;

/// Example: quote a token, then trade it with bearer auth
///
/// Environment:
///   TOKENLAYER_API_KEY  API key (or TOKENLAYER_JWT)
///   TOKENLAYER_TOKEN_ID token to trade
#[tokio::main]
async fn main() {
    println!("=== Token Layer Trading Example ===\n");

    let client = match TokenLayerClient::new() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ HTTP client created");

    let token_id = env::var("TOKENLAYER_TOKEN_ID").unwrap_or_else(|_| "example-token".to_string());

    // Quotes are public
    match client
        .quote_token(&json!({"tokenId": token_id, "amount": "10", "direction": "buy"}))
        .await
    {
        Ok(quote) => println!("✓ Quote: {:?}", quote.data),
        Err(e) => eprintln!("✗ Quote failed: {}", e),
    }

    let client = match (env::var("TOKENLAYER_API_KEY"), env::var("TOKENLAYER_JWT")) {
        (Ok(key), _) => client.as_api_key(key),
        (_, Ok(jwt)) => client.as_jwt(jwt),
        _ => {
            println!("\nSet TOKENLAYER_API_KEY or TOKENLAYER_JWT to place the trade");
            return;
        }
    };

    let trade = ActionParams::new(json!({
        "tokenId": token_id,
        "direction": "buy",
        "amount": "10"
    }));
    match client.trade_token(trade, None).await {
        Ok(response) => println!("✓ Trade submitted: {:?}", response.data),
        Err(e) if e.is_auth_error() => eprintln!("✗ Auth rejected: {}", e),
        Err(e) => eprintln!("✗ Trade failed: {}", e),
    }
}
