/*
[INPUT]:  EVM private key, chain RPC URL and token metadata
[OUTPUT]: createToken response and broadcast transaction hashes
[POS]:    Examples - wallet-signed token creation
[UPDATE]: When createToken or execution API changes
*/

use std::env;
use std::sync::Arc;

use tokenlayer_adapter::*;
use url::Url;

/// Example: create a token with a wallet and broadcast the returned transactions
///
/// Environment:
///   TOKENLAYER_PRIVATE_KEY  hex EVM private key
///   BASE_RPC_URL            RPC used for chain 8453 (optional)
#[tokio::main]
async fn main() {
    println!("=== Token Layer createToken Example ===\n");

    let Ok(private_key) = env::var("TOKENLAYER_PRIVATE_KEY") else {
        eprintln!("Set TOKENLAYER_PRIVATE_KEY to run this example");
        return;
    };

    let signer = match EvmWalletSigner::new(&private_key) {
        Ok(signer) => signer.with_chain_id(8453),
        Err(e) => {
            eprintln!("Failed to load wallet: {}", e);
            return;
        }
    };
    println!("✓ Wallet loaded: {}", signer.address());

    let mut config = ClientConfig::default();
    if let Some(rpc) = env::var("BASE_RPC_URL")
        .ok()
        .and_then(|raw| Url::parse(&raw).ok())
    {
        config.rpc_by_chain_id.insert(8453, rpc);
    }

    let client = match TokenLayerClient::with_config(config) {
        Ok(client) => client.as_wallet(Arc::new(signer), None, None),
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ Client ready: {}", client.action_url());

    let action = CreateTokenAction {
        name: "Example Token".to_string(),
        symbol: "EXMPL".to_string(),
        description: "Created from the Rust adapter".to_string(),
        image: "https://example.com/token.png".to_string(),
        chain_slug: "base".to_string(),
        tags: Some(vec!["example".to_string()]),
        ..CreateTokenAction::default()
    };

    match client
        .create_token(
            CreateTokenParams::new(action),
            CreateTokenOptions { execute: true },
            None,
        )
        .await
    {
        Ok(result) => {
            println!("✓ createToken accepted: {:?}", result.response.data);
            for executed in result.executions.unwrap_or_default() {
                println!("  tx #{} on chain {:?}: {}", executed.index, executed.chain_id, executed.hash);
            }
        }
        Err(TokenLayerError::ExecutionAborted {
            failed_index,
            completed,
            source,
        }) => {
            eprintln!(
                "✗ Transaction #{} failed after {} broadcast: {}",
                failed_index,
                completed.len(),
                source
            );
        }
        Err(e) => eprintln!("✗ createToken failed: {}", e),
    }
}
