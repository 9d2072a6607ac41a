/*
[INPUT]:  Wallet credential, createToken response, expected chain slug
[OUTPUT]: Ordered records of broadcast transactions
[POS]:    Execution layer - validates and sequentially submits server transactions
[UPDATE]: When chain validation rules or client resolution change
*/

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::{WalletCredential, WalletSigner};
use crate::http::{Result, TokenLayerError};
use crate::types::serde_helpers::parse_quantity;
use crate::types::{CreateTokenResponse, ExecutedTransaction, Transaction, TransactionSubmission};

use super::RpcEndpoints;

/// Dedicated signing clients created during one batch, keyed by chain id.
/// Dropped when the batch returns.
type ClientCache = HashMap<u64, Arc<dyn WalletSigner>>;

/// A transaction that passed chain validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransaction {
    pub index: usize,
    pub chain_slug: String,
    pub submission: TransactionSubmission,
}

/// Check every transaction before anything is signed or sent
pub fn validate_batch(
    transactions: &[Transaction],
    expected_chain_slug: &str,
) -> Result<Vec<ValidatedTransaction>> {
    transactions
        .iter()
        .enumerate()
        .map(|(index, transaction)| validate_transaction(index, transaction, expected_chain_slug))
        .collect()
}

fn validate_transaction(
    index: usize,
    transaction: &Transaction,
    expected_chain_slug: &str,
) -> Result<ValidatedTransaction> {
    let chain_slug = transaction
        .chain_slug
        .as_deref()
        .filter(|slug| !slug.is_empty());
    if chain_slug != Some(expected_chain_slug) {
        return Err(TokenLayerError::StaleOrMismatchedChain {
            index,
            expected: expected_chain_slug.to_string(),
            actual: chain_slug.map(str::to_string),
        });
    }

    if let Some(chain_type) = &transaction.chain_type {
        if !chain_type.eq_ignore_ascii_case("evm") {
            return Err(TokenLayerError::UnsupportedChainType {
                index,
                chain_type: chain_type.clone(),
            });
        }
    }

    let chain_id = transaction
        .chain_id
        .ok_or(TokenLayerError::MissingTransactionChainId { index })?;

    let invalid = |field: &'static str, reason: String| TokenLayerError::InvalidTransactionField {
        index,
        field,
        reason,
    };

    let to = transaction
        .to
        .as_deref()
        .map(str::trim)
        .filter(|to| !to.is_empty())
        .ok_or_else(|| invalid("to", "missing".to_string()))?;
    let to = Address::from_str(to).map_err(|err| invalid("to", err.to_string()))?;

    let data = match transaction.data.as_deref().map(str::trim) {
        None | Some("") => Bytes::new(),
        Some(data) => Bytes::from_str(data).map_err(|err| invalid("data", err.to_string()))?,
    };

    let value = match &transaction.value {
        None | Some(Value::Null) => return Err(invalid("value", "missing".to_string())),
        Some(value) => parse_quantity(value)
            .ok_or_else(|| invalid("value", format!("not a quantity: {value}")))?,
    };

    let gas = match &transaction.gas_limit {
        None | Some(Value::Null) => None,
        Some(gas) => Some(
            parse_quantity(gas)
                .and_then(|gas| u64::try_from(gas).ok())
                .ok_or_else(|| invalid("gasLimit", format!("not a u64 quantity: {gas}")))?,
        ),
    };

    Ok(ValidatedTransaction {
        index,
        chain_slug: expected_chain_slug.to_string(),
        submission: TransactionSubmission {
            to,
            data,
            value,
            gas,
            chain_id,
        },
    })
}

/// Executes server-returned transactions with a wallet credential
pub struct TransactionExecutor<'a> {
    wallet: &'a WalletCredential,
    endpoints: &'a RpcEndpoints,
}

impl<'a> TransactionExecutor<'a> {
    pub fn new(wallet: &'a WalletCredential, endpoints: &'a RpcEndpoints) -> Self {
        Self { wallet, endpoints }
    }

    /// Execute the transactions of a createToken response
    pub async fn execute(
        &self,
        response: &CreateTokenResponse,
        expected_chain_slug: &str,
    ) -> Result<Vec<ExecutedTransaction>> {
        self.execute_batch(&response.pending_transactions(), expected_chain_slug)
            .await
    }

    /// Validate the whole batch, then submit one transaction at a time.
    ///
    /// A failure after at least one broadcast returns
    /// [`TokenLayerError::ExecutionAborted`] carrying the transactions already
    /// sent; a failure on the first transaction is returned as is.
    pub async fn execute_batch(
        &self,
        transactions: &[Transaction],
        expected_chain_slug: &str,
    ) -> Result<Vec<ExecutedTransaction>> {
        if transactions.is_empty() {
            debug!("no transactions to execute");
            return Ok(Vec::new());
        }

        let batch = validate_batch(transactions, expected_chain_slug)?;
        info!(
            count = batch.len(),
            chain_slug = %expected_chain_slug,
            "executing transaction batch"
        );

        let mut cache = ClientCache::new();
        let mut completed = Vec::with_capacity(batch.len());
        for transaction in &batch {
            match self.submit(&mut cache, transaction).await {
                Ok(record) => completed.push(record),
                Err(source) => {
                    warn!(
                        index = transaction.index,
                        chain_id = transaction.submission.chain_id,
                        completed = completed.len(),
                        error = %source,
                        "transaction batch aborted"
                    );
                    if completed.is_empty() {
                        return Err(source);
                    }
                    return Err(TokenLayerError::ExecutionAborted {
                        failed_index: transaction.index,
                        completed,
                        source: Box::new(source),
                    });
                }
            }
        }

        Ok(completed)
    }

    async fn submit(
        &self,
        cache: &mut ClientCache,
        transaction: &ValidatedTransaction,
    ) -> Result<ExecutedTransaction> {
        let submission = &transaction.submission;
        let client = self
            .resolve_client(cache, transaction.index, &transaction.chain_slug, submission.chain_id)
            .await?;

        let hash = client.send_transaction(submission).await?;
        info!(
            index = transaction.index,
            chain_id = submission.chain_id,
            tx_hash = %hash,
            "transaction submitted"
        );

        Ok(ExecutedTransaction {
            index: transaction.index,
            chain_id: Some(submission.chain_id),
            hash,
            to: submission.to,
        })
    }

    /// Dedicated client for raw-key accounts with a configured RPC endpoint,
    /// otherwise the base client (switched to `chain_id` when it can be).
    async fn resolve_client(
        &self,
        cache: &mut ClientCache,
        index: usize,
        chain_slug: &str,
        chain_id: u64,
    ) -> Result<Arc<dyn WalletSigner>> {
        if let Some(client) = cache.get(&chain_id) {
            return Ok(Arc::clone(client));
        }

        let base = &self.wallet.signer;
        if let Some(rpc_url) = self.endpoints.resolve(Some(chain_slug), chain_id) {
            if let Some(client) = base.bind_rpc(rpc_url, chain_id) {
                debug!(chain_id, "created dedicated signing client");
                cache.insert(chain_id, Arc::clone(&client));
                return Ok(client);
            }
        }

        match base.chain_id() {
            Some(bound) if bound != chain_id => {
                if !base.supports_chain_switch() {
                    return Err(TokenLayerError::ChainMismatch {
                        index,
                        required: chain_id,
                        bound,
                    });
                }
                debug!(from = bound, to = chain_id, "switching wallet chain");
                base.switch_chain(chain_id).await?;
            }
            _ => {}
        }

        Ok(Arc::clone(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MockWalletSigner;
    use alloy::primitives::U256;
    use serde_json::json;
    use url::Url;

    fn tx(chain_slug: Option<&str>, chain_id: Option<u64>) -> Transaction {
        Transaction {
            to: Some(Address::repeat_byte(0x42).to_string()),
            data: Some("0xabcd".to_string()),
            value: Some(json!("7")),
            gas_limit: Some(json!(21_000)),
            chain_id,
            chain_slug: chain_slug.map(str::to_string),
            chain_type: None,
        }
    }

    fn wallet(signer: MockWalletSigner) -> WalletCredential {
        WalletCredential::new(Arc::new(signer))
    }

    #[tokio::test]
    async fn test_executes_in_order() {
        let signer = MockWalletSigner::new().with_chain_id(8453);
        let wallet = wallet(signer.clone());
        let endpoints = RpcEndpoints::default();
        let executor = TransactionExecutor::new(&wallet, &endpoints);

        let batch = vec![tx(Some("base"), Some(8453)); 3];
        let executed = executor.execute_batch(&batch, "base").await.unwrap();

        assert_eq!(executed.len(), 3);
        for (position, record) in executed.iter().enumerate() {
            assert_eq!(record.index, position);
            assert_eq!(record.chain_id, Some(8453));
            assert_eq!(record.to, Address::repeat_byte(0x42));
        }
        assert_eq!(signer.submission_count(), 3);
        assert_eq!(signer.submissions()[0].transaction.gas, Some(21_000));
    }

    #[tokio::test]
    async fn test_validation_happens_before_any_submission() {
        let signer = MockWalletSigner::new().with_chain_id(8453);
        let wallet = wallet(signer.clone());
        let endpoints = RpcEndpoints::default();
        let executor = TransactionExecutor::new(&wallet, &endpoints);

        let batch = vec![tx(Some("base"), Some(8453)), tx(Some("ethereum"), Some(1))];
        let err = executor.execute_batch(&batch, "base").await.unwrap_err();

        match err {
            TokenLayerError::StaleOrMismatchedChain {
                index,
                expected,
                actual,
            } => {
                assert_eq!(index, 1);
                assert_eq!(expected, "base");
                assert_eq!(actual.as_deref(), Some("ethereum"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(signer.submission_count(), 0);
    }

    #[test]
    fn test_validate_batch_rules() {
        let missing_slug = validate_batch(&[tx(None, Some(1))], "base").unwrap_err();
        assert!(matches!(
            missing_slug,
            TokenLayerError::StaleOrMismatchedChain { actual: None, .. }
        ));

        let mut solana = tx(Some("base"), Some(8453));
        solana.chain_type = Some("solana".to_string());
        assert!(matches!(
            validate_batch(&[solana], "base").unwrap_err(),
            TokenLayerError::UnsupportedChainType { index: 0, .. }
        ));

        let mut upper_evm = tx(Some("base"), Some(8453));
        upper_evm.chain_type = Some("EVM".to_string());
        assert!(validate_batch(&[upper_evm], "base").is_ok());

        assert!(matches!(
            validate_batch(&[tx(Some("base"), None)], "base").unwrap_err(),
            TokenLayerError::MissingTransactionChainId { index: 0 }
        ));
    }

    #[test]
    fn test_validation_converts_evm_fields() {
        let validated = validate_batch(&[tx(Some("base"), Some(8453))], "base").unwrap();
        let submission = &validated[0].submission;
        assert_eq!(submission.to, Address::repeat_byte(0x42));
        assert_eq!(submission.data, Bytes::from_static(&[0xab, 0xcd]));
        assert_eq!(submission.value, U256::from(7));
        assert_eq!(submission.gas, Some(21_000));

        let mut no_data = tx(Some("base"), Some(8453));
        no_data.data = None;
        no_data.gas_limit = None;
        let validated = validate_batch(&[no_data], "base").unwrap();
        assert!(validated[0].submission.data.is_empty());
        assert_eq!(validated[0].submission.gas, None);
    }

    #[test]
    fn test_solana_transaction_is_unsupported_before_decoding() {
        let transaction = Transaction {
            to: Some("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin".to_string()),
            data: Some("AQID".to_string()),
            value: None,
            gas_limit: None,
            chain_id: Some(101),
            chain_slug: Some("base".to_string()),
            chain_type: Some("solana".to_string()),
        };
        assert!(matches!(
            validate_batch(&[transaction], "base").unwrap_err(),
            TokenLayerError::UnsupportedChainType { index: 0, ref chain_type } if chain_type == "solana"
        ));
    }

    #[test]
    fn test_missing_or_malformed_fields_are_rejected() {
        let mut no_value = tx(Some("base"), Some(8453));
        no_value.value = None;
        let mut null_value = tx(Some("base"), Some(8453));
        null_value.value = Some(Value::Null);
        let mut bad_to = tx(Some("base"), Some(8453));
        bad_to.to = Some("not-an-address".to_string());
        let mut no_to = tx(Some("base"), Some(8453));
        no_to.to = None;
        let mut bad_data = tx(Some("base"), Some(8453));
        bad_data.data = Some("AQID".to_string());
        let mut bad_gas = tx(Some("base"), Some(8453));
        bad_gas.gas_limit = Some(json!("lots"));

        for (transaction, expected_field) in [
            (no_value, "value"),
            (null_value, "value"),
            (bad_to, "to"),
            (no_to, "to"),
            (bad_data, "data"),
            (bad_gas, "gasLimit"),
        ] {
            let batch = vec![tx(Some("base"), Some(8453)), transaction];
            match validate_batch(&batch, "base").unwrap_err() {
                TokenLayerError::InvalidTransactionField { index, field, .. } => {
                    assert_eq!(index, 1);
                    assert_eq!(field, expected_field);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_missing_value_is_never_broadcast() {
        let signer = MockWalletSigner::new().with_chain_id(8453);
        let wallet = wallet(signer.clone());
        let endpoints = RpcEndpoints::default();
        let executor = TransactionExecutor::new(&wallet, &endpoints);

        let mut no_value = tx(Some("base"), Some(8453));
        no_value.value = None;
        let err = executor.execute_batch(&[no_value], "base").await.unwrap_err();

        assert!(err.is_chain_validation_error());
        assert_eq!(signer.submission_count(), 0);
    }

    #[test]
    fn test_fractional_chain_id_is_missing() {
        let transaction: Transaction = serde_json::from_value(json!({
            "to": "0x4200000000000000000000000000000000000006",
            "data": "0x",
            "value": "0",
            "chainId": 8453.5,
            "chainSlug": "base"
        }))
        .unwrap();
        assert!(validate_batch(&[transaction], "base")
            .unwrap_err()
            .is_chain_validation_error());
    }

    #[tokio::test]
    async fn test_chain_mismatch_without_switch() {
        let signer = MockWalletSigner::new().with_chain_id(1);
        let wallet = wallet(signer.clone());
        let endpoints = RpcEndpoints::default();
        let executor = TransactionExecutor::new(&wallet, &endpoints);

        let err = executor
            .execute_batch(&[tx(Some("base"), Some(8453))], "base")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), crate::http::ErrorKind::ChainMismatch);
        assert!(matches!(
            err,
            TokenLayerError::ChainMismatch {
                index: 0,
                required: 8453,
                bound: 1
            }
        ));
        assert!(err.completed_transactions().is_empty());
        assert_eq!(signer.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_switchable_wallet_switches_chain() {
        let signer = MockWalletSigner::new().with_chain_id(1).switchable();
        let wallet = wallet(signer.clone());
        let endpoints = RpcEndpoints::default();
        let executor = TransactionExecutor::new(&wallet, &endpoints);

        executor
            .execute_batch(&[tx(Some("base"), Some(8453)), tx(Some("base"), Some(8453))], "base")
            .await
            .unwrap();

        assert_eq!(signer.chain_switches(), vec![8453]);
        assert_eq!(signer.submissions()[1].bound_chain_id, Some(8453));
    }

    #[tokio::test]
    async fn test_raw_key_clients_are_cached_per_chain() {
        let signer = MockWalletSigner::new().with_chain_id(1).raw_key();
        let wallet = wallet(signer.clone());
        let rpc = Url::parse("https://base.example/rpc").unwrap();
        let endpoints = RpcEndpoints::default().with_chain_slug("base", rpc.clone());
        let executor = TransactionExecutor::new(&wallet, &endpoints);

        let batch = vec![tx(Some("base"), Some(8453)); 2];
        executor.execute_batch(&batch, "base").await.unwrap();

        assert_eq!(signer.bound_clients(), vec![(rpc.clone(), 8453)]);
        let submissions = signer.submissions();
        assert_eq!(submissions.len(), 2);
        assert!(submissions.iter().all(|s| s.rpc_url.as_ref() == Some(&rpc)));

        // A new batch builds its own client.
        executor.execute_batch(&batch[..1], "base").await.unwrap();
        assert_eq!(signer.bound_clients().len(), 2);
    }

    #[tokio::test]
    async fn test_mid_batch_failure_keeps_completed() {
        let signer = MockWalletSigner::new().with_chain_id(8453).failing_at(1);
        let wallet = wallet(signer.clone());
        let endpoints = RpcEndpoints::default();
        let executor = TransactionExecutor::new(&wallet, &endpoints);

        let batch = vec![tx(Some("base"), Some(8453)); 3];
        let err = executor.execute_batch(&batch, "base").await.unwrap_err();

        assert_eq!(err.completed_transactions().len(), 1);
        assert_eq!(err.completed_transactions()[0].index, 0);
        assert!(matches!(
            err,
            TokenLayerError::ExecutionAborted { failed_index: 1, .. }
        ));
        assert_eq!(signer.submission_count(), 1);
    }

    #[tokio::test]
    async fn test_first_submission_failure_is_unwrapped() {
        let signer = MockWalletSigner::new().with_chain_id(8453).failing_at(0);
        let wallet = wallet(signer.clone());
        let endpoints = RpcEndpoints::default();
        let executor = TransactionExecutor::new(&wallet, &endpoints);

        let batch = vec![tx(Some("base"), Some(8453)); 2];
        let err = executor.execute_batch(&batch, "base").await.unwrap_err();

        assert!(!matches!(err, TokenLayerError::ExecutionAborted { .. }));
        assert_eq!(err.kind(), crate::http::ErrorKind::Execution);
        assert_eq!(signer.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_response_is_noop() {
        let signer = MockWalletSigner::new();
        let wallet = wallet(signer.clone());
        let endpoints = RpcEndpoints::default();
        let executor = TransactionExecutor::new(&wallet, &endpoints);

        let response: CreateTokenResponse =
            serde_json::from_value(json!({"actionType": "createToken"})).unwrap();
        assert!(executor.execute(&response, "base").await.unwrap().is_empty());
        assert_eq!(signer.submission_count(), 0);
    }
}
