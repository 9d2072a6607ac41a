/*
[INPUT]:  Server-returned transactions and wallet credentials
[OUTPUT]: Broadcast transaction records
[POS]:    Execution layer - multi-chain transaction dispatch
[UPDATE]: When execution or endpoint resolution changes
*/

pub mod endpoints;
pub mod executor;

pub use endpoints::RpcEndpoints;
pub use executor::{TransactionExecutor, ValidatedTransaction, validate_batch};
