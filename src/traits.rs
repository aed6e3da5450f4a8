//! Traits for ingestion abstraction

use async_trait::async_trait;

use crate::types::*;

/// Source of transaction records for a reconciliation run
///
/// This trait lets the reconciliation engine work with any ingestion backend
/// (CSV files, in-memory fixtures, a database export, etc.). Implementations
/// either return the complete list or fail; partial results are never returned.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Load every system transaction from the named source
    async fn system_transactions(&self, source: &str) -> IngestResult<Vec<SystemTransaction>>;

    /// Load and concatenate the bank transactions of every named source, in order
    async fn bank_transactions(&self, sources: &[String]) -> IngestResult<Vec<BankTransaction>>;
}
