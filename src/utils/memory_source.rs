//! In-memory transaction source for testing

use async_trait::async_trait;
use std::collections::HashMap;

use crate::traits::*;
use crate::types::*;

/// In-memory source serving pre-built records keyed by source name
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    system: HashMap<String, Vec<SystemTransaction>>,
    bank: HashMap<String, Vec<BankTransaction>>,
}

impl MemorySource {
    /// Create an empty memory source
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the system transactions served under `source`
    pub fn with_system(mut self, source: &str, transactions: Vec<SystemTransaction>) -> Self {
        self.system.insert(source.to_string(), transactions);
        self
    }

    /// Register the bank transactions served under `source`
    pub fn with_bank(mut self, source: &str, transactions: Vec<BankTransaction>) -> Self {
        self.bank.insert(source.to_string(), transactions);
        self
    }
}

fn unknown_source(source: &str) -> IngestError {
    IngestError::Unreadable {
        origin: source.to_string(),
        message: "no such source".to_string(),
    }
}

#[async_trait]
impl TransactionSource for MemorySource {
    async fn system_transactions(&self, source: &str) -> IngestResult<Vec<SystemTransaction>> {
        self.system
            .get(source)
            .cloned()
            .ok_or_else(|| unknown_source(source))
    }

    async fn bank_transactions(&self, sources: &[String]) -> IngestResult<Vec<BankTransaction>> {
        let mut all = Vec::new();
        for source in sources {
            let transactions = self.bank.get(source).ok_or_else(|| unknown_source(source))?;
            all.extend(transactions.iter().cloned());
        }
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn bank(id: &str, source: &str) -> BankTransaction {
        BankTransaction::new(
            id.to_string(),
            BigDecimal::from(-5),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            String::new(),
            source.to_string(),
        )
    }

    #[tokio::test]
    async fn test_bank_sources_are_concatenated_in_order() {
        let source = MemorySource::new()
            .with_bank("a", vec![bank("A1", "a"), bank("A2", "a")])
            .with_bank("b", vec![bank("B1", "b")]);

        let all = source
            .bank_transactions(&["b".to_string(), "a".to_string()])
            .await
            .unwrap();
        let ids: Vec<&str> = all.iter().map(|t| t.unique_identifier.as_str()).collect();
        assert_eq!(ids, vec!["B1", "A1", "A2"]);
    }

    #[tokio::test]
    async fn test_unknown_source_fails_without_partial_result() {
        let source = MemorySource::new().with_bank("a", vec![bank("A1", "a")]);

        let result = source
            .bank_transactions(&["a".to_string(), "missing".to_string()])
            .await;
        assert!(matches!(result, Err(IngestError::Unreadable { ref origin, .. }) if origin == "missing"));
        assert!(source.system_transactions("system").await.is_err());
    }
}
