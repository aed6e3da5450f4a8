//! Report structures produced by a reconciliation run

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::discrepancy::{DiscrepancyEvaluator, DiscrepantTransactions};
use super::filter::DateRange;
use super::matcher::{MatchOutcome, MatchedPair};
use crate::types::*;

/// High-level statistics for the reconciled period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub timeframe_start: NaiveDate,
    pub timeframe_end: NaiveDate,
    /// System records inside the window
    pub total_system_transactions_processed: usize,
    /// Bank records inside the window, across every statement
    pub total_bank_transactions_processed: usize,
    /// Accepted pairs from every pass, discrepant ones included
    pub matched_transactions: usize,
}

/// Records that found no counterpart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmatchedTransactions {
    pub count: usize,
    pub system_missing_from_bank: Vec<SystemTransaction>,
    /// Bank-only records bucketed by statement file
    pub bank_missing_from_system: BTreeMap<String, Vec<BankTransaction>>,
}

impl UnmatchedTransactions {
    pub fn new(system_only: Vec<SystemTransaction>, bank_only: Vec<BankTransaction>) -> Self {
        let count = system_only.len() + bank_only.len();

        let mut by_source: BTreeMap<String, Vec<BankTransaction>> = BTreeMap::new();
        for tx in bank_only {
            by_source.entry(tx.bank_source.clone()).or_default().push(tx);
        }

        Self {
            count,
            system_missing_from_bank: system_only,
            bank_missing_from_system: by_source,
        }
    }

    pub fn bank_count(&self) -> usize {
        self.bank_missing_from_system.values().map(Vec::len).sum()
    }
}

/// Complete outcome of a reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationReport {
    pub reconciliation_summary: Summary,
    pub discrepant_transactions: DiscrepantTransactions,
    pub unmatched_transactions: UnmatchedTransactions,
    pub matched_pairs: Vec<MatchedPair>,
}

impl ReconciliationReport {
    /// Fold a matcher outcome into a report, evaluating every pair for discrepancies
    pub fn assemble(
        period: DateRange,
        system_processed: usize,
        bank_processed: usize,
        outcome: MatchOutcome,
        evaluator: &DiscrepancyEvaluator,
    ) -> Self {
        let mut discrepancies = DiscrepantTransactions::default();
        for pair in &outcome.pairs {
            let verdict = evaluator.evaluate(pair);
            discrepancies.record(pair, &verdict);
        }

        Self {
            reconciliation_summary: Summary {
                timeframe_start: period.start,
                timeframe_end: period.end,
                total_system_transactions_processed: system_processed,
                total_bank_transactions_processed: bank_processed,
                matched_transactions: outcome.pairs.len(),
            },
            discrepant_transactions: discrepancies,
            unmatched_transactions: UnmatchedTransactions::new(
                outcome.system_only,
                outcome.bank_only,
            ),
            matched_pairs: outcome.pairs,
        }
    }

    pub fn matched_count(&self) -> usize {
        self.reconciliation_summary.matched_transactions
    }

    pub fn unmatched_count(&self) -> usize {
        self.unmatched_transactions.count
    }

    /// True when every record matched and no pair diverges
    pub fn is_fully_reconciled(&self) -> bool {
        self.unmatched_count() == 0 && self.discrepant_transactions.count == 0
    }
}
