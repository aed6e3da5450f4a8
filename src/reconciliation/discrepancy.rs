//! Amount comparison for matched pairs

use bigdecimal::BigDecimal;
use serde::Serialize;

use super::matcher::MatchedPair;
use crate::types::*;

/// Absolute difference above which a matched pair is a discrepancy: `0.001`
pub fn default_tolerance() -> BigDecimal {
    BigDecimal::new(1.into(), 3)
}

/// Outcome of comparing the two amounts of a matched pair
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Amounts agree within tolerance
    Clean,
    /// Amounts diverge by `difference`
    Discrepant { difference: BigDecimal },
}

impl Verdict {
    pub fn is_discrepant(&self) -> bool {
        matches!(self, Verdict::Discrepant { .. })
    }
}

/// Compares the system amount with the bank's normalized amount
#[derive(Debug, Clone)]
pub struct DiscrepancyEvaluator {
    tolerance: BigDecimal,
}

impl Default for DiscrepancyEvaluator {
    fn default() -> Self {
        Self::new(default_tolerance())
    }
}

impl DiscrepancyEvaluator {
    pub fn new(tolerance: BigDecimal) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> &BigDecimal {
        &self.tolerance
    }

    pub fn evaluate(&self, pair: &MatchedPair) -> Verdict {
        let difference = (&pair.system.amount - pair.bank.normalized_amount()).abs();
        if difference > self.tolerance {
            Verdict::Discrepant { difference }
        } else {
            Verdict::Clean
        }
    }
}

/// A matched pair whose amounts diverge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscrepancyDetail {
    pub system_transaction: SystemTransaction,
    pub bank_transaction: BankTransaction,
}

/// Running discrepancy statistics for a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscrepantTransactions {
    pub count: usize,
    pub total_discrepancy_value: BigDecimal,
    pub details: Vec<DiscrepancyDetail>,
}

impl Default for DiscrepantTransactions {
    fn default() -> Self {
        Self {
            count: 0,
            total_discrepancy_value: BigDecimal::from(0),
            details: Vec::new(),
        }
    }
}

impl DiscrepantTransactions {
    /// Fold one evaluated pair into the statistics. Clean pairs leave no trace.
    pub fn record(&mut self, pair: &MatchedPair, verdict: &Verdict) {
        if let Verdict::Discrepant { difference } = verdict {
            self.count += 1;
            self.total_discrepancy_value += difference;
            self.details.push(DiscrepancyDetail {
                system_transaction: pair.system.clone(),
                bank_transaction: pair.bank.clone(),
            });
        }
    }
}
