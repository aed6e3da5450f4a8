//! Reconciliation of system transactions against bank statements
//!
//! The pipeline is: ingestion → date filter → matcher → discrepancy
//! evaluation → report assembly. Only ingestion can fail; every later stage is
//! total over well-formed records.

pub mod discrepancy;
pub mod filter;
pub mod matcher;
pub mod report;

pub use discrepancy::*;
pub use filter::*;
pub use matcher::*;
pub use report::*;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::traits::*;
use crate::types::*;

/// Tunables for a reconciliation run
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilerConfig {
    /// Text introducing a system identifier in bank descriptions
    pub reference_prefix: String,
    /// Largest absolute amount difference still considered a clean match
    pub discrepancy_tolerance: BigDecimal,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            reference_prefix: DEFAULT_REFERENCE_PREFIX.to_string(),
            discrepancy_tolerance: default_tolerance(),
        }
    }
}

/// Reconciliation engine over a transaction source
pub struct Reconciler<S: TransactionSource> {
    source: S,
    matcher: Matcher,
    evaluator: DiscrepancyEvaluator,
}

impl<S: TransactionSource> Reconciler<S> {
    /// Create a reconciler with the default configuration
    pub fn new(source: S) -> Self {
        Self::with_config(source, ReconcilerConfig::default())
    }

    /// Create a reconciler with a custom configuration
    pub fn with_config(source: S, config: ReconcilerConfig) -> Self {
        Self {
            source,
            matcher: Matcher::new(config.reference_prefix),
            evaluator: DiscrepancyEvaluator::new(config.discrepancy_tolerance),
        }
    }

    /// Load both sides from the source and reconcile them over `[start, end]`
    pub async fn reconcile(
        &self,
        system_source: &str,
        bank_sources: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> ReconciliationResult<ReconciliationReport> {
        let system = self
            .source
            .system_transactions(system_source)
            .await
            .map_err(ReconciliationError::SystemIngest)?;

        let bank = self
            .source
            .bank_transactions(bank_sources)
            .await
            .map_err(ReconciliationError::BankIngest)?;

        log::info!(
            "Loaded {} system and {} bank transactions from {} statement(s)",
            system.len(),
            bank.len(),
            bank_sources.len()
        );

        Ok(self.reconcile_transactions(&system, &bank, DateRange::new(start, end)))
    }

    /// Reconcile already loaded records over `period`
    pub fn reconcile_transactions(
        &self,
        system: &[SystemTransaction],
        bank: &[BankTransaction],
        period: DateRange,
    ) -> ReconciliationReport {
        if period.is_inverted() {
            log::warn!(
                "Reconciliation window starts {} after it ends {}; nothing will be processed",
                period.start,
                period.end
            );
        }

        let system = period.filter(system);
        let bank = period.filter(bank);

        let outcome = self.matcher.run(&system, &bank);
        let report = ReconciliationReport::assemble(
            period,
            system.len(),
            bank.len(),
            outcome,
            &self.evaluator,
        );

        log::info!(
            "Reconciled {} to {}: {} matched, {} discrepant, {} unmatched",
            period.start,
            period.end,
            report.matched_count(),
            report.discrepant_transactions.count,
            report.unmatched_count()
        );

        report
    }
}
