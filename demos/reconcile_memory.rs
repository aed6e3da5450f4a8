//! Reconciling in-memory records example

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate};
use reconciliation_core::utils::MemorySource;
use reconciliation_core::{BankTransaction, Reconciler, SystemTransaction, TransactionKind};
use std::str::FromStr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Reconciliation Core - In-memory Example\n");

    let system = vec![
        SystemTransaction::new(
            "TRX001".to_string(),
            BigDecimal::from_str("100.00")?,
            TransactionKind::Debit,
            DateTime::parse_from_rfc3339("2025-01-02T09:15:00Z")?,
        ),
        SystemTransaction::new(
            "TRX002".to_string(),
            BigDecimal::from_str("250.50")?,
            TransactionKind::Credit,
            DateTime::parse_from_rfc3339("2025-01-03T14:00:00Z")?,
        ),
        SystemTransaction::new(
            "TRX003".to_string(),
            BigDecimal::from_str("100.00")?,
            TransactionKind::Debit,
            DateTime::parse_from_rfc3339("2025-01-04T08:30:00Z")?,
        ),
    ];

    let bank_a = vec![
        BankTransaction::new(
            "BANK001".to_string(),
            BigDecimal::from_str("-100.00")?,
            NaiveDate::from_ymd_opt(2025, 1, 2).ok_or("invalid date")?,
            "Purchase trxID:TRX001".to_string(),
            "bank_a.csv".to_string(),
        ),
        BankTransaction::new(
            "BANK002".to_string(),
            BigDecimal::from_str("250.50")?,
            NaiveDate::from_ymd_opt(2025, 1, 3).ok_or("invalid date")?,
            "Deposit".to_string(),
            "bank_a.csv".to_string(),
        ),
    ];
    let bank_b = vec![
        BankTransaction::new(
            "BANK001".to_string(),
            BigDecimal::from_str("-99.95")?,
            NaiveDate::from_ymd_opt(2025, 1, 4).ok_or("invalid date")?,
            "Transfer trxID:TRX003".to_string(),
            "bank_b.csv".to_string(),
        ),
        BankTransaction::new(
            "BANK009".to_string(),
            BigDecimal::from_str("-12.00")?,
            NaiveDate::from_ymd_opt(2025, 1, 5).ok_or("invalid date")?,
            "Monthly fee".to_string(),
            "bank_b.csv".to_string(),
        ),
    ];

    let source = MemorySource::new()
        .with_system("system", system)
        .with_bank("bank_a", bank_a)
        .with_bank("bank_b", bank_b);
    let reconciler = Reconciler::new(source);

    let report = reconciler
        .reconcile(
            "system",
            &["bank_a".to_string(), "bank_b".to_string()],
            NaiveDate::from_ymd_opt(2025, 1, 1).ok_or("invalid date")?,
            NaiveDate::from_ymd_opt(2025, 1, 31).ok_or("invalid date")?,
        )
        .await?;

    for pair in &report.matched_pairs {
        println!(
            "  ✓ {} ↔ {} ({:?})",
            pair.system.id, pair.bank.unique_identifier, pair.pass
        );
    }
    println!(
        "\nMatched: {}, discrepant: {} (total {}), unmatched: {}",
        report.matched_count(),
        report.discrepant_transactions.count,
        report.discrepant_transactions.total_discrepancy_value,
        report.unmatched_count()
    );

    println!("\n{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
