use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use reconciliation_core::utils::CsvTransactionSource;
use reconciliation_core::{Reconciler, ReconcilerConfig, DEFAULT_REFERENCE_PREFIX};

/// Reconcile system transactions against bank statements and print a JSON report.
#[derive(Parser, Debug)]
#[command(name = "reconciler", version)]
struct Args {
    /// Path to the system transactions CSV file
    #[arg(long)]
    system: String,

    /// Bank statement CSV files, comma separated or repeated
    #[arg(long, required = true, value_delimiter = ',')]
    bank: Vec<String>,

    /// First day of the reconciliation window (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,

    /// Last day of the reconciliation window, inclusive (YYYY-MM-DD)
    #[arg(long)]
    end: NaiveDate,

    /// Largest amount difference still treated as a clean match
    #[arg(long, default_value = "0.001")]
    tolerance: BigDecimal,

    /// Text that introduces a system identifier in bank descriptions
    #[arg(long, default_value = DEFAULT_REFERENCE_PREFIX)]
    reference_prefix: String,

    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = ReconcilerConfig {
        reference_prefix: args.reference_prefix,
        discrepancy_tolerance: args.tolerance,
    };
    let reconciler = Reconciler::with_config(CsvTransactionSource::new(), config);

    let report = reconciler
        .reconcile(&args.system, &args.bank, args.start, args.end)
        .await
        .context("Reconciliation failed")?;

    let json = serde_json::to_string_pretty(&report).context("Failed to render JSON report")?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            log::info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
