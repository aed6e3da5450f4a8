//! CSV file transaction source
//!
//! System exports carry the columns `trxID, amount, type, transactionTime`;
//! bank statements carry `unique_identifier, amount, date, description`.
//! Columns are positional and the first row is always treated as a header.

use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;

use crate::traits::*;
use crate::types::*;
use crate::utils::validation::RecordContext;

const SYSTEM_COLUMNS: usize = 4;
const BANK_COLUMNS: usize = 4;

/// Transaction source reading CSV files from the local filesystem
#[derive(Debug, Clone, Default)]
pub struct CsvTransactionSource;

impl CsvTransactionSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TransactionSource for CsvTransactionSource {
    async fn system_transactions(&self, source: &str) -> IngestResult<Vec<SystemTransaction>> {
        let reader = open(source)?;
        let transactions = read_system_records(reader, source)?;
        log::debug!("Loaded {} system transactions from {}", transactions.len(), source);
        Ok(transactions)
    }

    async fn bank_transactions(&self, sources: &[String]) -> IngestResult<Vec<BankTransaction>> {
        let mut all = Vec::new();
        for source in sources {
            let reader = open(source)?;
            let transactions = read_bank_records(reader, source, &source_tag(source))?;
            log::debug!("Loaded {} bank transactions from {}", transactions.len(), source);
            all.extend(transactions);
        }
        Ok(all)
    }
}

fn open(path: &str) -> IngestResult<csv::Reader<std::fs::File>> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|err| unreadable(path, &err))
}

fn unreadable(origin: &str, err: &csv::Error) -> IngestError {
    IngestError::Unreadable {
        origin: origin.to_string(),
        message: err.to_string(),
    }
}

/// Tag identifying a statement file in the report: its base name
pub fn source_tag(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Reject sources without a header row, such as an empty or truncated file
fn require_header<R: Read>(reader: &mut csv::Reader<R>, origin: &str) -> IngestResult<()> {
    let header = reader
        .byte_headers()
        .map_err(|err| unreadable(origin, &err))?;
    if header.is_empty() {
        return Err(IngestError::Unreadable {
            origin: origin.to_string(),
            message: "missing header row".to_string(),
        });
    }
    Ok(())
}

fn context<'a>(origin: &'a str, record: &StringRecord, fallback_line: u64) -> RecordContext<'a> {
    let line = record
        .position()
        .map(|position| position.line())
        .unwrap_or(fallback_line);
    RecordContext::new(origin, line)
}

fn require_columns(ctx: &RecordContext<'_>, record: &StringRecord, expected: usize) -> IngestResult<()> {
    if record.len() < expected {
        return Err(IngestError::MissingColumn {
            origin: ctx.origin.to_string(),
            line: ctx.line,
            expected,
            found: record.len(),
        });
    }
    Ok(())
}

/// Parse system transactions from an already opened CSV reader
pub fn read_system_records<R: Read>(
    mut reader: csv::Reader<R>,
    origin: &str,
) -> IngestResult<Vec<SystemTransaction>> {
    require_header(&mut reader, origin)?;
    let mut transactions = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|err| unreadable(origin, &err))?;
        let ctx = context(origin, &record, index as u64 + 2);
        require_columns(&ctx, &record, SYSTEM_COLUMNS)?;

        transactions.push(SystemTransaction::new(
            ctx.identifier(&record[0])?,
            ctx.amount(&record[1])?,
            ctx.kind(&record[2])?,
            ctx.timestamp(&record[3])?,
        ));
    }

    Ok(transactions)
}

/// Parse bank transactions from an already opened CSV reader, tagging each with `tag`
pub fn read_bank_records<R: Read>(
    mut reader: csv::Reader<R>,
    origin: &str,
    tag: &str,
) -> IngestResult<Vec<BankTransaction>> {
    require_header(&mut reader, origin)?;
    let mut transactions = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|err| unreadable(origin, &err))?;
        let ctx = context(origin, &record, index as u64 + 2);
        require_columns(&ctx, &record, BANK_COLUMNS)?;

        transactions.push(BankTransaction::new(
            ctx.identifier(&record[0])?,
            ctx.amount(&record[1])?,
            ctx.date(&record[2])?,
            record[3].to_string(),
            tag.to_string(),
        ));
    }

    Ok(transactions)
}
