//! Core types and data structures for the reconciliation system

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a transaction as seen from the organization's books
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    /// Money leaving the account
    Debit,
    /// Money entering the account
    Credit,
}

impl TransactionKind {
    /// Infer the kind from a bank's signed amount.
    /// Negative amounts are debits, everything else (zero included) is a credit.
    pub fn from_signed_amount(amount: &BigDecimal) -> Self {
        if *amount < BigDecimal::from(0) {
            TransactionKind::Debit
        } else {
            TransactionKind::Credit
        }
    }

    /// Parse the textual form used in system exports (`DEBIT` / `CREDIT`)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DEBIT" => Some(TransactionKind::Debit),
            "CREDIT" => Some(TransactionKind::Credit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Debit => "DEBIT",
            TransactionKind::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction recorded by the internal system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemTransaction {
    /// Identifier, unique within the system export
    #[serde(rename = "trxID")]
    pub id: String,
    /// Signed amount as booked internally
    pub amount: BigDecimal,
    /// Debit or credit
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// When the transaction happened, possibly with sub-day precision
    #[serde(rename = "transactionTime")]
    pub transaction_time: DateTime<FixedOffset>,
}

impl SystemTransaction {
    /// Create a new system transaction
    pub fn new(
        id: String,
        amount: BigDecimal,
        kind: TransactionKind,
        transaction_time: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id,
            amount,
            kind,
            transaction_time,
        }
    }

    /// Calendar day of the transaction in its own offset
    pub fn date(&self) -> NaiveDate {
        self.transaction_time.date_naive()
    }
}

/// A transaction reported on a bank statement
///
/// The normalized amount and the kind are derived from the raw amount when the
/// record is built and cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankTransaction {
    /// Identifier, unique only within its statement file
    pub unique_identifier: String,
    /// Signed amount exactly as the bank reported it
    pub amount: BigDecimal,
    /// Booking day
    pub date: NaiveDate,
    /// Free-text description, may carry a `trxID:` reference
    pub description: String,
    /// Statement file the record was read from
    pub bank_source: String,
    /// Derived `|amount|`, included in the JSON output for inspection
    normalized_amount: BigDecimal,
    /// Derived from the sign of `amount`, serialized as `type`
    #[serde(rename = "type")]
    kind: TransactionKind,
}

impl BankTransaction {
    /// Create a new bank transaction, deriving its normalized amount and kind
    pub fn new(
        unique_identifier: String,
        amount: BigDecimal,
        date: NaiveDate,
        description: String,
        bank_source: String,
    ) -> Self {
        let kind = TransactionKind::from_signed_amount(&amount);
        let normalized_amount = amount.abs();
        Self {
            unique_identifier,
            amount,
            date,
            description,
            bank_source,
            normalized_amount,
            kind,
        }
    }

    /// Unsigned magnitude of the reported amount
    pub fn normalized_amount(&self) -> &BigDecimal {
        &self.normalized_amount
    }

    /// Kind inferred from the sign of the reported amount
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }
}

/// Errors raised while loading transactions from a source
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Failed to read {origin}: {message}")]
    Unreadable { origin: String, message: String },
    #[error("{origin} line {line}: expected at least {expected} columns, found {found}")]
    MissingColumn {
        origin: String,
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("{origin} line {line}: could not parse amount '{value}'")]
    MalformedAmount {
        origin: String,
        line: u64,
        value: String,
    },
    #[error("{origin} line {line}: could not parse date '{value}'")]
    MalformedDate {
        origin: String,
        line: u64,
        value: String,
    },
    #[error("{origin} line {line}: unknown transaction type '{value}'")]
    MalformedKind {
        origin: String,
        line: u64,
        value: String,
    },
    #[error("{origin} line {line}: transaction identifier is empty")]
    EmptyIdentifier { origin: String, line: u64 },
}

/// Errors that abort a reconciliation run
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    #[error("Could not get system transactions")]
    SystemIngest(#[source] IngestError),
    #[error("Could not get bank transactions")]
    BankIngest(#[source] IngestError),
}

/// Result type for ingestion
pub type IngestResult<T> = Result<T, IngestError>;

/// Result type for reconciliation runs
pub type ReconciliationResult<T> = Result<T, ReconciliationError>;
