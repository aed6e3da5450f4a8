//! Field parsing and validation for ingested records

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate};
use std::str::FromStr;

use crate::types::*;

/// Date format used by bank statements
pub const BANK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Location of a record being parsed, attached to every error it produces
#[derive(Debug, Clone, Copy)]
pub struct RecordContext<'a> {
    pub origin: &'a str,
    pub line: u64,
}

impl<'a> RecordContext<'a> {
    pub fn new(origin: &'a str, line: u64) -> Self {
        Self { origin, line }
    }

    /// Validate that a transaction identifier is present
    pub fn identifier(&self, value: &str) -> IngestResult<String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(IngestError::EmptyIdentifier {
                origin: self.origin.to_string(),
                line: self.line,
            });
        }
        Ok(value.to_string())
    }

    /// Parse a signed decimal amount
    pub fn amount(&self, value: &str) -> IngestResult<BigDecimal> {
        BigDecimal::from_str(value.trim()).map_err(|_| IngestError::MalformedAmount {
            origin: self.origin.to_string(),
            line: self.line,
            value: value.to_string(),
        })
    }

    /// Parse a `DEBIT` / `CREDIT` marker
    pub fn kind(&self, value: &str) -> IngestResult<TransactionKind> {
        TransactionKind::parse(value).ok_or_else(|| IngestError::MalformedKind {
            origin: self.origin.to_string(),
            line: self.line,
            value: value.to_string(),
        })
    }

    /// Parse an RFC 3339 timestamp
    pub fn timestamp(&self, value: &str) -> IngestResult<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(value.trim()).map_err(|_| self.malformed_date(value))
    }

    /// Parse a `YYYY-MM-DD` calendar day
    pub fn date(&self, value: &str) -> IngestResult<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), BANK_DATE_FORMAT)
            .map_err(|_| self.malformed_date(value))
    }

    fn malformed_date(&self, value: &str) -> IngestError {
        IngestError::MalformedDate {
            origin: self.origin.to_string(),
            line: self.line,
            value: value.to_string(),
        }
    }
}
