//! # Reconciliation Core
//!
//! Reconciles an internal system transaction list against one or more bank
//! statements and classifies every record as matched (clean or discrepant),
//! system-only, or bank-only.
//!
//! ## Features
//!
//! - **Date window**: both sides are narrowed to an inclusive calendar-day range
//! - **Reference matching**: bank descriptions carrying `trxID:<id>` claim their system record
//! - **Grouped matching**: remaining records pair up by day, kind and amount in cents
//! - **Discrepancies**: matched pairs whose amounts differ by more than `0.001`
//! - **Ingestion abstraction**: CSV files or any other `TransactionSource`
//!
//! ## Quick Start
//!
//! ```rust
//! use reconciliation_core::{DateRange, Reconciler, utils::MemorySource};
//! use chrono::NaiveDate;
//!
//! let reconciler = Reconciler::new(MemorySource::new());
//! let period = DateRange::new(
//!     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
//! );
//! let report = reconciler.reconcile_transactions(&[], &[], period);
//! assert_eq!(report.matched_count(), 0);
//! ```

pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
