//! Inclusive calendar-day window applied to both sides before matching

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Records that fall on a calendar day
pub trait Dated {
    fn calendar_day(&self) -> NaiveDate;
}

impl Dated for SystemTransaction {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

impl Dated for BankTransaction {
    fn calendar_day(&self) -> NaiveDate {
        self.date
    }
}

/// Inclusive `[start, end]` window of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// True when no day can satisfy the window
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Whether `day` falls inside the window. Both bounds are included in full.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Keep the records dated inside the window, preserving their order
    pub fn filter<T: Dated + Clone>(&self, records: &[T]) -> Vec<T> {
        records
            .iter()
            .filter(|record| self.contains(record.calendar_day()))
            .cloned()
            .collect()
    }
}
