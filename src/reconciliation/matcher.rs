//! Multi-pass matching of system transactions against bank transactions
//!
//! Matching runs in sequence over the filtered records:
//!
//! 1. **Reference** - a bank description containing `trxID:<system id>` claims
//!    that system record. Bank records are scanned in order, system records in
//!    order for each of them, and the first qualifying pair wins.
//! 2. **Exact / Group** - the remaining records are grouped by
//!    `(day, kind, amount in cents)`. A key present on both sides matches only
//!    when both groups have the same size; records are then paired by position.
//!    Groups of unequal size stay unmatched in full.
//!
//! Once claimed a record never takes part in a later pass, so every record
//! ends up in exactly one pair or in one of the two residues.

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, RoundingMode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::*;

/// Prefix that introduces a system identifier inside a bank description
pub const DEFAULT_REFERENCE_PREFIX: &str = "trxID:";

/// Pass that produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPass {
    /// Bank description referenced the system identifier
    Reference,
    /// Single record on each side shared the grouping key
    Exact,
    /// Equal-size groups sharing the grouping key, paired by position
    Group,
}

/// One system transaction paired with one bank transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedPair {
    #[serde(rename = "system_transaction")]
    pub system: SystemTransaction,
    #[serde(rename = "bank_transaction")]
    pub bank: BankTransaction,
    pub pass: MatchPass,
}

/// Grouping key for the exact and group passes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub day: NaiveDate,
    pub kind: TransactionKind,
    pub cents: BigInt,
}

impl GroupKey {
    pub fn new(day: NaiveDate, kind: TransactionKind, amount: &BigDecimal) -> Self {
        Self {
            day,
            kind,
            cents: to_cents(amount),
        }
    }

    pub fn for_system(tx: &SystemTransaction) -> Self {
        Self::new(tx.date(), tx.kind, &tx.amount)
    }

    /// Bank records are keyed on their normalized amount, never the raw signed one
    pub fn for_bank(tx: &BankTransaction) -> Self {
        Self::new(tx.date, tx.kind(), tx.normalized_amount())
    }
}

/// Quantize an amount to whole cents, rounding half to even
pub fn to_cents(amount: &BigDecimal) -> BigInt {
    let (cents, _scale) = amount
        .with_scale_round(2, RoundingMode::HalfEven)
        .into_bigint_and_exponent();
    cents
}

/// Ownership markers for records already claimed by a pass, by position
#[derive(Debug, Clone)]
pub(crate) struct Claims {
    system: Vec<bool>,
    bank: Vec<bool>,
}

impl Claims {
    pub fn new(system_len: usize, bank_len: usize) -> Self {
        Self {
            system: vec![false; system_len],
            bank: vec![false; bank_len],
        }
    }

    pub fn claim(&mut self, system: usize, bank: usize) {
        debug_assert!(!self.system[system] && !self.bank[bank]);
        self.system[system] = true;
        self.bank[bank] = true;
    }

    pub fn is_system_claimed(&self, index: usize) -> bool {
        self.system[index]
    }

    pub fn is_bank_claimed(&self, index: usize) -> bool {
        self.bank[index]
    }

    #[cfg(test)]
    pub fn claimed_count(&self) -> usize {
        self.system.iter().filter(|claimed| **claimed).count()
    }
}

/// Positions of a matched pair within the filtered inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pairing {
    pub system: usize,
    pub bank: usize,
    pub pass: MatchPass,
}

/// Reference pass: first-match-wins scan, bank-outer and system-inner
pub(crate) fn match_by_reference(
    system: &[SystemTransaction],
    bank: &[BankTransaction],
    claims: &mut Claims,
    prefix: &str,
) -> Vec<Pairing> {
    let tokens: Vec<String> = system.iter().map(|tx| format!("{prefix}{}", tx.id)).collect();
    let mut pairings = Vec::new();

    for (bank_index, bank_tx) in bank.iter().enumerate() {
        if claims.is_bank_claimed(bank_index) {
            continue;
        }

        let found = tokens.iter().enumerate().position(|(system_index, token)| {
            !claims.is_system_claimed(system_index) && bank_tx.description.contains(token.as_str())
        });

        if let Some(system_index) = found {
            claims.claim(system_index, bank_index);
            pairings.push(Pairing {
                system: system_index,
                bank: bank_index,
                pass: MatchPass::Reference,
            });
        }
    }

    pairings
}

/// Exact and group passes over everything the reference pass left unclaimed
pub(crate) fn match_by_group(
    system: &[SystemTransaction],
    bank: &[BankTransaction],
    claims: &mut Claims,
) -> Vec<Pairing> {
    let mut system_groups: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
    for (index, tx) in system.iter().enumerate() {
        if !claims.is_system_claimed(index) {
            system_groups.entry(GroupKey::for_system(tx)).or_default().push(index);
        }
    }

    let mut bank_groups: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
    for (index, tx) in bank.iter().enumerate() {
        if !claims.is_bank_claimed(index) {
            bank_groups.entry(GroupKey::for_bank(tx)).or_default().push(index);
        }
    }

    let mut pairings = Vec::new();
    for (key, system_indices) in &system_groups {
        let Some(bank_indices) = bank_groups.get(key) else {
            continue;
        };

        if system_indices.len() != bank_indices.len() {
            log::debug!(
                "Leaving group {} {} {} unmatched: {} system vs {} bank records",
                key.day,
                key.kind,
                key.cents,
                system_indices.len(),
                bank_indices.len()
            );
            continue;
        }

        let pass = if system_indices.len() == 1 {
            MatchPass::Exact
        } else {
            MatchPass::Group
        };

        for (&system_index, &bank_index) in system_indices.iter().zip(bank_indices) {
            claims.claim(system_index, bank_index);
            pairings.push(Pairing {
                system: system_index,
                bank: bank_index,
                pass,
            });
        }
    }

    pairings
}

/// Partition of the filtered inputs produced by the matcher
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchOutcome {
    /// Accepted pairs, reference pass first, then by grouping key
    pub pairs: Vec<MatchedPair>,
    /// System records never claimed, in input order
    pub system_only: Vec<SystemTransaction>,
    /// Bank records never claimed, in input order
    pub bank_only: Vec<BankTransaction>,
}

/// Runs every matching pass in order
#[derive(Debug, Clone)]
pub struct Matcher {
    reference_prefix: String,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_PREFIX)
    }
}

impl Matcher {
    pub fn new(reference_prefix: impl Into<String>) -> Self {
        Self {
            reference_prefix: reference_prefix.into(),
        }
    }

    pub fn reference_prefix(&self) -> &str {
        &self.reference_prefix
    }

    /// Partition `system` and `bank` into pairs and unmatched residues
    pub fn run(&self, system: &[SystemTransaction], bank: &[BankTransaction]) -> MatchOutcome {
        let mut claims = Claims::new(system.len(), bank.len());

        let by_reference = match_by_reference(system, bank, &mut claims, &self.reference_prefix);
        log::debug!("Reference pass matched {} pairs", by_reference.len());

        let by_group = match_by_group(system, bank, &mut claims);
        log::debug!("Exact/group pass matched {} pairs", by_group.len());

        let pairs = by_reference
            .into_iter()
            .chain(by_group)
            .map(|pairing| MatchedPair {
                system: system[pairing.system].clone(),
                bank: bank[pairing.bank].clone(),
                pass: pairing.pass,
            })
            .collect();

        let system_only = system
            .iter()
            .enumerate()
            .filter(|(index, _)| !claims.is_system_claimed(*index))
            .map(|(_, tx)| tx.clone())
            .collect();

        let bank_only = bank
            .iter()
            .enumerate()
            .filter(|(index, _)| !claims.is_bank_claimed(*index))
            .map(|(_, tx)| tx.clone())
            .collect();

        MatchOutcome {
            pairs,
            system_only,
            bank_only,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn system(id: &str, kind: TransactionKind, amount: &str, d: u32) -> SystemTransaction {
        let time = DateTime::parse_from_rfc3339(&format!("2025-01-{d:02}T09:30:00Z")).unwrap();
        SystemTransaction::new(id.to_string(), dec(amount), kind, time)
    }

    fn bank(id: &str, amount: &str, d: u32, description: &str) -> BankTransaction {
        BankTransaction::new(
            id.to_string(),
            dec(amount),
            day(d),
            description.to_string(),
            "bank_a.csv".to_string(),
        )
    }

    fn pair_ids(outcome: &MatchOutcome) -> Vec<(String, String, MatchPass)> {
        outcome
            .pairs
            .iter()
            .map(|p| (p.system.id.clone(), p.bank.unique_identifier.clone(), p.pass))
            .collect()
    }

    #[test]
    fn test_reference_then_exact() {
        let system = vec![
            system("TRX001", TransactionKind::Debit, "100.00", 1),
            system("TRX002", TransactionKind::Credit, "250.50", 2),
        ];
        let bank = vec![
            bank("BANK001", "-100.00", 1, "Purchase trxID:TRX001"),
            bank("BANK002", "250.50", 2, "Deposit"),
        ];

        let outcome = Matcher::default().run(&system, &bank);

        assert_eq!(
            pair_ids(&outcome),
            vec![
                ("TRX001".to_string(), "BANK001".to_string(), MatchPass::Reference),
                ("TRX002".to_string(), "BANK002".to_string(), MatchPass::Exact),
            ]
        );
        assert!(outcome.system_only.is_empty());
        assert!(outcome.bank_only.is_empty());
    }

    #[test]
    fn test_reference_pass_takes_priority_over_key_match() {
        // BANK_A key-matches TRX1 but references TRX2; the reference wins and
        // TRX1 is left for BANK_B.
        let system = vec![
            system("TRX1", TransactionKind::Debit, "10.00", 1),
            system("TRX2", TransactionKind::Debit, "99.00", 1),
        ];
        let bank = vec![
            bank("BANK_A", "-10.00", 1, "trxID:TRX2"),
            bank("BANK_B", "-10.00", 1, "card"),
        ];

        let outcome = Matcher::default().run(&system, &bank);

        assert_eq!(
            pair_ids(&outcome),
            vec![
                ("TRX2".to_string(), "BANK_A".to_string(), MatchPass::Reference),
                ("TRX1".to_string(), "BANK_B".to_string(), MatchPass::Exact),
            ]
        );
    }

    #[test]
    fn test_first_bank_reference_wins() {
        let system = vec![system("TRX7", TransactionKind::Credit, "5.00", 3)];
        let bank = vec![
            bank("FIRST", "7.00", 4, "trxID:TRX7"),
            bank("SECOND", "5.00", 3, "trxID:TRX7"),
        ];

        let outcome = Matcher::default().run(&system, &bank);

        assert_eq!(
            pair_ids(&outcome),
            vec![("TRX7".to_string(), "FIRST".to_string(), MatchPass::Reference)]
        );
        assert_eq!(outcome.bank_only.len(), 1);
        assert_eq!(outcome.bank_only[0].unique_identifier, "SECOND");
    }

    #[test]
    fn test_reference_is_literal_substring() {
        let system = vec![
            system("TRX1", TransactionKind::Debit, "1.00", 1),
            system("TRX10", TransactionKind::Debit, "2.00", 1),
        ];
        let bank = vec![bank("B", "-2.00", 1, "ref trxID:TRX10")];

        let outcome = Matcher::default().run(&system, &bank);

        // "trxID:TRX1" is contained in "trxID:TRX10" and TRX1 comes first.
        assert_eq!(outcome.pairs[0].system.id, "TRX1");
        assert_eq!(outcome.pairs[0].pass, MatchPass::Reference);
    }

    #[test]
    fn test_unequal_groups_stay_unmatched() {
        let system = vec![
            system("S1", TransactionKind::Debit, "100.00", 1),
            system("S2", TransactionKind::Debit, "100.00", 1),
        ];
        let bank = vec![bank("B1", "-100.00", 1, "")];

        let outcome = Matcher::default().run(&system, &bank);

        assert!(outcome.pairs.is_empty());
        assert_eq!(outcome.system_only.len(), 2);
        assert_eq!(outcome.bank_only.len(), 1);
    }

    #[test]
    fn test_equal_groups_pair_by_position() {
        let system = vec![
            system("S1", TransactionKind::Debit, "100.00", 1),
            system("OTHER", TransactionKind::Credit, "3.00", 2),
            system("S2", TransactionKind::Debit, "100.00", 1),
        ];
        let bank = vec![
            bank("B1", "-100.00", 1, "atm"),
            bank("B2", "-100", 1, "atm"),
        ];

        let outcome = Matcher::default().run(&system, &bank);

        assert_eq!(
            pair_ids(&outcome),
            vec![
                ("S1".to_string(), "B1".to_string(), MatchPass::Group),
                ("S2".to_string(), "B2".to_string(), MatchPass::Group),
            ]
        );
        assert_eq!(outcome.system_only.len(), 1);
        assert_eq!(outcome.system_only[0].id, "OTHER");
    }

    #[test]
    fn test_kind_and_day_are_part_of_key() {
        let system = vec![
            system("DEBIT", TransactionKind::Debit, "20.00", 1),
            system("LATER", TransactionKind::Credit, "20.00", 2),
        ];
        let bank = vec![
            bank("CREDIT", "20.00", 1, ""),
            bank("EARLIER", "20.00", 1, ""),
        ];

        let outcome = Matcher::default().run(&system, &bank);

        assert!(outcome.pairs.is_empty());
    }

    #[test]
    fn test_amounts_are_compared_in_cents() {
        let system = vec![system("S1", TransactionKind::Credit, "10.004", 5)];
        let bank = vec![bank("B1", "10.00", 5, "")];

        let outcome = Matcher::default().run(&system, &bank);

        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].pass, MatchPass::Exact);
    }

    #[test]
    fn test_to_cents_rounds_half_to_even() {
        assert_eq!(to_cents(&dec("100")), BigInt::from(10000));
        assert_eq!(to_cents(&dec("0.125")), BigInt::from(12));
        assert_eq!(to_cents(&dec("0.135")), BigInt::from(14));
        assert_eq!(to_cents(&dec("99.999")), BigInt::from(10000));
    }

    #[test]
    fn test_duplicate_bank_identifiers_are_tracked_separately() {
        let system = vec![
            system("S1", TransactionKind::Debit, "1.00", 1),
            system("S2", TransactionKind::Credit, "2.00", 1),
        ];
        let mut second = bank("B1", "2.00", 1, "");
        second.bank_source = "bank_b.csv".to_string();
        let bank = vec![bank("B1", "-1.00", 1, "trxID:S1"), second];

        let outcome = Matcher::default().run(&system, &bank);

        assert_eq!(outcome.pairs.len(), 2);
        assert!(outcome.bank_only.is_empty());
    }

    #[test]
    fn test_custom_reference_prefix() {
        let system = vec![system("42", TransactionKind::Debit, "1.00", 1)];
        let bank = vec![bank("B", "-8.00", 9, "REF#42")];

        let outcome = Matcher::new("REF#").run(&system, &bank);

        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].pass, MatchPass::Reference);
    }

    #[test]
    fn test_every_record_lands_in_one_bucket() {
        let system = vec![
            system("A", TransactionKind::Debit, "1.00", 1),
            system("B", TransactionKind::Debit, "1.00", 1),
            system("C", TransactionKind::Credit, "7.10", 2),
            system("D", TransactionKind::Credit, "8.00", 3),
        ];
        let bank = vec![
            bank("1", "-1.00", 1, ""),
            bank("2", "7.10", 2, "trxID:D"),
            bank("3", "7.10", 2, ""),
            bank("4", "55.00", 4, ""),
        ];

        let matcher = Matcher::default();
        let outcome = matcher.run(&system, &bank);

        assert_eq!(outcome.pairs.len() + outcome.system_only.len(), system.len());
        assert_eq!(outcome.pairs.len() + outcome.bank_only.len(), bank.len());
        assert_eq!(outcome, matcher.run(&system, &bank));
    }

    #[test]
    fn test_one_sided_inputs_are_left_as_residue() {
        let system = vec![system("S1", TransactionKind::Debit, "4.00", 1)];
        let bank = vec![bank("B1", "-4.00", 1, "trxID:S1")];

        let only_system = Matcher::default().run(&system, &[]);
        assert!(only_system.pairs.is_empty());
        assert_eq!(only_system.system_only.len(), 1);

        let only_bank = Matcher::default().run(&[], &bank);
        assert!(only_bank.pairs.is_empty());
        assert_eq!(only_bank.bank_only.len(), 1);

        let neither = Matcher::default().run(&[], &[]);
        assert_eq!(neither, MatchOutcome::default());
    }

    #[test]
    fn test_passes_respect_existing_claims() {
        let system = vec![system("S1", TransactionKind::Debit, "4.00", 1)];
        let bank = vec![bank("B1", "-4.00", 1, "trxID:S1")];
        let mut claims = Claims::new(1, 1);

        let first = match_by_reference(&system, &bank, &mut claims, DEFAULT_REFERENCE_PREFIX);
        let second = match_by_group(&system, &bank, &mut claims);

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(claims.claimed_count(), 1);
    }
}
