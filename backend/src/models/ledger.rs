//! Balance ledger
//!
//! Single running cash balance for the machine. Every mutation is recorded
//! with its cause so a day's summary can be reconciled line by line.
//!
//! The ledger never refuses a debit: affordability is a policy decision
//! made by the caller (see `FundsPolicy`). A negative balance is left in
//! place and observed by the day cycle's bankruptcy checks.
//!
//! CRITICAL: All money values are i64 (cents)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the balance moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryCause {
    /// Daily operating fee
    Fee,
    /// Wholesale order, debited when placed
    Order,
    /// Customer purchases
    Sale,
}

impl fmt::Display for EntryCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntryCause::Fee => "fee",
            EntryCause::Order => "order",
            EntryCause::Sale => "sale",
        };
        f.write_str(name)
    }
}

/// One balance mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub day: u32,
    pub cause: EntryCause,
    /// Signed change: negative for debits, positive for credits
    pub amount: i64,
    pub balance_after: i64,
    /// Order id or product name
    pub reference: Option<String>,
}

/// Running balance plus its audit trail
///
/// # Example
/// ```
/// use vending_sim_core_rs::models::ledger::{BalanceLedger, EntryCause};
///
/// let mut ledger = BalanceLedger::new(50_000);
/// ledger.debit(1, EntryCause::Fee, 500, None);
/// ledger.credit(1, EntryCause::Sale, 3_500, Some("Soda".to_string()));
/// assert_eq!(ledger.balance(), 53_000);
/// assert_eq!(ledger.entries().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceLedger {
    opening_balance: i64,
    balance: i64,
    entries: Vec<LedgerEntry>,
}

impl BalanceLedger {
    pub fn new(opening_balance: i64) -> Self {
        Self {
            opening_balance,
            balance: opening_balance,
            entries: Vec::new(),
        }
    }

    /// Rebuild from a checkpoint; the caller validates the entries
    pub fn from_snapshot(opening_balance: i64, balance: i64, entries: Vec<LedgerEntry>) -> Self {
        Self {
            opening_balance,
            balance,
            entries,
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn opening_balance(&self) -> i64 {
        self.opening_balance
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// True if `amount` can be paid without going negative
    pub fn can_afford(&self, amount: i64) -> bool {
        amount <= self.balance
    }

    /// Subtract `amount` (must be non-negative); returns the new balance
    pub fn debit(
        &mut self,
        day: u32,
        cause: EntryCause,
        amount: i64,
        reference: Option<String>,
    ) -> i64 {
        debug_assert!(amount >= 0, "debit amount must be non-negative");
        self.record(day, cause, -amount, reference)
    }

    /// Add `amount` (must be non-negative); returns the new balance
    pub fn credit(
        &mut self,
        day: u32,
        cause: EntryCause,
        amount: i64,
        reference: Option<String>,
    ) -> i64 {
        debug_assert!(amount >= 0, "credit amount must be non-negative");
        self.record(day, cause, amount, reference)
    }

    fn record(&mut self, day: u32, cause: EntryCause, delta: i64, reference: Option<String>) -> i64 {
        self.balance += delta;
        self.entries.push(LedgerEntry {
            day,
            cause,
            amount: delta,
            balance_after: self.balance,
            reference,
        });
        self.balance
    }

    /// Net signed change for one cause across the run
    pub fn total_for(&self, cause: EntryCause) -> i64 {
        self.entries
            .iter()
            .filter(|e| e.cause == cause)
            .map(|e| e.amount)
            .sum()
    }

    /// Opening balance plus every entry; equals `balance()` unless tampered with
    pub fn reconciled_balance(&self) -> i64 {
        self.opening_balance + self.entries.iter().map(|e| e.amount).sum::<i64>()
    }
}
