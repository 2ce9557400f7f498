//! Canonical transaction model shared by every format adapter and the matcher.

use chrono::NaiveDate;
use log::debug;

use crate::types::*;

/// One transaction, normalized to a shared sign and date convention.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: Cents,
    pub payee: Option<String>,
    pub memo: Option<String>,
    pub reference: Option<String>,
    pub id: Option<TransactionId>,
}

/// Transactions from one side of a reconciliation, in source order, on or after the cutoff.
#[derive(Clone, Debug)]
pub struct TransactionSet {
    origin: Origin,
    label: String,
    transactions: Vec<Transaction>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MatchResult {
    pub unmatched_a: Vec<Transaction>,
    pub unmatched_b: Vec<Transaction>,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: Cents) -> Transaction {
        Transaction {
            date,
            amount,
            payee: None,
            memo: None,
            reference: None,
            id: None,
        }
    }

    pub fn with_payee<S: Into<String>>(mut self, payee: S) -> Transaction {
        self.payee = non_empty(payee.into());
        self
    }

    pub fn with_memo<S: Into<String>>(mut self, memo: S) -> Transaction {
        self.memo = non_empty(memo.into());
        self
    }

    pub fn with_reference<S: Into<String>>(mut self, reference: S) -> Transaction {
        self.reference = non_empty(reference.into());
        self
    }

    pub fn with_id(mut self, id: TransactionId) -> Transaction {
        self.id = Some(id);
        self
    }

    /// Same day, same amount. Payee and memo never take part.
    pub fn is_counterpart_of(&self, other: &Transaction) -> bool {
        self.date == other.date && self.amount == other.amount
    }
}

impl TransactionSet {
    /// Builds a set, keeping only transactions dated on or after `filter_date`.
    pub fn new<S: Into<String>>(
        origin: Origin,
        label: S,
        transactions: Vec<Transaction>,
        filter_date: NaiveDate,
    ) -> TransactionSet {
        let label = label.into();
        let total = transactions.len();
        let transactions: Vec<Transaction> = transactions
            .into_iter()
            .filter(|transaction| transaction.date >= filter_date)
            .collect();
        debug!(
            "{} ({}): kept {} of {} transactions on or after {}",
            label,
            origin,
            transactions.len(),
            total,
            filter_date
        );
        TransactionSet {
            origin,
            label,
            transactions,
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}

impl MatchResult {
    pub fn is_reconciled(&self) -> bool {
        self.unmatched_a.is_empty() && self.unmatched_b.is_empty()
    }

    pub fn unmatched(&self, origin: Origin) -> &[Transaction] {
        match origin {
            Origin::A => &self.unmatched_a,
            Origin::B => &self.unmatched_b,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}
