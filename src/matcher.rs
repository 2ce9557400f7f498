//! Bidirectional same-day, same-amount matching of two transaction sets.

use log::debug;
use std::collections::HashSet;

use crate::transaction::*;

/// Computes which transactions of `a` have no counterpart in `b`, and vice versa.
///
/// Each direction is an independent greedy pass with its own consumed set, so
/// repeated amounts may pair differently in the two passes.
pub fn reconcile(a: &TransactionSet, b: &TransactionSet) -> MatchResult {
    MatchResult {
        unmatched_a: unmatched_in(a, b),
        unmatched_b: unmatched_in(b, a),
    }
}

/// Single-direction pass: transactions of `from` left without a counterpart in `against`.
///
/// Every transaction in `against` can be consumed at most once. Ties go to the
/// first unconsumed candidate in source order.
pub fn unmatched_in(from: &TransactionSet, against: &TransactionSet) -> Vec<Transaction> {
    let candidates = against.transactions();
    let mut consumed: HashSet<usize> = HashSet::with_capacity(candidates.len());
    let mut unmatched = Vec::new();
    for transaction in from.transactions() {
        let found = candidates
            .iter()
            .enumerate()
            .find(|(index, candidate)| {
                !consumed.contains(index) && transaction.is_counterpart_of(candidate)
            })
            .map(|(index, _)| index);
        match found {
            Some(index) => {
                debug!(
                    "{} {} @ {} matched {} #{} ({:?} / {:?})",
                    from.label(),
                    transaction.amount,
                    transaction.date,
                    against.label(),
                    index,
                    transaction.payee,
                    candidates[index].payee
                );
                consumed.insert(index);
            }
            None => {
                debug!(
                    "{} {} @ {} ({:?}) not found in {}",
                    from.label(),
                    transaction.amount,
                    transaction.date,
                    transaction.payee,
                    against.label()
                );
                unmatched.push(transaction.clone());
            }
        }
    }
    unmatched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(y: i32, m: u32, d: u32, amount: i64) -> Transaction {
        Transaction::new(date(y, m, d), Cents::new(amount))
    }

    fn set(origin: Origin, transactions: Vec<Transaction>) -> TransactionSet {
        TransactionSet::new(origin, origin.to_string(), transactions, date(2000, 1, 1))
    }

    #[test]
    fn test_duplicate_amounts_consume_one_counterpart_each() {
        let a = set(
            Origin::A,
            vec![
                tx(2024, 3, 1, -500).with_payee("first"),
                tx(2024, 3, 1, -500).with_payee("second"),
            ],
        );
        let b = set(Origin::B, vec![tx(2024, 3, 1, -500)]);
        let result = reconcile(&a, &b);
        assert_eq!(
            result.unmatched_a,
            vec![tx(2024, 3, 1, -500).with_payee("second")]
        );
        assert!(result.unmatched_b.is_empty());
    }

    #[test]
    fn test_no_cross_day_tolerance() {
        let a = set(Origin::A, vec![tx(2024, 3, 5, -1200)]);
        let b = set(Origin::B, vec![tx(2024, 3, 6, -1200)]);
        let result = reconcile(&a, &b);
        assert_eq!(result.unmatched_a, vec![tx(2024, 3, 5, -1200)]);
        assert_eq!(result.unmatched_b, vec![tx(2024, 3, 6, -1200)]);
    }

    #[test]
    fn test_identical_multisets_reconcile() {
        let transactions = vec![
            tx(2024, 3, 1, -500),
            tx(2024, 3, 1, -500),
            tx(2024, 3, 2, 25_000),
            tx(2024, 3, 3, -1),
        ];
        let mut shuffled = transactions.clone();
        shuffled.reverse();
        let result = reconcile(&set(Origin::A, transactions), &set(Origin::B, shuffled));
        assert!(result.is_reconciled());
    }

    #[test]
    fn test_empty_sides() {
        let b_transactions = vec![tx(2024, 3, 1, -500), tx(2024, 3, 2, 100)];
        let empty_a = reconcile(
            &set(Origin::A, vec![]),
            &set(Origin::B, b_transactions.clone()),
        );
        assert!(empty_a.unmatched_a.is_empty());
        assert_eq!(empty_a.unmatched_b, b_transactions);

        let empty_b = reconcile(
            &set(Origin::A, b_transactions.clone()),
            &set(Origin::B, vec![]),
        );
        assert_eq!(empty_b.unmatched_a, b_transactions);
        assert!(empty_b.unmatched_b.is_empty());

        let both = reconcile(&set(Origin::A, vec![]), &set(Origin::B, vec![]));
        assert!(both.is_reconciled());
    }

    #[test]
    fn test_sign_matters() {
        let a = set(Origin::A, vec![tx(2024, 3, 1, -500)]);
        let b = set(Origin::B, vec![tx(2024, 3, 1, 500)]);
        let result = reconcile(&a, &b);
        assert_eq!(result.unmatched_a.len(), 1);
        assert_eq!(result.unmatched_b.len(), 1);
    }

    #[test]
    fn test_unmatched_keeps_source_order() {
        let a = set(
            Origin::A,
            vec![
                tx(2024, 3, 4, -4),
                tx(2024, 3, 1, -1),
                tx(2024, 3, 3, -3),
                tx(2024, 3, 2, -2),
            ],
        );
        let b = set(Origin::B, vec![tx(2024, 3, 1, -1)]);
        let amounts: Vec<i64> = reconcile(&a, &b)
            .unmatched_a
            .iter()
            .map(|t| t.amount.to_i64())
            .collect();
        assert_eq!(amounts, vec![-4, -3, -2]);
    }

    #[test]
    fn test_first_unconsumed_candidate_wins() {
        let a = set(Origin::A, vec![tx(2024, 3, 1, -500).with_payee("a")]);
        let b = set(
            Origin::B,
            vec![
                tx(2024, 3, 1, -500).with_payee("b1"),
                tx(2024, 3, 1, -500).with_payee("b2"),
            ],
        );
        let result = reconcile(&a, &b);
        assert!(result.unmatched_a.is_empty());
        assert_eq!(
            result.unmatched_b,
            vec![tx(2024, 3, 1, -500).with_payee("b2")]
        );
    }

    #[test]
    fn test_unmatched_is_subset_without_duplicates() {
        let a_transactions = vec![
            tx(2024, 3, 1, -500),
            tx(2024, 3, 1, -500),
            tx(2024, 3, 1, -500),
            tx(2024, 3, 2, -700),
        ];
        let b_transactions = vec![
            tx(2024, 3, 1, -500),
            tx(2024, 3, 2, -700),
            tx(2024, 3, 2, -700),
            tx(2024, 3, 9, 10),
        ];
        let result = reconcile(
            &set(Origin::A, a_transactions.clone()),
            &set(Origin::B, b_transactions.clone()),
        );
        assert_eq!(result.unmatched_a, vec![tx(2024, 3, 1, -500); 2]);
        assert_eq!(
            result.unmatched_b,
            vec![tx(2024, 3, 2, -700), tx(2024, 3, 9, 10)]
        );
        assert!(result.unmatched_a.len() <= a_transactions.len());
        assert!(result
            .unmatched_b
            .iter()
            .all(|transaction| b_transactions.contains(transaction)));
    }

    #[test]
    fn test_single_pass_is_independent_of_other_direction() {
        let a = set(Origin::A, vec![tx(2024, 3, 1, -500), tx(2024, 3, 2, -1)]);
        let b = set(Origin::B, vec![tx(2024, 3, 1, -500)]);
        assert_eq!(unmatched_in(&a, &b), vec![tx(2024, 3, 2, -1)]);
        assert!(unmatched_in(&b, &a).is_empty());
    }
}
