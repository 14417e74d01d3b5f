//! Paid and outstanding totals over a (filtered) payables collection.

use crate::PayableAccount;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PayableTotals {
    pub total_paid: f64,
    pub total_outstanding: f64,
    pub count: usize,
    pub paid_count: usize,
    pub pending_count: usize,
}

impl PayableTotals {
    /// Paid plus outstanding; equals the sum of `amount_with_tax` unless some
    /// record carries more partial payments than it owes
    pub fn grand_total(&self) -> f64 {
        self.total_paid + self.total_outstanding
    }
}

/// Single pass over the collection
pub fn compute_totals(items: &[PayableAccount]) -> PayableTotals {
    items.iter().fold(PayableTotals::default(), |mut totals, account| {
        totals.total_paid += account.paid_so_far().max(0.0);
        totals.total_outstanding += account.outstanding();
        totals.count += 1;
        if account.is_paid {
            totals.paid_count += 1;
        } else {
            totals.pending_count += 1;
        }
        totals
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::payable;

    #[test]
    fn test_empty_collection() {
        assert_eq!(compute_totals(&[]), PayableTotals::default());
    }

    #[test]
    fn test_totals_honor_partial_payments() {
        let items = vec![
            payable("a", "2025-06-01", 1000.0, false, 400.0),
            payable("b", "2025-06-02", 500.0, true, 0.0),
            payable("c", "2025-06-03", 250.0, false, 0.0),
        ];
        let totals = compute_totals(&items);
        assert_eq!(totals.total_paid, 900.0);
        assert_eq!(totals.total_outstanding, 850.0);
        assert_eq!(totals.count, 3);
        assert_eq!(totals.paid_count, 1);
        assert_eq!(totals.pending_count, 2);
        assert_eq!(totals.grand_total(), 1750.0);
    }

    #[test]
    fn test_outstanding_matches_per_record_rule() {
        let items = vec![
            payable("a", "2025-06-01", 1000.0, false, 400.0),
            payable("b", "2025-06-02", 300.0, false, 500.0),
            payable("c", "2025-06-03", 80.0, true, 10.0),
        ];
        let totals = compute_totals(&items);
        let expected: f64 = items
            .iter()
            .map(|a| (a.amount_with_tax - a.paid_so_far()).max(0.0))
            .sum();
        assert_eq!(totals.total_outstanding, expected);
        assert_eq!(totals.total_outstanding, 600.0);
    }

    #[test]
    fn test_negative_partial_payments_are_clamped() {
        let items = vec![payable("a", "2025-06-01", 100.0, false, -20.0)];
        let totals = compute_totals(&items);
        assert_eq!(totals.total_paid, 0.0);
        assert_eq!(totals.total_outstanding, 120.0);
    }
}
