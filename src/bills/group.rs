//! Folds a user's recurring bill payments into one summary per bill.

use std::collections::BTreeMap;

use time::Date;

use crate::Transaction;

/// One named recurring bill, summarised from its payment history.
///
/// Derived and ephemeral: recomputed from the transaction store on every
/// query, never persisted. The `name` is the bill's identity; grouping is a
/// case-sensitive exact match on the transaction name.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringBillGroup {
    /// The bill's name, e.g. "Netflix".
    pub name: String,
    /// The date of the most recent payment.
    pub last_payment: Date,
    /// The absolute amount of the most recent payment. Always non-negative.
    pub last_amount: f64,
    /// The mean absolute amount across all of the bill's payments. Always
    /// non-negative.
    pub avg_amount: f64,
}

struct GroupAccumulator {
    last_payment: Date,
    last_amount: f64,
    total: f64,
    count: u32,
}

/// Group recurring bill payments by name, summarising each bill's payment
/// history.
///
/// `payments` must already be filtered to recurring bill payments (see
/// [Transaction::is_recurring_bill_payment]); amounts are folded in as
/// absolute values. The most recent payment wins `last_payment` and
/// `last_amount`; payments sharing the maximum date tie-break in favour of
/// the earlier input position. The result is sorted by bill name so output
/// is deterministic, though callers are free to re-sort for presentation.
///
/// An empty input yields an empty list: a bill with no payment history does
/// not exist as a group.
pub fn group_recurring_bills(payments: &[Transaction]) -> Vec<RecurringBillGroup> {
    let mut accumulators: BTreeMap<&str, GroupAccumulator> = BTreeMap::new();

    for payment in payments {
        let amount = payment.amount.abs();
        let accumulator =
            accumulators
                .entry(payment.name.as_str())
                .or_insert_with(|| GroupAccumulator {
                    last_payment: payment.date,
                    last_amount: amount,
                    total: 0.0,
                    count: 0,
                });

        if payment.date > accumulator.last_payment {
            accumulator.last_payment = payment.date;
            accumulator.last_amount = amount;
        }

        accumulator.total += amount;
        accumulator.count += 1;
    }

    accumulators
        .into_iter()
        .map(|(name, accumulator)| RecurringBillGroup {
            name: name.to_owned(),
            last_payment: accumulator.last_payment,
            last_amount: accumulator.last_amount,
            avg_amount: accumulator.total / f64::from(accumulator.count),
        })
        .collect()
}
