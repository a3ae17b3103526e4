//! Defines the bill transaction store trait.

use crate::{Error, Transaction, UserID};

/// Read-only access to one user's bill transactions.
///
/// Implementations must scope every query to the given user; the engine
/// treats the returned rows as that user's complete bills history at the
/// time of the call.
pub trait BillTransactionStore {
    /// Every bills-category transaction for `user_id`, newest first,
    /// recurring or not.
    fn bill_transactions(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;

    /// The subset of bills-category transactions that are recurring
    /// payments (outflows), newest first.
    ///
    /// The default implementation filters [bill_transactions]
    /// (BillTransactionStore::bill_transactions) with
    /// [Transaction::is_recurring_bill_payment]. Implementations may
    /// override this to push the predicate into their query instead; either
    /// way the predicate runs exactly once per computation.
    fn recurring_bill_transactions(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        Ok(self
            .bill_transactions(user_id)?
            .into_iter()
            .filter(Transaction::is_recurring_bill_payment)
            .collect())
    }
}

#[cfg(test)]
mod default_filter_tests {
    use time::macros::date;

    use super::BillTransactionStore;
    use crate::{Category, Error, Transaction, UserID};

    /// A store that returns a fixed list, relying on the trait's default
    /// recurring filter.
    struct FixedStore(Vec<Transaction>);

    impl BillTransactionStore for FixedStore {
        fn bill_transactions(&self, _user_id: UserID) -> Result<Vec<Transaction>, Error> {
            Ok(self.0.clone())
        }
    }

    fn transaction(id: i64, name: &str, amount: f64, recurring: bool) -> Transaction {
        Transaction {
            id,
            user_id: UserID::new(1),
            name: name.to_owned(),
            category: Category::Bills,
            amount,
            date: date!(2025 - 07 - 05),
            recurring,
            avatar: None,
        }
    }

    #[test]
    fn default_filter_keeps_only_recurring_outflows() {
        let store = FixedStore(vec![
            transaction(1, "Netflix", -15.99, true),
            transaction(2, "One-off electrician", -120.0, false),
            transaction(3, "Power refund", 23.50, true),
        ]);

        let got = store
            .recurring_bill_transactions(UserID::new(1))
            .expect("Could not filter transactions");

        assert_eq!(got.len(), 1, "want 1 payment, got {}", got.len());
        assert_eq!(got[0].name, "Netflix");
    }

    #[test]
    fn default_filter_preserves_input_order() {
        let store = FixedStore(vec![
            transaction(1, "Power", -80.0, true),
            transaction(2, "Netflix", -15.99, true),
        ]);

        let got = store
            .recurring_bill_transactions(UserID::new(1))
            .expect("Could not filter transactions");

        let names: Vec<&str> = got.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Power", "Netflix"]);
    }
}
