//! Implements a SQLite backed bill transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Category, DatabaseID, Error, NewTransaction, Transaction, UserID, parse_iso_date,
    stores::BillTransactionStore,
};

/// Stores transactions in a SQLite database.
///
/// Dates are persisted as ISO-8601 text so `ORDER BY date` is chronological;
/// they are parsed back on every read, and a row with an unparseable date
/// fails the whole read with [Error::InvalidDate] rather than being dropped.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Record a new transaction.
    ///
    /// The bills engine never writes; this exists for the surrounding
    /// application and for seeding test data.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an unexpected SQL error.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the
    /// same thread.
    pub fn create(&self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let NewTransaction {
            user_id,
            name,
            category,
            amount,
            date,
            recurring,
            avatar,
        } = new_transaction;

        let connection = self.connection.lock().unwrap();
        let id = connection
            .prepare(
                "INSERT INTO \"transaction\" (user_id, name, category, amount, date, recurring, avatar)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING id",
            )?
            .query_row(
                (
                    user_id.as_i64(),
                    &name,
                    category.as_slug(),
                    amount,
                    date.to_string(),
                    recurring,
                    &avatar,
                ),
                |row| row.get::<_, DatabaseID>(0),
            )?;

        Ok(Transaction {
            id,
            user_id,
            name,
            category,
            amount,
            date,
            recurring,
            avatar,
        })
    }

    fn query_bill_transactions(
        &self,
        sql: &str,
        user_id: UserID,
    ) -> Result<Vec<Transaction>, Error> {
        let connection = self.connection.lock().unwrap();
        let mut statement = connection.prepare(sql)?;

        let user_id = user_id.as_i64();
        let rows = statement.query_map(&[(":user_id", &user_id)], |row| {
            Ok((
                row.get::<_, DatabaseID>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, bool>(6)?,
                row.get::<_, Option<String>>(7)?,
            ))
        })?;

        let mut transactions = Vec::new();
        for row in rows {
            let (id, user_id, name, category, amount, date, recurring, avatar) = row?;
            transactions.push(Transaction {
                id,
                user_id: UserID::new(user_id),
                name,
                category: Category::from_slug(&category)?,
                amount,
                date: parse_iso_date(&date)?,
                recurring,
                avatar,
            });
        }

        Ok(transactions)
    }
}

impl BillTransactionStore for SQLiteTransactionStore {
    /// Every bills-category transaction for `user_id`, newest first.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidDate] if a stored date cannot be parsed,
    /// - [Error::InvalidCategory] if a stored category slug is unknown,
    /// - or [Error::SqlError] if there is some other SQL error.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the
    /// same thread.
    fn bill_transactions(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        self.query_bill_transactions(
            "SELECT id, user_id, name, category, amount, date, recurring, avatar
             FROM \"transaction\"
             WHERE user_id = :user_id AND category = 'bills'
             ORDER BY date DESC",
            user_id,
        )
    }

    /// The recurring bill payments for `user_id`, newest first.
    ///
    /// Overrides the trait's default so the bill-payment predicate runs in
    /// the query instead of over a broader result set.
    ///
    /// # Errors
    /// Same failure modes as
    /// [bill_transactions](SQLiteTransactionStore::bill_transactions).
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the
    /// same thread.
    fn recurring_bill_transactions(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        self.query_bill_transactions(
            "SELECT id, user_id, name, category, amount, date, recurring, avatar
             FROM \"transaction\"
             WHERE user_id = :user_id AND category = 'bills'
                   AND recurring = 1 AND amount < 0
             ORDER BY date DESC",
            user_id,
        )
    }
}

#[cfg(test)]
mod sqlite_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Category, Error, NewTransaction, UserID, db::initialize, stores::BillTransactionStore,
    };

    use super::SQLiteTransactionStore;

    fn get_test_store() -> SQLiteTransactionStore {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        SQLiteTransactionStore::new(Arc::new(Mutex::new(conn)))
    }

    fn new_transaction(user_id: i64, name: &str) -> NewTransaction {
        NewTransaction {
            user_id: UserID::new(user_id),
            name: name.to_owned(),
            category: Category::Bills,
            amount: -15.99,
            date: date!(2025 - 07 - 05),
            recurring: true,
            avatar: None,
        }
    }

    #[test]
    fn create_returns_stored_transaction() {
        let store = get_test_store();

        let transaction = store
            .create(new_transaction(1, "Netflix"))
            .expect("Could not create transaction");

        assert_eq!(transaction.name, "Netflix");
        assert_eq!(transaction.amount, -15.99);
        assert_eq!(transaction.date, date!(2025 - 07 - 05));
        assert!(transaction.recurring);
    }

    #[test]
    fn bill_transactions_scopes_to_user() {
        let store = get_test_store();
        store.create(new_transaction(1, "Netflix")).unwrap();
        store.create(new_transaction(2, "Spotify")).unwrap();

        let got = store
            .bill_transactions(UserID::new(1))
            .expect("Could not query transactions");

        assert_eq!(got.len(), 1, "want 1 transaction, got {}", got.len());
        assert_eq!(got[0].name, "Netflix");
    }

    #[test]
    fn bill_transactions_excludes_other_categories() {
        let store = get_test_store();
        store.create(new_transaction(1, "Netflix")).unwrap();
        store
            .create(NewTransaction {
                category: Category::Groceries,
                ..new_transaction(1, "Supermarket")
            })
            .unwrap();

        let got = store.bill_transactions(UserID::new(1)).unwrap();

        assert_eq!(got.len(), 1, "want 1 transaction, got {}", got.len());
        assert_eq!(got[0].category, Category::Bills);
    }

    #[test]
    fn bill_transactions_includes_non_recurring_bills() {
        let store = get_test_store();
        store.create(new_transaction(1, "Netflix")).unwrap();
        store
            .create(NewTransaction {
                recurring: false,
                ..new_transaction(1, "One-off electrician")
            })
            .unwrap();

        let got = store.bill_transactions(UserID::new(1)).unwrap();

        assert_eq!(got.len(), 2, "want 2 transactions, got {}", got.len());
    }

    #[test]
    fn bill_transactions_sorted_newest_first() {
        let store = get_test_store();
        for (day, name) in [(5, "Netflix"), (20, "Power"), (12, "Internet")] {
            store
                .create(NewTransaction {
                    date: date!(2025 - 07 - 01).replace_day(day).unwrap(),
                    ..new_transaction(1, name)
                })
                .unwrap();
        }

        let got = store.bill_transactions(UserID::new(1)).unwrap();

        let names: Vec<&str> = got.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Power", "Internet", "Netflix"]);
    }

    #[test]
    fn recurring_bill_transactions_applies_payment_predicate() {
        let store = get_test_store();
        store.create(new_transaction(1, "Netflix")).unwrap();
        store
            .create(NewTransaction {
                recurring: false,
                ..new_transaction(1, "One-off electrician")
            })
            .unwrap();
        store
            .create(NewTransaction {
                amount: 23.50,
                ..new_transaction(1, "Power refund")
            })
            .unwrap();

        let got = store.recurring_bill_transactions(UserID::new(1)).unwrap();

        assert_eq!(got.len(), 1, "want 1 payment, got {}", got.len());
        assert_eq!(got[0].name, "Netflix");
    }

    #[test]
    fn unparseable_date_fails_the_read() {
        let store = get_test_store();
        store.create(new_transaction(1, "Netflix")).unwrap();
        {
            let connection = store.connection.lock().unwrap();
            connection
                .execute(
                    "UPDATE \"transaction\" SET date = 'not-a-date'",
                    (),
                )
                .unwrap();
        }

        let result = store.bill_transactions(UserID::new(1));

        assert!(
            matches!(result, Err(Error::InvalidDate(ref text, _)) if text == "not-a-date"),
            "want InvalidDate for corrupt row, got {result:?}"
        );
    }

    #[test]
    fn corrupted_category_is_invisible_to_bill_queries() {
        let store = get_test_store();
        store.create(new_transaction(1, "Netflix")).unwrap();
        {
            let connection = store.connection.lock().unwrap();
            connection
                .execute("UPDATE \"transaction\" SET category = 'bills '", ())
                .unwrap();
        }

        let result = store.bill_transactions(UserID::new(1));

        // The query matches on exact slug text, so the corrupted row is
        // invisible rather than invalid.
        assert_eq!(result, Ok(Vec::new()));
    }
}
