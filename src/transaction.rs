//! The transaction model the bills engine reads.
//!
//! Transactions are the only input the engine consumes. They are read-only
//! here: creating and editing transactions is the job of the surrounding
//! application, the engine only classifies what it finds.

use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, UtcOffset,
    format_description::well_known::{Iso8601, Rfc3339},
};

use crate::{DatabaseID, Error, UserID};

/// The spending category assigned to a transaction.
///
/// Stored as the category's slug, e.g. 'dining-out'. Only [Category::Bills]
/// matters to the bills engine; the rest exist so the store can hold the
/// full transaction history without losing information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Streaming, games, events.
    Entertainment,
    /// Recurring household bills, e.g. power, internet, rent.
    Bills,
    /// Supermarket spending.
    Groceries,
    /// Restaurants and takeaways.
    DiningOut,
    /// Fuel, public transport, ride shares.
    Transportation,
    /// Health and beauty.
    PersonalCare,
    /// Courses, books, fees.
    Education,
    /// Hobbies and memberships.
    Lifestyle,
    /// Clothing and general retail.
    Shopping,
    /// Anything that fits nowhere else.
    General,
}

impl Category {
    /// The category's slug as stored in the database.
    pub fn as_slug(&self) -> &'static str {
        match self {
            Category::Entertainment => "entertainment",
            Category::Bills => "bills",
            Category::Groceries => "groceries",
            Category::DiningOut => "dining-out",
            Category::Transportation => "transportation",
            Category::PersonalCare => "personal-care",
            Category::Education => "education",
            Category::Lifestyle => "lifestyle",
            Category::Shopping => "shopping",
            Category::General => "general",
        }
    }

    /// Look up a category by its slug.
    ///
    /// # Errors
    /// Returns [Error::InvalidCategory] if `slug` does not name a category.
    pub fn from_slug(slug: &str) -> Result<Self, Error> {
        match slug {
            "entertainment" => Ok(Category::Entertainment),
            "bills" => Ok(Category::Bills),
            "groceries" => Ok(Category::Groceries),
            "dining-out" => Ok(Category::DiningOut),
            "transportation" => Ok(Category::Transportation),
            "personal-care" => Ok(Category::PersonalCare),
            "education" => Ok(Category::Education),
            "lifestyle" => Ok(Category::Lifestyle),
            "shopping" => Ok(Category::Shopping),
            "general" => Ok(Category::General),
            _ => Err(Error::InvalidCategory(slug.to_owned())),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_slug())
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Positive amounts are income/credits, negative amounts are expenses/debits,
/// following standard accounting conventions where money flowing into your
/// account is positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseID,
    /// The user whose account this transaction belongs to.
    pub user_id: UserID,
    /// The counterparty name, e.g. "Netflix". For recurring bills this name
    /// is the bill's identity: grouping is a case-sensitive exact match, so
    /// "Netflix" and "netflix" are two different bills.
    pub name: String,
    /// The spending category.
    pub category: Category,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// When the transaction happened, as a UTC calendar date.
    pub date: Date,
    /// Whether this transaction repeats on a monthly schedule.
    pub recurring: bool,
    /// An optional avatar image path for the counterparty, carried through
    /// to annotated output untouched.
    pub avatar: Option<String>,
}

impl Transaction {
    /// Whether this transaction is a recurring bill payment: a recurring
    /// outflow in the bills category.
    ///
    /// This is the predicate that decides which transactions form
    /// [RecurringBillGroup](crate::RecurringBillGroup)s. It must be applied
    /// exactly once per group computation, either in the store's query or
    /// via [BillTransactionStore::recurring_bill_transactions](crate::BillTransactionStore::recurring_bill_transactions)'s
    /// default filter.
    pub fn is_recurring_bill_payment(&self) -> bool {
        self.category == Category::Bills && self.recurring && self.amount < 0.0
    }
}

/// The fields needed to record a new transaction.
///
/// Used by the SQLite store to seed and maintain the transaction table; the
/// bills engine itself never writes.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The user recording the transaction.
    pub user_id: UserID,
    /// The counterparty name.
    pub name: String,
    /// The spending category.
    pub category: Category,
    /// The transaction amount, negative for outflows.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// Whether the transaction repeats monthly.
    pub recurring: bool,
    /// An optional avatar image path.
    pub avatar: Option<String>,
}

/// Parse an ISO-8601 date or datetime string into a UTC calendar date.
///
/// Datetimes are converted to UTC before the date is taken, so a payment
/// recorded at 23:30 in a western timezone lands on the correct UTC day.
/// Using local time here would misclassify bills paid near midnight.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid ISO-8601 date or
/// datetime.
pub fn parse_iso_date(text: &str) -> Result<Date, Error> {
    if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(timestamp.to_offset(UtcOffset::UTC).date());
    }

    Date::parse(text, &Iso8601::DEFAULT)
        .map_err(|error| Error::InvalidDate(text.to_owned(), error.to_string()))
}

#[cfg(test)]
mod category_tests {
    use super::Category;
    use crate::Error;

    #[test]
    fn slug_round_trips_for_every_category() {
        let categories = [
            Category::Entertainment,
            Category::Bills,
            Category::Groceries,
            Category::DiningOut,
            Category::Transportation,
            Category::PersonalCare,
            Category::Education,
            Category::Lifestyle,
            Category::Shopping,
            Category::General,
        ];

        for category in categories {
            let got = Category::from_slug(category.as_slug());
            assert_eq!(Ok(category), got, "slug {} did not round trip", category);
        }
    }

    #[test]
    fn from_slug_rejects_unknown_slug() {
        let result = Category::from_slug("utilities");

        assert_eq!(result, Err(Error::InvalidCategory("utilities".to_owned())));
    }

    #[test]
    fn serializes_as_kebab_case_slug() {
        let json = serde_json::to_string(&Category::DiningOut).unwrap();

        assert_eq!(json, "\"dining-out\"");
    }
}
