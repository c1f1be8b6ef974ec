//! Defines the core data models and database queries for incomes and expenses.
//!
//! Incomes and expenses share one record shape but live in separate tables.
//! Each record names its category by value rather than by ID, so the queries
//! that filter or rewrite by category name are the ones the
//! [coordinator](crate::coordinator) relies on to keep both tables in step
//! with the category list.

use std::{fmt::Display, ops::Range, str::FromStr};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    form::{NumberField, non_empty},
    serde_time::{self, DATE_FORMAT},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
///
/// Also the type of a category: a category only collects transactions of
/// its own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// Both kinds, in a fixed order.
    pub const ALL: [TransactionKind; 2] = [TransactionKind::Income, TransactionKind::Expense];

    /// The lowercase name used in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// The table holding transactions of this kind.
    fn table(&self) -> &'static str {
        self.as_str()
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "Income"),
            TransactionKind::Expense => write!(f, "Expense"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(Error::Validation(format!(
                "Type must be \"income\" or \"expense\", got \"{other}\""
            ))),
        }
    }
}

/// An income or expense, i.e. an event where money was either earned or spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction within its table.
    pub id: TransactionId,
    /// A short label, e.g. "Lunch".
    pub title: String,
    /// The amount of money, always positive. Its kind says which way it went.
    pub amount: f64,
    /// A free text description.
    pub description: String,
    /// When the transaction happened.
    #[serde(with = "serde_time::date")]
    pub date: Date,
    /// The name of the category the transaction belongs to.
    pub category: String,
    /// The user who owns the transaction.
    pub owner: UserID,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A validated transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A short, non-empty label.
    pub title: String,
    /// A positive, finite amount.
    pub amount: f64,
    /// A non-empty description.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// The name of an existing category of the same kind.
    pub category: String,
}

/// The body of a request to add an income or expense.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub amount: Option<NumberField>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
}

const MISSING_FIELDS: &str = "All fields are required!";
const INVALID_AMOUNT: &str = "Amount must be a positive number!";

impl TransactionForm {
    /// Check the form and convert it into a [NewTransaction].
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] if a field is missing, the amount is not a
    /// positive number, or the date cannot be parsed.
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let (Some(title), Some(description), Some(raw_date), Some(category)) = (
            non_empty(&self.title),
            non_empty(&self.description),
            non_empty(&self.date),
            non_empty(&self.category),
        ) else {
            return Err(Error::Validation(MISSING_FIELDS.to_owned()));
        };

        let amount = self
            .amount
            .as_ref()
            .and_then(NumberField::to_finite)
            .filter(|amount| *amount > 0.0)
            .ok_or_else(|| Error::Validation(INVALID_AMOUNT.to_owned()))?;

        Ok(NewTransaction {
            title: title.to_owned(),
            amount,
            description: description.to_owned(),
            date: parse_date(raw_date)?,
            category: category.to_owned(),
        })
    }
}

/// Parse a `YYYY-MM-DD` date.
///
/// Browsers often send a full ISO 8601 timestamp instead, in which case only
/// its date part is used.
fn parse_date(raw_date: &str) -> Result<Date, Error> {
    let date_part = match raw_date.as_bytes().get(10) {
        Some(b'T') => &raw_date[..10],
        _ => raw_date,
    };

    Date::parse(date_part, DATE_FORMAT).map_err(|_| {
        Error::Validation(format!(
            "Date must be a valid date (YYYY-MM-DD), got \"{raw_date}\""
        ))
    })
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const COLUMNS: &str = "id, title, amount, description, date, category, user_id, created_at";

/// Create the income and expense tables in the database.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn create_transaction_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    for kind in TransactionKind::ALL {
        let table = kind.table();

        connection.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                category TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_{table}_user_category ON {table}(user_id, category);
            CREATE INDEX IF NOT EXISTS idx_{table}_user_date ON {table}(user_id, date);"
        ))?;
    }

    Ok(())
}

/// Store a validated transaction for `owner`.
///
/// The category name is stored as given; checking that it names a category
/// is the caller's job.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    kind: TransactionKind,
    owner: UserID,
    new_transaction: NewTransaction,
    created_at: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "INSERT INTO {} (title, amount, description, date, category, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {COLUMNS}",
            kind.table()
        ))?
        .query_row(
            (
                new_transaction.title,
                new_transaction.amount,
                new_transaction.description,
                new_transaction.date,
                new_transaction.category,
                owner.as_i64(),
                created_at,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get all of `owner`'s transactions of `kind`, newest first.
pub fn get_transactions(
    kind: TransactionKind,
    owner: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    // IDs increase with creation time, so ordering by ID is ordering by creation.
    connection
        .prepare(&format!(
            "SELECT {COLUMNS} FROM {} WHERE user_id = :user_id ORDER BY id DESC",
            kind.table()
        ))?
        .query_map(&[(":user_id", &owner.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Get `owner`'s transactions of `kind` dated within `date_range`
/// (start inclusive, end exclusive), newest first.
pub fn get_transactions_in_range(
    kind: TransactionKind,
    owner: UserID,
    date_range: Range<Date>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {COLUMNS} FROM {}
             WHERE user_id = ?1 AND date >= ?2 AND date < ?3
             ORDER BY id DESC",
            kind.table()
        ))?
        .query_map(
            (owner.as_i64(), date_range.start, date_range.end),
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Get up to `limit` of `owner`'s most recently recorded transactions of `kind`.
pub fn get_recent_transactions(
    kind: TransactionKind,
    owner: UserID,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {COLUMNS} FROM {} WHERE user_id = ?1 ORDER BY id DESC LIMIT ?2",
            kind.table()
        ))?
        .query_map((owner.as_i64(), limit), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Delete one of `owner`'s transactions.
///
/// # Errors
/// Returns [Error::TransactionNotFound] if there is no such transaction or it
/// belongs to another user.
pub fn delete_transaction(
    kind: TransactionKind,
    owner: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        &format!("DELETE FROM {} WHERE id = ?1 AND user_id = ?2", kind.table()),
        (id, owner.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::TransactionNotFound(kind));
    }

    Ok(())
}

/// Point all of `owner`'s transactions of `kind` in category `old_name` at
/// `new_name`. Returns the number of transactions changed.
pub fn rename_category(
    kind: TransactionKind,
    owner: UserID,
    old_name: &str,
    new_name: &str,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .execute(
            &format!(
                "UPDATE {} SET category = ?1 WHERE category = ?2 AND user_id = ?3",
                kind.table()
            ),
            (new_name, old_name, owner.as_i64()),
        )
        .map_err(|error| error.into())
}

/// Count `owner`'s transactions of `kind` in the category `name`.
pub fn count_transactions_in_category(
    kind: TransactionKind,
    owner: UserID,
    name: &str,
    connection: &Connection,
) -> Result<u32, Error> {
    connection
        .query_row(
            &format!(
                "SELECT COUNT(id) FROM {} WHERE category = ?1 AND user_id = ?2",
                kind.table()
            ),
            (name, owner.as_i64()),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Sum the amounts of all of `owner`'s transactions of `kind`.
pub fn sum_transactions(
    kind: TransactionKind,
    owner: UserID,
    connection: &Connection,
) -> Result<f64, Error> {
    connection
        .query_row(
            &format!(
                "SELECT COALESCE(SUM(amount), 0.0) FROM {} WHERE user_id = ?1",
                kind.table()
            ),
            (owner.as_i64(),),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
        category: row.get(5)?,
        owner: UserID::new(row.get(6)?),
        created_at: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
