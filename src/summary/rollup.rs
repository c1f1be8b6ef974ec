//! Per-category totals for a single calendar month.

use std::{collections::HashMap, ops::Range};

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    Error,
    auth::UserID,
    category::{Category, get_categories},
    summary::SummaryState,
    transaction::{Transaction, TransactionKind, get_transactions_in_range},
};

/// A category with the transactions filed under it in some period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryData {
    /// The category.
    #[serde(flatten)]
    pub category: Category,
    /// The sum of the amounts of `transactions`.
    pub total_amount: f64,
    /// The category's transactions in the period, newest first.
    pub transactions: Vec<Transaction>,
}

/// The dates of the month `month` of `year`, as a half-open range from the
/// first of the month to the first of the following month.
///
/// # Errors
///
/// Returns [Error::InvalidPeriod] if `month` is not in 1 to 12 or the year is
/// outside the supported range.
pub fn month_range(month: u8, year: i32) -> Result<Range<Date>, Error> {
    let month = Month::try_from(month).map_err(|_| Error::InvalidPeriod)?;
    let start = Date::from_calendar_date(year, month, 1).map_err(|_| Error::InvalidPeriod)?;

    let (next_year, next_month) = match month {
        Month::December => (year + 1, Month::January),
        month => (year, month.next()),
    };
    let end = Date::from_calendar_date(next_year, next_month, 1).map_err(|_| Error::InvalidPeriod)?;

    Ok(start..end)
}

/// Get each of `owner`'s categories with its transactions dated in `date_range`.
///
/// Categories come in the same order as the category list. A category only
/// collects transactions of its own type, and categories with no
/// transactions in the range are included with a total of zero.
pub fn get_category_data(
    owner: UserID,
    date_range: Range<Date>,
    connection: &Connection,
) -> Result<Vec<CategoryData>, Error> {
    let categories = get_categories(owner, connection)?;

    let mut transactions_by_category: HashMap<(TransactionKind, String), Vec<Transaction>> =
        HashMap::new();
    for kind in TransactionKind::ALL {
        for transaction in get_transactions_in_range(kind, owner, date_range.clone(), connection)? {
            transactions_by_category
                .entry((kind, transaction.category.clone()))
                .or_default()
                .push(transaction);
        }
    }

    let category_data = categories
        .into_iter()
        .map(|category| {
            let transactions = transactions_by_category
                .remove(&(category.kind, category.name.to_string()))
                .unwrap_or_default();
            let total_amount = transactions
                .iter()
                .map(|transaction| transaction.amount)
                .sum();

            CategoryData {
                category,
                total_amount,
                transactions,
            }
        })
        .collect();

    Ok(category_data)
}

/// The query string of a monthly rollup request, e.g. `?month=3&year=2024`.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    month: Option<String>,
    year: Option<String>,
}

impl PeriodQuery {
    fn to_range(&self) -> Result<Range<Date>, Error> {
        let month = self
            .month
            .as_deref()
            .and_then(|month| month.trim().parse().ok())
            .ok_or(Error::InvalidPeriod)?;
        let year = self
            .year
            .as_deref()
            .and_then(|year| year.trim().parse().ok())
            .ok_or(Error::InvalidPeriod)?;

        month_range(month, year)
    }
}

/// A route handler that responds with the user's categories and their
/// transactions for the requested month.
pub async fn get_category_data_endpoint(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Query(query), _): WithRejection<Query<PeriodQuery>, Error>,
) -> Result<Json<Vec<CategoryData>>, Error> {
    let date_range = query.to_range()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_category_data(user_id, date_range, &connection).map(Json)
}
