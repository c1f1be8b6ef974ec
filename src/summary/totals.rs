//! All-time income, expense and balance totals.

use axum::{Extension, Json, extract::State};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    auth::UserID,
    summary::SummaryState,
    transaction::{TransactionKind, sum_transactions},
};

/// The sums of all of a user's incomes and expenses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// The sum of all incomes.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub total_balance: f64,
}

/// Sum all of `owner`'s incomes and expenses.
pub fn get_totals(owner: UserID, connection: &Connection) -> Result<Totals, Error> {
    let total_income = sum_transactions(TransactionKind::Income, owner, connection)?;
    let total_expenses = sum_transactions(TransactionKind::Expense, owner, connection)?;

    Ok(Totals {
        total_income,
        total_expenses,
        total_balance: total_income - total_expenses,
    })
}

/// A route handler that responds with the user's all-time totals.
pub async fn get_totals_endpoint(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Totals>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_totals(user_id, &connection).map(Json)
}
