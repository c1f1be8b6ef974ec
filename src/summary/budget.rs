//! Compares what was earned or spent in each category against its budget.

use std::collections::HashMap;

use axum::{Extension, Json, extract::State};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    auth::UserID,
    category::{Category, get_categories},
    summary::SummaryState,
    transaction::{Transaction, TransactionKind, get_transactions},
};

/// A category with all-time statistics of the transactions filed under it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// The category.
    #[serde(flatten)]
    pub category: Category,
    /// The sum of the category's transactions.
    pub total_amount: f64,
    /// The number of transactions in the category.
    pub transaction_count: u32,
    /// How much of the monthly budget is left, never less than zero.
    pub remaining: f64,
    /// The category's transactions, newest first.
    pub transactions: Vec<Transaction>,
}

/// Summarize each of `owner`'s categories, in category list order.
///
/// The totals are over all transactions, not just the current month.
pub fn get_category_summary(
    owner: UserID,
    connection: &Connection,
) -> Result<Vec<CategorySummary>, Error> {
    let categories = get_categories(owner, connection)?;

    let mut by_category: HashMap<(TransactionKind, String), Vec<Transaction>> = HashMap::new();
    for kind in TransactionKind::ALL {
        for transaction in get_transactions(kind, owner, connection)? {
            by_category
                .entry((kind, transaction.category.clone()))
                .or_default()
                .push(transaction);
        }
    }

    let summaries = categories
        .into_iter()
        .map(|category| {
            let transactions = by_category
                .remove(&(category.kind, category.name.to_string()))
                .unwrap_or_default();
            let total_amount: f64 = transactions
                .iter()
                .map(|transaction| transaction.amount)
                .sum();
            let remaining = (category.monthly_budget.as_f64() - total_amount).max(0.0);

            CategorySummary {
                category,
                total_amount,
                transaction_count: transactions.len() as u32,
                remaining,
                transactions,
            }
        })
        .collect();

    Ok(summaries)
}

/// A route handler that responds with the user's budget-vs-actual summary.
pub async fn get_category_summary_endpoint(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<CategorySummary>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_category_summary(user_id, &connection).map(Json)
}
