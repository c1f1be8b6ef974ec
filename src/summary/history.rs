//! The most recently recorded incomes and expenses.

use std::cmp::Reverse;

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::UserID,
    summary::SummaryState,
    transaction::{Transaction, TransactionKind, get_recent_transactions},
};

/// The number of entries returned when the request does not give a limit.
pub const DEFAULT_HISTORY_LIMIT: u32 = 3;

/// An income or expense tagged with which of the two it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The transaction.
    #[serde(flatten)]
    pub transaction: Transaction,
}

/// Get up to `limit` of `owner`'s most recently recorded incomes and
/// expenses, newest first.
pub fn get_transaction_history(
    owner: UserID,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<HistoryEntry>, Error> {
    let mut history = Vec::new();
    for kind in TransactionKind::ALL {
        history.extend(
            get_recent_transactions(kind, owner, limit, connection)?
                .into_iter()
                .map(|transaction| HistoryEntry { kind, transaction }),
        );
    }

    history.sort_by_key(|entry| Reverse(entry.transaction.created_at));
    history.truncate(limit as usize);

    Ok(history)
}

/// The query string of a history request, e.g. `?limit=5`.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    limit: Option<u32>,
}

/// A route handler that responds with the user's most recent transactions.
pub async fn get_transaction_history_endpoint(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Query(query), _): WithRejection<Query<HistoryQuery>, Error>,
) -> Result<Json<Vec<HistoryEntry>>, Error> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_transaction_history(user_id, limit, &connection).map(Json)
}
