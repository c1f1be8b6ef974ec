//! Defines the endpoints for listing incomes and expenses.

use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    auth::UserID,
    transaction::{Transaction, TransactionKind, TransactionState, get_transactions},
};

/// A route handler that responds with the user's incomes, newest first.
pub async fn get_incomes_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Transaction>>, Error> {
    list_transactions(TransactionKind::Income, state, user_id)
}

/// A route handler that responds with the user's expenses, newest first.
pub async fn get_expenses_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Transaction>>, Error> {
    list_transactions(TransactionKind::Expense, state, user_id)
}

fn list_transactions(
    kind: TransactionKind,
    state: TransactionState,
    user_id: UserID,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_transactions(kind, user_id, &connection).map(Json)
}
