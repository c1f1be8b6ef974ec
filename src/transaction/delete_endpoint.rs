//! Defines the endpoints for deleting an income or an expense.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    transaction::{TransactionKind, TransactionState, delete_transaction},
};

/// A route handler for deleting an income, responds with a confirmation message.
pub async fn delete_income_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(income_id), _): WithRejection<Path<TransactionId>, Error>,
) -> Result<Json<Value>, Error> {
    delete_transaction_endpoint(TransactionKind::Income, state, user_id, income_id)
}

/// A route handler for deleting an expense, responds with a confirmation message.
pub async fn delete_expense_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(expense_id), _): WithRejection<Path<TransactionId>, Error>,
) -> Result<Json<Value>, Error> {
    delete_transaction_endpoint(TransactionKind::Expense, state, user_id, expense_id)
}

fn delete_transaction_endpoint(
    kind: TransactionKind,
    state: TransactionState,
    user_id: UserID,
    transaction_id: TransactionId,
) -> Result<Json<Value>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    delete_transaction(kind, user_id, transaction_id, &connection)?;

    Ok(Json(json!({ "message": format!("{kind} Deleted") })))
}
