//! Income and expense management.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the form used to create one
//! - Database functions for storing, querying and re-labelling transactions
//! - Route handlers for adding, listing and deleting incomes and expenses

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;

pub use self::core::{
    NewTransaction, Transaction, TransactionForm, TransactionKind,
    count_transactions_in_category, create_transaction, create_transaction_tables,
    delete_transaction, get_recent_transactions, get_transactions, get_transactions_in_range,
    rename_category, sum_transactions,
};
pub use create_endpoint::{create_expense_endpoint, create_income_endpoint};
pub use delete_endpoint::{delete_expense_endpoint, delete_income_endpoint};
pub use list_endpoint::{get_expenses_endpoint, get_incomes_endpoint};

/// The state needed by the income and expense endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
