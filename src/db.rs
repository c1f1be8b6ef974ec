//! Sets up the application's database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    auth::create_user_table, category::create_category_table,
    transaction::create_transaction_tables,
};

/// Create the tables for users, categories, incomes and expenses.
///
/// Existing tables are left as they are, so this is safe to call on every start up.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_tables(&transaction)?;

    transaction.commit()?;

    Ok(())
}
