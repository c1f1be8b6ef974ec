//! Budget categories that incomes and expenses are filed under.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    create_category, create_category_table, delete_category, get_categories, get_category,
    get_category_by_name, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{
    Category, CategoryForm, CategoryName, MAX_CATEGORY_NAME_LENGTH, MonthlyBudget, NewCategory,
};
pub use edit::update_category_endpoint;
pub use list::get_categories_endpoint;

/// The state needed by the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
