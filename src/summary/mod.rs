//! Read-only summaries computed from the user's categories and transactions.
//!
//! Nothing here is stored: every summary is recomputed from the category,
//! income and expense tables when it is requested.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod budget;
mod history;
mod rollup;
mod totals;

pub use budget::{CategorySummary, get_category_summary, get_category_summary_endpoint};
pub use history::{
    DEFAULT_HISTORY_LIMIT, HistoryEntry, get_transaction_history,
    get_transaction_history_endpoint,
};
pub use rollup::{CategoryData, get_category_data, get_category_data_endpoint, month_range};
pub use totals::{Totals, get_totals, get_totals_endpoint};

/// The state needed by the summary endpoints.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection for reading categories and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
