//! Budget Tracker is a JSON API for tracking personal income and expenses.
//!
//! Users record income and expense transactions against their own budget
//! categories. Transactions refer to their category by name, so renaming or
//! deleting a category goes through the [coordinator](crate::update_category)
//! which keeps both transaction collections consistent with the category list.
//! Summaries (monthly rollups, all-time totals and budget-vs-actual) are
//! computed on demand from the stored transactions.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod category;
mod coordinator;
mod database_id;
mod db;
mod endpoints;
mod form;
mod logging;
mod routing;
mod serde_time;
mod summary;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{Email, NewUser, PasswordHash, User, UserID, ValidatedPassword, create_user};
pub use category::{Category, CategoryName, MonthlyBudget, NewCategory};
pub use coordinator::{create_category, create_transaction, delete_category, update_category};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{NewTransaction, Transaction, TransactionKind};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// Every variant maps to an HTTP status and a JSON body of the form
/// `{"message": "..."}`, see the [IntoResponse] implementation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing or a field could not be parsed.
    ///
    /// The string is shown to the client as is.
    #[error("{0}")]
    Validation(String),

    /// A category was given a negative or non-finite monthly budget.
    #[error("Monthly budget must be a non-negative number")]
    InvalidBudget,

    /// The month or year of a monthly rollup was missing or out of range.
    #[error("Valid month (1-12) and year are required")]
    InvalidPeriod,

    /// The user already has a category with this name.
    ///
    /// Category names are unique per user and compared case-sensitively.
    #[error("Category name \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// A category cannot be deleted while transactions still refer to it.
    #[error("Cannot delete category with associated transactions")]
    CategoryHasTransactions,

    /// The category does not exist or belongs to another user.
    ///
    /// The two cases are deliberately indistinguishable to the client so that
    /// users cannot probe for other users' categories.
    #[error("Category not found or not authorized")]
    CategoryNotFound,

    /// The income or expense does not exist or belongs to another user.
    #[error("{0} not found or not authorized")]
    TransactionNotFound(TransactionKind),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The request did not include a bearer token.
    #[error("Not authorized, no token")]
    MissingToken,

    /// The bearer token was malformed, expired, signed with the wrong key, or
    /// refers to a user that no longer exists.
    #[error("Not authorized, token failed")]
    InvalidToken,

    /// The email/password combination did not match a registered user.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A user with the email address is already registered.
    #[error("User already exists")]
    DuplicateEmail,

    /// The string is not a valid email address.
    #[error("{0} is not a valid email address")]
    InvalidEmail(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A JSON web token could not be created.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected JSON body: {rejection}");

        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                Error::Validation("Expected a JSON request body".to_owned())
            }
            rejection => Error::Validation(rejection.body_text()),
        }
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        // IDs are integers, so a path that does not parse cannot name a stored record.
        tracing::debug!("rejected path parameters: {rejection}");
        Error::NotFound
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("rejected query string: {rejection}");
        Error::Validation(rejection.body_text())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_)
            | Error::InvalidBudget
            | Error::InvalidPeriod
            | Error::DuplicateCategoryName(_)
            | Error::CategoryHasTransactions
            | Error::DuplicateEmail
            | Error::InvalidEmail(_)
            | Error::TooWeak(_) => StatusCode::BAD_REQUEST,
            Error::CategoryNotFound | Error::TransactionNotFound(_) | Error::NotFound => {
                StatusCode::NOT_FOUND
            }
            Error::MissingToken | Error::InvalidToken | Error::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Error::HashingError(_)
            | Error::TokenCreation(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            // The details of internal errors are for the server logs only.
            tracing::error!("An unexpected error occurred: {}", self);
            "Server Error".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
