//! Shared helpers for tests that talk to the full router.

use axum_test::TestServer;
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, Category, build_router, endpoints};

/// A password that passes the strength check.
pub const TEST_PASSWORD: &str = "averysafeandsecurepassword";

/// Get a test server backed by a fresh in-memory database.
///
/// Passwords are hashed with the lowest bcrypt cost to keep tests fast.
pub fn get_test_server() -> TestServer {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    let state = AppState::new(connection, "foobar")
        .expect("Could not create app state")
        .with_password_cost(4);

    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

/// Register a user with `email` and return their bearer token.
pub async fn get_test_token(server: &TestServer, email: &str) -> String {
    let response = server
        .post(endpoints::REGISTER)
        .json(&json!({ "name": "Test", "email": email, "password": TEST_PASSWORD }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<TokenResponse>().token
}

/// Create a category with a monthly budget of 100 through the API.
pub async fn create_test_category(
    server: &TestServer,
    token: &str,
    name: &str,
    kind: &str,
) -> Category {
    let response = server
        .post(endpoints::ADD_CATEGORY)
        .authorization_bearer(token)
        .json(&json!({ "name": name, "type": kind, "monthlyBudget": 100 }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Category>()
}

/// Add an income or expense dated 2024-03-05 through the API.
///
/// `endpoint` is either [endpoints::ADD_INCOME] or [endpoints::ADD_EXPENSE].
pub async fn add_test_transaction(
    server: &TestServer,
    token: &str,
    endpoint: &str,
    title: &str,
    amount: f64,
    category: &str,
) {
    server
        .post(endpoint)
        .authorization_bearer(token)
        .json(&json!({
            "title": title,
            "amount": amount,
            "description": "A test transaction",
            "date": "2024-03-05",
            "category": category,
        }))
        .await
        .assert_status_ok();
}
