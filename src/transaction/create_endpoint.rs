//! Defines the endpoints for adding an income or an expense.

use axum::{Extension, Json, extract::State};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use crate::{
    Error,
    auth::UserID,
    coordinator,
    transaction::{TransactionForm, TransactionKind, TransactionState},
};

/// A route handler for adding an income, responds with a confirmation message.
pub async fn create_income_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Json(form), _): WithRejection<Json<TransactionForm>, Error>,
) -> Result<Json<Value>, Error> {
    create_transaction_endpoint(TransactionKind::Income, state, user_id, form)
}

/// A route handler for adding an expense, responds with a confirmation message.
pub async fn create_expense_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Json(form), _): WithRejection<Json<TransactionForm>, Error>,
) -> Result<Json<Value>, Error> {
    create_transaction_endpoint(TransactionKind::Expense, state, user_id, form)
}

fn create_transaction_endpoint(
    kind: TransactionKind,
    state: TransactionState,
    user_id: UserID,
    form: TransactionForm,
) -> Result<Json<Value>, Error> {
    let new_transaction = form.validate()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let transaction = coordinator::create_transaction(kind, user_id, new_transaction, &connection)?;
    tracing::debug!("created {} {} for user {user_id}", kind.as_str(), transaction.id);

    Ok(Json(json!({ "message": format!("{kind} Added") })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        Transaction, endpoints,
        test_utils::{create_test_category, get_test_server, get_test_token},
    };

    #[tokio::test]
    async fn add_expense_succeeds() {
        let server = get_test_server();
        let token = get_test_token(&server, "test@test.com").await;
        create_test_category(&server, &token, "Food", "expense").await;

        let response = server
            .post(endpoints::ADD_EXPENSE)
            .authorization_bearer(&token)
            .json(&json!({
                "title": "Lunch",
                "amount": 12.5,
                "description": "x",
                "date": "2024-03-05",
                "category": "Food",
            }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Expense Added" }));

        let expenses = server
            .get(endpoints::GET_EXPENSES)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, 12.5);
        assert_eq!(expenses[0].category, "Food");
    }

    #[tokio::test]
    async fn add_income_accepts_numeric_string() {
        let server = get_test_server();
        let token = get_test_token(&server, "test@test.com").await;
        create_test_category(&server, &token, "Salary", "income").await;

        let response = server
            .post(endpoints::ADD_INCOME)
            .authorization_bearer(&token)
            .json(&json!({
                "title": "March pay",
                "amount": "2500",
                "description": "Monthly salary",
                "date": "2024-03-28",
                "category": "Salary",
            }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Income Added" }));
    }

    #[tokio::test]
    async fn negative_amount_is_rejected() {
        let server = get_test_server();
        let token = get_test_token(&server, "test@test.com").await;
        create_test_category(&server, &token, "Food", "expense").await;

        let response = server
            .post(endpoints::ADD_EXPENSE)
            .authorization_bearer(&token)
            .json(&json!({
                "title": "Lunch",
                "amount": -5,
                "description": "x",
                "date": "2024-03-05",
                "category": "Food",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "message": "Amount must be a positive number!" }));
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let server = get_test_server();
        let token = get_test_token(&server, "test@test.com").await;

        let response = server
            .post(endpoints::ADD_EXPENSE)
            .authorization_bearer(&token)
            .json(&json!({ "title": "Lunch", "amount": 5 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "message": "All fields are required!" }));
    }

    #[tokio::test]
    async fn expense_in_income_category_is_rejected() {
        let server = get_test_server();
        let token = get_test_token(&server, "test@test.com").await;
        create_test_category(&server, &token, "Salary", "income").await;

        let response = server
            .post(endpoints::ADD_EXPENSE)
            .authorization_bearer(&token)
            .json(&json!({
                "title": "Lunch",
                "amount": 5,
                "description": "x",
                "date": "2024-03-05",
                "category": "Salary",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn mistyped_field_is_a_json_validation_error() {
        let server = get_test_server();
        let token = get_test_token(&server, "test@test.com").await;
        create_test_category(&server, &token, "Food", "expense").await;

        let response = server
            .post(endpoints::ADD_EXPENSE)
            .authorization_bearer(&token)
            .json(&json!({
                "title": 5,
                "amount": 5,
                "description": "x",
                "date": "2024-03-05",
                "category": "Food",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        let message = body["message"].as_str().expect("message should be a string");
        assert!(message.contains("invalid type"), "got message {message:?}");
    }

    #[tokio::test]
    async fn body_without_json_content_type_is_rejected() {
        let server = get_test_server();
        let token = get_test_token(&server, "test@test.com").await;

        let response = server
            .post(endpoints::ADD_EXPENSE)
            .authorization_bearer(&token)
            .text("title=Lunch")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "message": "Expected a JSON request body" }));
    }

    #[tokio::test]
    async fn add_without_token_is_unauthorized() {
        let server = get_test_server();

        let response = server
            .post(endpoints::ADD_EXPENSE)
            .json(&json!({}))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
