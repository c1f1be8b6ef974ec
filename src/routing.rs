//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};

use crate::{
    AppState, Error,
    auth::{auth_guard, log_in, register_user},
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        update_category_endpoint,
    },
    endpoints,
    summary::{
        get_category_data_endpoint, get_category_summary_endpoint,
        get_transaction_history_endpoint, get_totals_endpoint,
    },
    transaction::{
        create_expense_endpoint, create_income_endpoint, delete_expense_endpoint,
        delete_income_endpoint, get_expenses_endpoint, get_incomes_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Every route except registration, log in and coffee requires a bearer token.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(log_in));

    let protected_routes = Router::new()
        .route(endpoints::ADD_INCOME, post(create_income_endpoint))
        .route(endpoints::GET_INCOMES, get(get_incomes_endpoint))
        .route(endpoints::DELETE_INCOME, delete(delete_income_endpoint))
        .route(endpoints::ADD_EXPENSE, post(create_expense_endpoint))
        .route(endpoints::GET_EXPENSES, get(get_expenses_endpoint))
        .route(endpoints::DELETE_EXPENSE, delete(delete_expense_endpoint))
        .route(endpoints::ADD_CATEGORY, post(create_category_endpoint))
        .route(endpoints::GET_CATEGORIES, get(get_categories_endpoint))
        .route(endpoints::UPDATE_CATEGORY, put(update_category_endpoint))
        .route(endpoints::DELETE_CATEGORY, delete(delete_category_endpoint))
        .route(endpoints::GET_CATEGORY_DATA, get(get_category_data_endpoint))
        .route(endpoints::GET_TOTALS, get(get_totals_endpoint))
        .route(
            endpoints::GET_CATEGORY_SUMMARY,
            get(get_category_summary_endpoint),
        )
        .route(
            endpoints::GET_TRANSACTION_HISTORY,
            get(get_transaction_history_endpoint),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, "I'm a teapot").into_response()
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        Transaction, endpoints,
        test_utils::{add_test_transaction, create_test_category, get_test_server, get_test_token},
    };

    #[tokio::test]
    async fn coffee_is_a_teapot() {
        let server = get_test_server();

        let response = server.get(endpoints::COFFEE).await;

        response.assert_status(StatusCode::IM_A_TEAPOT);
        response.assert_text("I'm a teapot");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        server
            .get("/does-not-exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        let server = get_test_server();

        for path in [
            endpoints::GET_INCOMES,
            endpoints::GET_EXPENSES,
            endpoints::GET_CATEGORIES,
            endpoints::GET_TOTALS,
            endpoints::GET_CATEGORY_SUMMARY,
            endpoints::GET_TRANSACTION_HISTORY,
        ] {
            server
                .get(path)
                .await
                .assert_status(StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn rollup_then_rename_end_to_end() {
        let server = get_test_server();
        let token = get_test_token(&server, "test@test.com").await;
        let food = create_test_category(&server, &token, "Food", "expense").await;
        add_test_transaction(&server, &token, endpoints::ADD_EXPENSE, "Lunch", 20.0, "Food").await;

        let march = server
            .get(endpoints::GET_CATEGORY_DATA)
            .add_query_param("month", 3)
            .add_query_param("year", 2024)
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        assert_eq!(march[0]["name"], "Food");
        assert_eq!(march[0]["totalAmount"], 20.0);
        assert_eq!(march[0]["transactions"].as_array().map(Vec::len), Some(1));

        let april = server
            .get(endpoints::GET_CATEGORY_DATA)
            .add_query_param("month", 4)
            .add_query_param("year", 2024)
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        assert_eq!(april[0]["totalAmount"], 0.0);

        server
            .put(&endpoints::format_endpoint(
                endpoints::UPDATE_CATEGORY,
                food.id,
            ))
            .authorization_bearer(&token)
            .json(&json!({ "name": "Meals", "type": "expense", "monthlyBudget": 100 }))
            .await
            .assert_status_ok();

        let expenses = server
            .get(endpoints::GET_EXPENSES)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(expenses[0].category, "Meals");

        server
            .delete(&endpoints::format_endpoint(
                endpoints::DELETE_CATEGORY,
                food.id,
            ))
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
