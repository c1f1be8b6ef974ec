//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/delete-income/{income_id}', use [format_endpoint].

/// The route for registering a new user.
pub const REGISTER: &str = "/auth/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/auth/login";
/// The route to record an income.
pub const ADD_INCOME: &str = "/add-income";
/// The route to list the user's incomes.
pub const GET_INCOMES: &str = "/get-incomes";
/// The route to delete an income.
pub const DELETE_INCOME: &str = "/delete-income/{income_id}";
/// The route to record an expense.
pub const ADD_EXPENSE: &str = "/add-expense";
/// The route to list the user's expenses.
pub const GET_EXPENSES: &str = "/get-expenses";
/// The route to delete an expense.
pub const DELETE_EXPENSE: &str = "/delete-expense/{expense_id}";
/// The route to create a category.
pub const ADD_CATEGORY: &str = "/add-category";
/// The route to list the user's categories.
pub const GET_CATEGORIES: &str = "/get-categories";
/// The route to update, and possibly rename, a category.
pub const UPDATE_CATEGORY: &str = "/update-category/{category_id}";
/// The route to delete a category.
pub const DELETE_CATEGORY: &str = "/delete-category/{category_id}";
/// The route for the per-category totals of one month.
pub const GET_CATEGORY_DATA: &str = "/get-category-data";
/// The route for the all-time income, expense and balance totals.
pub const GET_TOTALS: &str = "/get-totals";
/// The route for comparing each category's spending against its budget.
pub const GET_CATEGORY_SUMMARY: &str = "/get-category-summary";
/// The route for the most recent incomes and expenses.
pub const GET_TRANSACTION_HISTORY: &str = "/get-transaction-history";
/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/coffee";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/delete-income/{income_id}', '{income_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| param_start + offset + 1);

    format!(
        "{}{id}{}",
        &endpoint_path[..param_start],
        &endpoint_path[param_end..]
    )
}
