//! Category deletion endpoint.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use crate::{
    Error, auth::UserID, category::CategoryState, coordinator, database_id::CategoryId,
};

/// Handle a request to delete a category.
///
/// A category that still has incomes or expenses filed under it is kept and
/// the request fails with a 400 response.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(category_id), _): WithRejection<Path<CategoryId>, Error>,
) -> Result<Json<Value>, Error> {
    let mut connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    coordinator::delete_category(user_id, category_id, &mut connection)?;

    Ok(Json(json!({ "message": "Category deleted" })))
}
