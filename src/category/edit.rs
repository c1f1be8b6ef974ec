//! Category update endpoint.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryForm, CategoryState},
    coordinator,
    database_id::CategoryId,
};

/// Handle a request to update a category, responds with the updated category.
///
/// Renaming a category also renames it on every income and expense that
/// refers to it.
pub async fn update_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(category_id), _): WithRejection<Path<CategoryId>, Error>,
    WithRejection(Json(form), _): WithRejection<Json<CategoryForm>, Error>,
) -> Result<Json<Category>, Error> {
    let changes = form.validate()?;

    let mut connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    coordinator::update_category(user_id, category_id, changes, &mut connection).map(Json)
}
