//! Category creation endpoint.

use axum::{Extension, Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryForm, CategoryState},
    coordinator,
};

/// Handle a request to create a category, responds with the new category.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Json(form), _): WithRejection<Json<CategoryForm>, Error>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let new_category = form.validate()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = coordinator::create_category(user_id, new_category, &connection)?;

    Ok((StatusCode::CREATED, Json(category)))
}
