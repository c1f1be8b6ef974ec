//! Category listing endpoint.

use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryState, get_categories},
};

/// Responds with the user's categories, newest first.
pub async fn get_categories_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_categories(user_id, &connection).map(Json)
}
