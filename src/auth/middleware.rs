//! Authentication middleware that validates bearer tokens.

use std::sync::{Arc, Mutex};

use axum::{
    RequestPartsExt,
    extract::{FromRef, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{JwtKeys, UserID, decode_token, get_user_by_id},
};

/// The state needed for the auth middleware.
#[derive(Clone)]
pub struct AuthGuardState {
    /// The keys used to verify tokens.
    pub jwt_keys: JwtKeys,
    /// The database connection, used to check that the user still exists.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthGuardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            jwt_keys: state.jwt_keys.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token.
///
/// If the token is valid and belongs to a registered user, the user ID is
/// placed into the request extensions and the request is executed normally.
/// Otherwise a 401 response is returned and the handler never runs.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(
    State(state): State<AuthGuardState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let user_id = match authenticate(&mut parts, &state).await {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    parts.extensions.insert(user_id);
    next.run(Request::from_parts(parts, body)).await
}

async fn authenticate(parts: &mut Parts, state: &AuthGuardState) -> Result<UserID, Error> {
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|rejection| {
            if rejection.is_missing() {
                Error::MissingToken
            } else {
                Error::InvalidToken
            }
        })?;

    let claims = decode_token(bearer.token(), &state.jwt_keys)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    match get_user_by_id(claims.user_id, &connection) {
        Ok(user) => Ok(user.id),
        Err(Error::NotFound) => {
            tracing::warn!("token for unknown user {}", claims.user_id);
            Err(Error::InvalidToken)
        }
        Err(error) => Err(error),
    }
}
