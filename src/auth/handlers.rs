//! Registration and log-in endpoints.
//!
//! Both endpoints answer with the user's public details and a fresh bearer
//! token, so a client can start making authenticated requests straight away.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error, PasswordHash,
    auth::{Email, JwtKeys, NewUser, User, UserID, create_user, encode_token, get_user_by_email},
    form::non_empty,
};

/// The state needed to register users and log them in.
#[derive(Clone)]
pub struct AuthState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The keys used to sign tokens.
    pub jwt_keys: JwtKeys,
    /// How long issued tokens are valid for.
    pub token_duration: Duration,
    /// The bcrypt cost for hashing new passwords.
    pub password_cost: u32,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            jwt_keys: state.jwt_keys.clone(),
            token_duration: state.token_duration,
            password_cost: state.password_cost,
        }
    }
}

/// The body of a registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// The body of a log-in request.
#[derive(Debug, Deserialize)]
pub struct LogInForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// The response to a successful registration or log-in.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The user's ID.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: Email,
    /// A bearer token for the user.
    pub token: String,
}

impl AuthResponse {
    fn new(user: User, state: &AuthState) -> Result<Self, Error> {
        let token = encode_token(user.id, state.token_duration, &state.jwt_keys)?;

        Ok(Self {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        })
    }
}

/// Handler for registration requests.
///
/// # Errors
///
/// Returns an error if a field is missing, the email is invalid or already
/// registered, or the password is too weak.
pub async fn register_user(
    State(state): State<AuthState>,
    WithRejection(Json(form), _): WithRejection<Json<RegisterForm>, Error>,
) -> Result<(StatusCode, Json<AuthResponse>), Error> {
    let (Some(name), Some(raw_email), Some(password)) = (
        non_empty(&form.name),
        non_empty(&form.email),
        non_empty(&form.password),
    ) else {
        return Err(Error::Validation(
            "Please provide all required fields".to_owned(),
        ));
    };

    let email = Email::new(raw_email)?;
    let password_hash = PasswordHash::from_raw_password(password, state.password_cost)?;

    let user = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        create_user(
            NewUser {
                name: name.to_owned(),
                email,
                password_hash,
            },
            &connection,
        )?
    };

    tracing::info!("registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, &state)?)))
}

/// Handler for log-in requests.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] for an unknown email or a wrong
/// password, without saying which.
pub async fn log_in(
    State(state): State<AuthState>,
    WithRejection(Json(form), _): WithRejection<Json<LogInForm>, Error>,
) -> Result<Json<AuthResponse>, Error> {
    let (Some(raw_email), Some(password)) = (non_empty(&form.email), non_empty(&form.password))
    else {
        return Err(Error::Validation(
            "Please provide email and password".to_owned(),
        ));
    };

    let email = Email::new(raw_email).map_err(|_| Error::InvalidCredentials)?;

    let user = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        get_user_by_email(&email, &connection)?.ok_or(Error::InvalidCredentials)?
    };

    if !user.password_hash.verify(password)? {
        return Err(Error::InvalidCredentials);
    }

    Ok(Json(AuthResponse::new(user, &state)?))
}
