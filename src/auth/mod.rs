//! User accounts, password hashing and bearer-token authentication.

mod handlers;
mod middleware;
mod password;
mod token;
mod user;

pub use handlers::{log_in, register_user};
pub use middleware::auth_guard;
pub use password::{PasswordHash, ValidatedPassword};
pub use token::{DEFAULT_TOKEN_DURATION, JwtKeys};
pub use user::{Email, NewUser, User, UserID, create_user, create_user_table};

pub(crate) use token::{decode_token, encode_token};
pub(crate) use user::{get_user_by_email, get_user_by_id};
