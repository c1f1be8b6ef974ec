//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use email_address::EmailAddress;
use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from category and transaction IDs, which
/// matters here because every query is scoped by its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A validated, lowercase email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Trim, lowercase and validate `raw_email`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidEmail] if `raw_email` is not a valid address.
    pub fn new(raw_email: &str) -> Result<Self, Error> {
        let email = raw_email.trim().to_lowercase();

        if EmailAddress::is_valid(&email) {
            Ok(Self(email))
        } else {
            Err(Error::InvalidEmail(raw_email.to_owned()))
        }
    }

    /// Wrap an email read back from the database.
    pub fn new_unchecked(raw_email: &str) -> Self {
        Self(raw_email.to_owned())
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The address the user logs in with.
    pub email: Email,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// The data needed to register a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// The user's display name.
    pub name: String,
    /// The address the user logs in with, unique across users.
    pub email: Email,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns [Error::DuplicateEmail] if the email is already registered, or
/// [Error::SqlError] if some other SQL error occurred.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    connection
        .execute(
            "INSERT INTO user (name, email, password) VALUES (?1, ?2, ?3)",
            (
                &new_user.name,
                new_user.email.as_ref(),
                new_user.password_hash.as_ref(),
            ),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateEmail,
            error => error.into(),
        })?;

    Ok(User {
        id: UserID::new(connection.last_insert_rowid()),
        name: new_user.name,
        email: new_user.email,
        password_hash: new_user.password_hash,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, password FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Get the user registered with `email`, if any.
pub fn get_user_by_email(email: &Email, connection: &Connection) -> Result<Option<User>, Error> {
    connection
        .prepare("SELECT id, name, email, password FROM user WHERE email = :email")?
        .query_row(&[(":email", email.as_ref())], map_row)
        .optional()
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_email: String = row.get(2)?;
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        name: row.get(1)?,
        email: Email::new_unchecked(&raw_email),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{Error, PasswordHash};

    use super::{
        Email, NewUser, UserID, create_user, create_user_table, get_user_by_email, get_user_by_id,
    };

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test".to_owned(),
            email: Email::new(email).unwrap(),
            password_hash: PasswordHash::new_unchecked("hunter2"),
        }
    }

    #[test]
    fn email_is_normalised() {
        let email = Email::new("  Foo@Bar.Baz ").unwrap();

        assert_eq!(email.as_ref(), "foo@bar.baz");
    }

    #[test]
    fn email_without_at_is_rejected() {
        assert!(matches!(
            Email::new("foobar.baz"),
            Err(Error::InvalidEmail(_))
        ));
        assert!(matches!(Email::new(""), Err(Error::InvalidEmail(_))));
    }

    #[test]
    fn insert_user_succeeds() {
        let connection = get_db_connection();

        let inserted_user = create_user(new_user("foo@bar.baz"), &connection).unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.email.as_ref(), "foo@bar.baz");
    }

    #[test]
    fn insert_duplicate_email_fails() {
        let connection = get_db_connection();
        create_user(new_user("foo@bar.baz"), &connection).unwrap();

        let result = create_user(new_user("foo@bar.baz"), &connection);

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let connection = get_db_connection();

        assert_eq!(
            get_user_by_id(UserID::new(42), &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn get_user_by_id_and_email_agree() {
        let connection = get_db_connection();
        let test_user = create_user(new_user("foo@bar.baz"), &connection).unwrap();

        let by_id = get_user_by_id(test_user.id, &connection).unwrap();
        let by_email = get_user_by_email(&test_user.email, &connection).unwrap();

        assert_eq!(by_id, test_user);
        assert_eq!(by_email, Some(test_user));
    }

    #[test]
    fn get_user_by_unknown_email_is_none() {
        let connection = get_db_connection();

        let user = get_user_by_email(&Email::new("nobody@bar.baz").unwrap(), &connection);

        assert_eq!(user, Ok(None));
    }
}
