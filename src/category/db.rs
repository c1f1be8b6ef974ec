//! Database operations for categories.
//!
//! These functions only touch the category table. Changes that must also be
//! reflected in the income and expense tables go through the
//! [coordinator](crate::coordinator).

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryName, MonthlyBudget, NewCategory},
    database_id::CategoryId,
};

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            monthly_budget REAL NOT NULL DEFAULT 0 CHECK (monthly_budget >= 0),
            user_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE(user_id, name)
        );",
    )?;

    Ok(())
}

/// Create a category for `owner` and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::DuplicateCategoryName] if `owner` already has a category
/// with the same name.
pub fn create_category(
    owner: UserID,
    new_category: NewCategory,
    created_at: OffsetDateTime,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "INSERT INTO category (name, type, monthly_budget, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, name, type, monthly_budget, user_id, created_at",
        )?
        .query_row(
            (
                new_category.name.as_ref(),
                new_category.kind.as_str(),
                new_category.monthly_budget.as_f64(),
                owner.as_i64(),
                created_at,
            ),
            map_row,
        )
        .map_err(|error| map_unique_violation(error, &new_category.name))
}

/// Retrieve one of `owner`'s categories by ID.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if there is no such category or it
/// belongs to another user.
pub fn get_category(
    owner: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, name, type, monthly_budget, user_id, created_at
             FROM category WHERE id = ?1 AND user_id = ?2",
        )?
        .query_row((category_id, owner.as_i64()), map_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::CategoryNotFound,
            error => error.into(),
        })
}

/// Retrieve `owner`'s category called `name`, if any.
///
/// Names are compared exactly, so "Food" and "food" are different categories.
pub fn get_category_by_name(
    owner: UserID,
    name: &str,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, type, monthly_budget, user_id, created_at
             FROM category WHERE name = ?1 AND user_id = ?2",
        )?
        .query_row((name, owner.as_i64()), map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve all of `owner`'s categories, newest first.
pub fn get_categories(owner: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, type, monthly_budget, user_id, created_at
             FROM category WHERE user_id = :user_id
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map(&[(":user_id", &owner.as_i64())], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the fields of one of `owner`'s categories and return the result.
///
/// Transactions that refer to the old name are left untouched.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if there is no such category, or
/// [Error::DuplicateCategoryName] if the new name is taken by another of
/// `owner`'s categories.
pub fn update_category(
    owner: UserID,
    category_id: CategoryId,
    changes: &NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "UPDATE category SET name = ?1, type = ?2, monthly_budget = ?3
             WHERE id = ?4 AND user_id = ?5
             RETURNING id, name, type, monthly_budget, user_id, created_at",
        )?
        .query_row(
            (
                changes.name.as_ref(),
                changes.kind.as_str(),
                changes.monthly_budget.as_f64(),
                category_id,
                owner.as_i64(),
            ),
            map_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::CategoryNotFound,
            error => map_unique_violation(error, &changes.name),
        })
}

/// Delete one of `owner`'s categories.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if there is no such category.
pub fn delete_category(
    owner: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, owner.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::CategoryNotFound);
    }

    Ok(())
}

fn map_unique_violation(error: rusqlite::Error, name: &CategoryName) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateCategoryName(name.to_string()),
        error => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(1)?;
    let raw_kind: String = row.get(2)?;
    let kind = raw_kind.parse().map_err(|error: Error| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(error))
    })?;
    let raw_budget: f64 = row.get(3)?;

    Ok(Category {
        id: row.get(0)?,
        name: CategoryName::new_unchecked(&raw_name),
        kind,
        monthly_budget: MonthlyBudget::new(raw_budget).unwrap_or_default(),
        owner: UserID::new(row.get(4)?),
        created_at: row.get(5)?,
    })
}
