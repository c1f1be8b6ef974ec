//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a category row.
pub type CategoryId = DatabaseId;

/// The ID of a row in either the income or the expense table.
pub type TransactionId = DatabaseId;
