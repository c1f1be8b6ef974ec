//! Serde formats for the dates in API requests and responses.
//!
//! Dates are written as `YYYY-MM-DD`. Timestamps use
//! [time::serde::rfc3339] directly.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

/// Calendar date format, e.g. "2024-03-05".
pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(pub date, Date, "[year]-[month]-[day]");
