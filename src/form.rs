//! Helpers for the loosely typed JSON forms sent by the web client.
//!
//! Browser forms tend to send numbers as strings and omit empty fields, so
//! request bodies are deserialized leniently and validated afterwards.

use serde::Deserialize;

/// A numeric form field that may arrive as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberField {
    /// A JSON number, e.g. `12.5`.
    Number(f64),
    /// A string that should hold a number, e.g. `"12.5"`.
    Text(String),
}

impl NumberField {
    /// The field as a finite number, or `None` if it is not a number.
    pub fn to_finite(&self) -> Option<f64> {
        let number = match self {
            NumberField::Number(number) => *number,
            NumberField::Text(text) => text.trim().parse().ok()?,
        };

        number.is_finite().then_some(number)
    }
}

/// Trim `value` and return it if anything is left.
pub fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();

    (!value.is_empty()).then_some(value)
}
