//! Core category domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    database_id::CategoryId,
    form::{NumberField, non_empty},
    transaction::TransactionKind,
};

/// The longest category name allowed, in characters.
pub const MAX_CATEGORY_NAME_LENGTH: usize = 50;

const MISSING_FIELDS: &str = "Name and type are required";

/// A validated, non-empty category name of at most [MAX_CATEGORY_NAME_LENGTH] characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::Validation] if `name` is empty or
    /// longer than [MAX_CATEGORY_NAME_LENGTH] characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = non_empty(name).ok_or_else(|| Error::Validation(MISSING_FIELDS.to_owned()))?;

        if name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
            return Err(Error::Validation(format!(
                "Category name cannot exceed {MAX_CATEGORY_NAME_LENGTH} characters"
            )));
        }

        Ok(Self(name.to_owned()))
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is a valid name, e.g. because
    /// it was read back from the database.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How much the user plans to earn or spend in a category each month.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBudget(f64);

impl MonthlyBudget {
    /// Create a monthly budget.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidBudget] if `amount` is
    /// negative, NaN or infinite.
    pub fn new(amount: f64) -> Result<Self, Error> {
        if amount.is_finite() && amount >= 0.0 {
            Ok(Self(amount))
        } else {
            Err(Error::InvalidBudget)
        }
    }

    /// The budget as a plain number.
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

/// A user-defined grouping for income or expense transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The name of the category, unique among its owner's categories.
    pub name: CategoryName,
    /// Whether the category collects incomes or expenses.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The planned amount per month.
    pub monthly_budget: MonthlyBudget,
    /// The user who owns the category.
    pub owner: UserID,
    /// When the category was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The validated fields of a category that is being created or updated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The name of the category.
    pub name: CategoryName,
    /// Whether the category collects incomes or expenses.
    pub kind: TransactionKind,
    /// The planned amount per month.
    pub monthly_budget: MonthlyBudget,
}

/// The body of a request to create or update a category.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub monthly_budget: Option<NumberField>,
}

impl CategoryForm {
    /// Check the form and convert it into a [NewCategory].
    ///
    /// A missing budget defaults to zero.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] if the name or type is missing or invalid,
    /// and [Error::InvalidBudget] if the budget is not a non-negative number.
    pub fn validate(self) -> Result<NewCategory, Error> {
        if non_empty(&self.kind).is_none() {
            return Err(Error::Validation(MISSING_FIELDS.to_owned()));
        }

        let name = CategoryName::new(&self.name)?;
        let kind = self.kind.parse()?;
        let monthly_budget = match self.monthly_budget {
            None => MonthlyBudget::default(),
            Some(field) => MonthlyBudget::new(field.to_finite().ok_or(Error::InvalidBudget)?)?,
        };

        Ok(NewCategory {
            name,
            kind,
            monthly_budget,
        })
    }
}
