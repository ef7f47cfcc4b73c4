//! Core expense domain types and input validation.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, amount::Amount, database_id::DatabaseID, user::UserID};

/// The maximum number of characters in a transaction description, shared
/// with income records.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Money spent by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The expense's ID in the application database.
    pub id: DatabaseID,
    /// How much money was spent.
    pub amount: Amount,
    /// What the money was spent on.
    pub description: Option<String>,
    /// The expense category this belongs to, if any.
    pub category_id: Option<DatabaseID>,
    /// The ID of the user that recorded the expense.
    pub user_id: UserID,
    /// The day the money was spent.
    pub date: Date,
    /// When the record was created.
    pub created_at: OffsetDateTime,
    /// Whether the expense has been paid.
    pub is_paid: bool,
}

/// The validated data for creating an expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// How much money was spent.
    pub amount: Amount,
    /// What the money was spent on.
    pub description: Option<String>,
    /// The expense category this belongs to, if any.
    pub category_id: Option<DatabaseID>,
    /// The day the money was spent.
    pub date: Date,
    /// Whether the expense has been paid.
    pub is_paid: bool,
}

/// A validated partial update for an expense.
///
/// Fields left as `None` keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    /// The new amount, if it should change.
    pub amount: Option<Amount>,
    /// The new description, if it should change.
    pub description: Option<String>,
    /// The new category, if it should change.
    pub category_id: Option<DatabaseID>,
    /// The new date, if it should change.
    pub date: Option<Date>,
    /// The new paid flag, if it should change.
    pub is_paid: Option<bool>,
}

/// The request body for creating an expense.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpenseData {
    /// How much money was spent. Must be positive.
    pub amount: f64,
    /// What the money was spent on.
    pub description: Option<String>,
    /// The expense category to record against.
    pub category_id: Option<DatabaseID>,
    /// The day the money was spent. Defaults to today.
    pub date: Option<Date>,
    /// Whether the expense has been paid. Defaults to true.
    pub is_paid: Option<bool>,
}

impl ExpenseData {
    /// Validate the request body into the data for a new expense.
    ///
    /// # Errors
    ///
    /// This function will return an error if the amount is not positive or
    /// the description is too long.
    pub fn validate(self) -> Result<NewExpense, Error> {
        Ok(NewExpense {
            amount: Amount::new(self.amount)?,
            description: self.description.map(validate_description).transpose()?,
            category_id: self.category_id,
            date: self.date.unwrap_or_else(|| OffsetDateTime::now_utc().date()),
            is_paid: self.is_paid.unwrap_or(true),
        })
    }
}

/// The request body for partially updating an expense.
///
/// Keys absent from the JSON body (or set to `null`) leave the stored value
/// untouched.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ExpensePatchData {
    /// The new amount, if it should change.
    pub amount: Option<f64>,
    /// The new description, if it should change.
    pub description: Option<String>,
    /// The new category, if it should change.
    pub category_id: Option<DatabaseID>,
    /// The new date, if it should change.
    pub date: Option<Date>,
    /// The new paid flag, if it should change.
    pub is_paid: Option<bool>,
}

impl ExpensePatchData {
    /// Validate the request body into an expense patch.
    ///
    /// # Errors
    ///
    /// This function will return an error if a present amount is not positive
    /// or a present description is too long.
    pub fn validate(self) -> Result<ExpensePatch, Error> {
        Ok(ExpensePatch {
            amount: self.amount.map(Amount::new).transpose()?,
            description: self.description.map(validate_description).transpose()?,
            category_id: self.category_id,
            date: self.date,
            is_paid: self.is_paid,
        })
    }
}

pub(crate) fn validate_description(description: String) -> Result<String, Error> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        Err(Error::DescriptionTooLong(MAX_DESCRIPTION_LENGTH))
    } else {
        Ok(description)
    }
}
