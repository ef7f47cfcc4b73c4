//! Core income domain types and input validation.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error, amount::Amount, database_id::DatabaseID, expense::validate_description, user::UserID,
};

/// Money received by a user.
///
/// Unlike an [crate::expense::Expense], an income must always be recorded
/// against a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    /// The income's ID in the application database.
    pub id: DatabaseID,
    /// How much money was received.
    pub amount: Amount,
    /// Where the money came from.
    pub description: Option<String>,
    /// The income category this belongs to.
    pub category_id: DatabaseID,
    /// The ID of the user that recorded the income.
    pub user_id: UserID,
    /// The day the money was received.
    pub date: Date,
    /// When the record was created.
    pub created_at: OffsetDateTime,
}

/// The validated data for creating an income.
#[derive(Debug, Clone)]
pub struct NewIncome {
    /// How much money was received.
    pub amount: Amount,
    /// Where the money came from.
    pub description: Option<String>,
    /// The income category this belongs to.
    pub category_id: DatabaseID,
    /// The day the money was received.
    pub date: Date,
}

/// A validated partial update for an income.
///
/// Fields left as `None` keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct IncomePatch {
    /// The new amount, if it should change.
    pub amount: Option<Amount>,
    /// The new description, if it should change.
    pub description: Option<String>,
    /// The new category, if it should change.
    pub category_id: Option<DatabaseID>,
    /// The new date, if it should change.
    pub date: Option<Date>,
}

/// The request body for creating an income.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncomeData {
    /// How much money was received. Must be positive.
    pub amount: f64,
    /// Where the money came from.
    pub description: Option<String>,
    /// The income category to record against.
    pub category_id: DatabaseID,
    /// The day the money was received. Defaults to today.
    pub date: Option<Date>,
}

impl IncomeData {
    /// Validate the request body into the data for a new income.
    ///
    /// # Errors
    ///
    /// This function will return an error if the amount is not positive or
    /// the description is too long.
    pub fn validate(self) -> Result<NewIncome, Error> {
        Ok(NewIncome {
            amount: Amount::new(self.amount)?,
            description: self.description.map(validate_description).transpose()?,
            category_id: self.category_id,
            date: self.date.unwrap_or_else(|| OffsetDateTime::now_utc().date()),
        })
    }
}

/// The request body for partially updating an income.
///
/// Keys absent from the JSON body (or set to `null`) leave the stored value
/// untouched.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct IncomePatchData {
    /// The new amount, if it should change.
    pub amount: Option<f64>,
    /// The new description, if it should change.
    pub description: Option<String>,
    /// The new category, if it should change.
    pub category_id: Option<DatabaseID>,
    /// The new date, if it should change.
    pub date: Option<Date>,
}

impl IncomePatchData {
    /// Validate the request body into an income patch.
    ///
    /// # Errors
    ///
    /// This function will return an error if a present amount is not positive
    /// or a present description is too long.
    pub fn validate(self) -> Result<IncomePatch, Error> {
        Ok(IncomePatch {
            amount: self.amount.map(Amount::new).transpose()?,
            description: self.description.map(validate_description).transpose()?,
            category_id: self.category_id,
            date: self.date,
        })
    }
}

#[cfg(test)]
mod income_data_tests {
    use time::OffsetDateTime;

    use crate::Error;

    use super::IncomeData;

    fn income_data(amount: f64) -> IncomeData {
        IncomeData {
            amount,
            description: None,
            category_id: 1,
            date: None,
        }
    }

    #[test]
    fn validate_applies_date_default() {
        let new_income = income_data(1000.0).validate().unwrap();

        assert_eq!(new_income.date, OffsetDateTime::now_utc().date());
        assert_eq!(new_income.category_id, 1);
    }

    #[test]
    fn validate_rejects_non_positive_amount() {
        assert!(matches!(
            income_data(0.0).validate(),
            Err(Error::InvalidAmount(_))
        ));
        assert!(matches!(
            income_data(-1000.0).validate(),
            Err(Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn validate_accepts_one_cent() {
        assert!(income_data(0.01).validate().is_ok());
    }
}
