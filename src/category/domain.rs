//! Core category domain types and input validation.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::DatabaseID,
    store::{Named, Patchable, Record},
};

/// The maximum number of characters in a category name.
pub const MAX_NAME_LENGTH: usize = 100;

/// The maximum number of characters in a category icon name.
const MAX_ICON_LENGTH: usize = 50;

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is
    /// empty or only whitespace, or an [Error::CategoryNameTooLong] if it has
    /// more than [MAX_NAME_LENGTH] characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else if name.chars().count() > MAX_NAME_LENGTH {
            Err(Error::CategoryNameTooLong(MAX_NAME_LENGTH))
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty, e.g. a value
    /// coming out of the application's database.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
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

/// A category for expense records, e.g. 'Groceries', 'Rent'.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCategory {
    /// The category's ID in the application database.
    pub id: DatabaseID,
    /// The category's unique name.
    pub name: CategoryName,
    /// A free-form description of what belongs in the category.
    pub description: Option<String>,
    /// A display color as a `#RRGGBB` hex string.
    pub color: Option<String>,
    /// A display icon name.
    pub icon: Option<String>,
}

/// A category for income records, e.g. 'Wages', 'Dividends'.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeCategory {
    /// The category's ID in the application database.
    pub id: DatabaseID,
    /// The category's unique name.
    pub name: CategoryName,
    /// A free-form description of what belongs in the category.
    pub description: Option<String>,
    /// A display color as a `#RRGGBB` hex string.
    pub color: Option<String>,
    /// A display icon name.
    pub icon: Option<String>,
}

/// The validated data for creating a category of either kind.
#[derive(Debug, Clone)]
pub struct NewCategory {
    /// The new category's name.
    pub name: CategoryName,
    /// A free-form description of what belongs in the category.
    pub description: Option<String>,
    /// A display color as a `#RRGGBB` hex string.
    pub color: Option<String>,
    /// A display icon name.
    pub icon: Option<String>,
}

/// A validated partial update for a category of either kind.
///
/// Fields left as `None` keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    /// The new name, if it should change.
    pub name: Option<CategoryName>,
    /// The new description, if it should change.
    pub description: Option<String>,
    /// The new color, if it should change.
    pub color: Option<String>,
    /// The new icon, if it should change.
    pub icon: Option<String>,
}

/// The request body for creating a category.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryData {
    /// The name for the new category.
    pub name: String,
    /// A free-form description of what belongs in the category.
    pub description: Option<String>,
    /// A display color as a `#RRGGBB` hex string.
    pub color: Option<String>,
    /// A display icon name.
    pub icon: Option<String>,
}

impl CategoryData {
    /// Validate the request body into the data for a new category.
    ///
    /// # Errors
    ///
    /// This function will return an error if the name, color, or icon fail
    /// validation.
    pub fn validate(self) -> Result<NewCategory, Error> {
        Ok(NewCategory {
            name: CategoryName::new(&self.name)?,
            description: self.description,
            color: self.color.map(validate_color).transpose()?,
            icon: self.icon.map(validate_icon).transpose()?,
        })
    }
}

/// The request body for partially updating a category.
///
/// Keys absent from the JSON body (or set to `null`) leave the stored value
/// untouched.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CategoryPatchData {
    /// The new name, if it should change.
    pub name: Option<String>,
    /// The new description, if it should change.
    pub description: Option<String>,
    /// The new color, if it should change.
    pub color: Option<String>,
    /// The new icon, if it should change.
    pub icon: Option<String>,
}

impl CategoryPatchData {
    /// Validate the request body into a category patch.
    ///
    /// # Errors
    ///
    /// This function will return an error if a present name, color, or icon
    /// fails validation.
    pub fn validate(self) -> Result<CategoryPatch, Error> {
        Ok(CategoryPatch {
            name: self.name.as_deref().map(CategoryName::new).transpose()?,
            description: self.description,
            color: self.color.map(validate_color).transpose()?,
            icon: self.icon.map(validate_icon).transpose()?,
        })
    }
}

fn validate_color(color: String) -> Result<String, Error> {
    let mut chars = color.chars();

    let starts_with_hash = chars.next() == Some('#');
    let hex_digits: Vec<char> = chars.collect();

    if starts_with_hash && hex_digits.len() == 6 && hex_digits.iter().all(char::is_ascii_hexdigit) {
        Ok(color)
    } else {
        Err(Error::InvalidColor(color))
    }
}

fn validate_icon(icon: String) -> Result<String, Error> {
    if icon.chars().count() > MAX_ICON_LENGTH {
        Err(Error::IconTooLong(MAX_ICON_LENGTH))
    } else {
        Ok(icon)
    }
}

/// The bounds shared by the two category record kinds, letting one set of
/// endpoint handlers serve both.
pub trait CategoryRecord:
    Record<New = NewCategory>
    + Patchable<Patch = CategoryPatch>
    + Named
    + Serialize
    + Send
    + Sync
    + 'static
{
}

impl CategoryRecord for ExpenseCategory {}
impl CategoryRecord for IncomeCategory {}
