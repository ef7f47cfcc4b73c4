//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid email/password combination.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A category name longer than the schema allows.
    #[error("category name cannot be longer than {0} characters")]
    CategoryNameTooLong(usize),

    /// A transaction description longer than the schema allows.
    #[error("description cannot be longer than {0} characters")]
    DescriptionTooLong(usize),

    /// A category color that is not a `#RRGGBB` hex string.
    #[error("\"{0}\" is not a valid hex color")]
    InvalidColor(String),

    /// A category icon name longer than the schema allows.
    #[error("icon name cannot be longer than {0} characters")]
    IconTooLong(usize),

    /// A transaction amount that is not a positive number.
    ///
    /// Amounts record money spent or received, so zero and negative values
    /// are rejected along with NaN and infinities.
    #[error("{0} is not a valid amount, amounts must be positive")]
    InvalidAmount(f64),

    /// A string that could not be parsed as an email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// A registration password below the minimum length.
    #[error("password must be at least {0} characters long")]
    PasswordTooShort(usize),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server,
    /// clients receive a generic internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email already belongs to a registered user.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// The category name is already taken within the same category kind.
    #[error("a category with that name already exists")]
    DuplicateCategoryName,

    /// A query was given an id that does not refer to an existing row,
    /// e.g. creating an expense against a deleted category.
    #[error("a referenced record does not exist")]
    InvalidForeignKey,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The authenticated user does not own the record they tried to modify.
    #[error("cannot modify another user's records")]
    Forbidden,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 787 =>
            {
                Error::InvalidForeignKey
            }
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("category.name") =>
            {
                Error::DuplicateCategoryName
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::EmptyCategoryName
            | Error::CategoryNameTooLong(_)
            | Error::DescriptionTooLong(_)
            | Error::InvalidColor(_)
            | Error::IconTooLong(_)
            | Error::InvalidAmount(_)
            | Error::InvalidEmail(_)
            | Error::PasswordTooShort(_)
            | Error::DuplicateEmail
            | Error::DuplicateCategoryName
            | Error::InvalidForeignKey => StatusCode::BAD_REQUEST,
            Error::HashingError(_) | Error::DatabaseLockError | Error::SqlError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Internal errors are not meant to be shown to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
