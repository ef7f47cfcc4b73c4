//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::DatabaseID,
    email::Email,
    password::{PasswordHash, RawPassword},
    store::{Field, InsertFields, Record, Store},
};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to
/// better compile time errors.
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

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's email address.
    pub email: Email,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// Whether the user may manage categories.
    pub is_superuser: bool,
}

/// The data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// The new user's email address.
    pub email: Email,
    /// The new user's password hash.
    pub password_hash: PasswordHash,
    /// Whether the new user may manage categories.
    pub is_superuser: bool,
}

impl Record for User {
    const TABLE: &'static str = "user";
    const COLUMNS: &'static [&'static str] = &["id", "email", "password", "is_superuser"];

    type New = NewUser;

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let raw_id = row.get(0)?;
        let raw_email: String = row.get(1)?;
        let raw_password_hash: String = row.get(2)?;
        let is_superuser = row.get(3)?;

        Ok(Self {
            id: UserID::new(raw_id),
            email: Email::new_unchecked(&raw_email),
            password_hash: PasswordHash::new_unchecked(&raw_password_hash),
            is_superuser,
        })
    }

    fn id(&self) -> DatabaseID {
        self.id.as_i64()
    }
}

impl InsertFields for NewUser {
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("email", self.email.to_string()),
            Field::new("password", self.password_hash.to_string()),
            Field::new("is_superuser", self.is_superuser),
        ]
    }
}

impl Store<User> {
    /// Get the user with `email`, or `None` if no such user is registered.
    ///
    /// # Errors
    ///
    /// This function will return an error if there is an SQL error.
    pub fn get_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        self.lock()?
            .prepare(&format!("{} WHERE email = :email", Self::select_sql()))?
            .query_row(&[(":email", &email)], User::map_row)
            .optional()
            .map_err(|error| error.into())
    }
}

/// The public view of a user, returned from the registration endpoint.
///
/// Deliberately excludes the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's email address.
    pub email: Email,
    /// Whether the user may manage categories.
    pub is_superuser: bool,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_superuser: user.is_superuser,
        }
    }
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
                email TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL,
                is_superuser INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    Ok(())
}

/// Create the first superuser if `email` is not registered yet.
///
/// This is run once at server startup with credentials from the application
/// config so that a fresh deployment has an account that can manage
/// categories. Registration through the API always creates regular users.
///
/// # Errors
///
/// This function will return an error if hashing the password fails or there
/// is an SQL error.
pub fn ensure_superuser(
    store: &Store<User>,
    email: &Email,
    password: &RawPassword,
) -> Result<(), Error> {
    if store.get_by_email(email.as_ref())?.is_some() {
        tracing::debug!("superuser {email} already exists, skipping bootstrap");
        return Ok(());
    }

    let new_user = NewUser {
        email: email.clone(),
        password_hash: PasswordHash::new(password)?,
        is_superuser: true,
    };
    let user = store.create(&new_user, None)?;

    tracing::info!("created superuser {} with id {}", user.email, user.id);

    Ok(())
}
