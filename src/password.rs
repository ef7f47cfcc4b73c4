//! Password newtypes wrapping bcrypt hashing and verification.

use std::fmt::Display;

use bcrypt::{DEFAULT_COST, hash, verify};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The minimum number of characters for a new password.
pub const MIN_PASSWORD_LENGTH: usize = 14;

/// A password that has been validated, but not yet hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPassword(String);

impl RawPassword {
    /// Create a new password from a string.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::PasswordTooShort] if the password
    /// has fewer than [MIN_PASSWORD_LENGTH] characters.
    pub fn new(raw_password_string: String) -> Result<Self, Error> {
        if raw_password_string.chars().count() < MIN_PASSWORD_LENGTH {
            Err(Error::PasswordTooShort(MIN_PASSWORD_LENGTH))
        } else {
            Ok(Self(raw_password_string))
        }
    }

    /// Create a new `RawPassword` without any validation.
    ///
    /// This is intended for tests where costly validation is unnecessary.
    pub fn new_unchecked(raw_password_string: &str) -> Self {
        Self(raw_password_string.to_string())
    }
}

impl AsRef<str> for RawPassword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<[u8]> for RawPassword {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// A bcrypt password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a validated password.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::HashingError] if the underlying
    /// bcrypt library fails.
    pub fn new(raw_password: &RawPassword) -> Result<Self, Error> {
        hash(raw_password, DEFAULT_COST)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Create a new `PasswordHash` without hashing or validation.
    ///
    /// This function should only be called on strings coming out of a trusted
    /// source such as the application's database.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Check that `raw_password` matches the stored password.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::HashingError] if the stored hash
    /// could not be parsed by the bcrypt library.
    pub fn verify(&self, raw_password: &RawPassword) -> Result<bool, Error> {
        verify(raw_password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
