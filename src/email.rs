//! A validated email address newtype.

use std::fmt::Display;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::Error;

/// An email address that has passed syntactic validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create and validate an email address.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidEmail] if `raw_email` is
    /// not a valid email address.
    pub fn new(raw_email: &str) -> Result<Self, Error> {
        if EmailAddress::is_valid(raw_email) {
            Ok(Self(raw_email.to_string()))
        } else {
            Err(Error::InvalidEmail(raw_email.to_string()))
        }
    }

    /// Create a new `Email` without any validation.
    ///
    /// The caller should ensure that `raw_email` is a correctly formatted
    /// email address, e.g. a value coming out of the application's database.
    /// For emails coming from the user this function should **not** be used,
    /// instead use the checked version.
    pub fn new_unchecked(raw_email: &str) -> Self {
        Self(raw_email.to_string())
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod email_tests {
    use crate::Error;

    use super::Email;

    #[test]
    fn create_email_succeeds() {
        let email = Email::new("foo@bar.baz");

        assert!(email.is_ok())
    }

    #[test]
    fn create_email_fails_with_no_at_symbol() {
        let email = Email::new("foobar.baz");

        assert_eq!(email, Err(Error::InvalidEmail("foobar.baz".to_string())));
    }

    #[test]
    fn create_email_fails_with_empty_string() {
        let email = Email::new("");

        assert!(matches!(email, Err(Error::InvalidEmail(_))));
    }
}
