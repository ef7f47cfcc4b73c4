//! The server's runtime configuration.

use crate::{email::Email, password::RawPassword};

/// Everything the server binary needs to start: assembled once from argv and
/// the environment, then passed down to constructors. There is no global
/// settings object.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// File path to the application SQLite database.
    pub db_path: String,
    /// The port to serve the API from.
    pub port: u16,
    /// The symmetric secret used to sign and verify auth tokens.
    pub jwt_secret: String,
    /// Credentials for the first superuser, created at startup if the email
    /// is not registered yet.
    pub superuser: Option<SuperuserCredentials>,
}

/// Bootstrap credentials for the first superuser.
#[derive(Debug, Clone)]
pub struct SuperuserCredentials {
    /// The superuser's email address.
    pub email: Email,
    /// The superuser's password.
    pub password: RawPassword,
}
