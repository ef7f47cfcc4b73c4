//! The state shared between route handlers.

use std::sync::{Arc, Mutex};

use jsonwebtoken::{DecodingKey, EncodingKey};
use rusqlite::Connection;

use crate::store::{Record, Store};

#[derive(Clone)]
struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

/// The app's state: the database connection shared by all stores and the
/// keys for signing and verifying auth tokens.
#[derive(Clone)]
pub struct AppState {
    db_connection: Arc<Mutex<Connection>>,
    jwt_keys: JwtKeys,
}

impl AppState {
    /// Create the app state.
    ///
    /// `jwt_secret` is the symmetric secret used to sign and verify the
    /// tokens issued by the sign-in endpoint.
    pub fn new(db_connection: Arc<Mutex<Connection>>, jwt_secret: &str) -> Self {
        Self {
            db_connection,
            jwt_keys: JwtKeys {
                encoding_key: EncodingKey::from_secret(jwt_secret.as_ref()),
                decoding_key: DecodingKey::from_secret(jwt_secret.as_ref()),
            },
        }
    }

    /// Get a data accessor bound to the record kind `T`.
    pub fn store<T: Record>(&self) -> Store<T> {
        Store::new(self.db_connection.clone())
    }

    /// The encoding key for JWTs.
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.jwt_keys.encoding_key
    }

    /// The decoding key for JWTs.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.jwt_keys.decoding_key
    }
}
