//! Request-level checks shared by the endpoint handlers.
//!
//! Each check returns a `Result` that the caller must branch on (usually via
//! `?`), so a failed check cannot be silently dropped.

use crate::{
    Error,
    category::CategoryName,
    store::{Named, Owned, Store},
    user::UserID,
};

/// Resolve an optional lookup result, failing with [Error::NotFound] when the
/// record is absent.
pub fn require_found<T>(record: Option<T>) -> Result<T, Error> {
    record.ok_or(Error::NotFound)
}

/// Ensure `record` is owned by the user with `user_id`, failing with
/// [Error::Forbidden] otherwise.
pub fn require_owner<T: Owned>(record: T, user_id: UserID) -> Result<T, Error> {
    if record.owner() == user_id {
        Ok(record)
    } else {
        Err(Error::Forbidden)
    }
}

/// Ensure no category of the kind served by `store` already uses `name`,
/// failing with [Error::DuplicateCategoryName] otherwise.
///
/// Note that two concurrent requests can both pass this check before either
/// commits; the UNIQUE constraint on the `name` column rejects the loser at
/// insert time with the same error.
pub fn require_unique_name<T: Named>(store: &Store<T>, name: &CategoryName) -> Result<(), Error> {
    if store.get_id_by_name(name.as_ref())?.is_some() {
        Err(Error::DuplicateCategoryName)
    } else {
        Ok(())
    }
}
