//! The generic record accessor.
//!
//! [Store] is a repository bound to a single record kind. Every resource in
//! the application (users, categories, expenses, incomes) persists through
//! the same five operations, so the SQL for those operations is written once
//! here and parameterized by the [Record] trait rather than repeated per
//! table.

use std::{
    marker::PhantomData,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{
    Connection, OptionalExtension, Row, Transaction, TransactionBehavior, params_from_iter,
    types::Value,
};

use crate::{Error, database_id::DatabaseID, user::UserID};

/// A single column/value binding for an INSERT or UPDATE statement.
pub struct Field {
    column: &'static str,
    value: Value,
}

impl Field {
    /// Bind `value` to `column`.
    pub fn new(column: &'static str, value: impl Into<Value>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

/// The data required to insert a new record.
///
/// Implementations return one [Field] per column, excluding `id` (assigned
/// by the database) and `user_id` (stamped by [Store::create] when an owner
/// is given).
pub trait InsertFields {
    /// The column/value pairs to insert.
    fn fields(&self) -> Vec<Field>;
}

/// A partial update for a record.
///
/// Implementations return a [Field] for each column that was explicitly set
/// in the update payload and nothing for the rest, which is what gives
/// [Store::update] its partial-update semantics.
pub trait PatchFields {
    /// The column/value pairs to overwrite.
    fn fields(&self) -> Vec<Field>;
}

/// Binds a record kind to its SQL table.
pub trait Record: Sized {
    /// The SQL table backing this record kind.
    const TABLE: &'static str;

    /// The columns to select, in the order expected by [Record::map_row].
    const COLUMNS: &'static [&'static str];

    /// The data needed to create a record of this kind.
    type New: InsertFields;

    /// Convert a row containing [Record::COLUMNS] into a record.
    ///
    /// # Errors
    ///
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type.
    fn map_row(row: &Row) -> Result<Self, rusqlite::Error>;

    /// The record's database ID.
    fn id(&self) -> DatabaseID;
}

/// A record kind that supports partial updates.
pub trait Patchable: Record {
    /// The patch type for partial updates of this kind.
    type Patch: PatchFields;
}

/// A record kind stamped with the ID of the user that created it.
pub trait Owned: Record {
    /// The ID of the user that owns the record.
    fn owner(&self) -> UserID;
}

/// A record kind with a unique, human-readable `name` column.
pub trait Named: Record {}

/// A data accessor bound to the record kind `T`.
///
/// Cheap to clone and to construct: the underlying database connection is
/// shared behind an `Arc`.
#[derive(Debug)]
pub struct Store<T> {
    connection: Arc<Mutex<Connection>>,
    marker: PhantomData<T>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            marker: PhantomData,
        }
    }
}

impl<T: Record> Store<T> {
    /// Create a store over a shared database connection.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            connection,
            marker: PhantomData,
        }
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLockError)
    }

    pub(crate) fn select_sql() -> String {
        format!("SELECT {} FROM {}", T::COLUMNS.join(", "), T::TABLE)
    }

    /// Get a record by its ID, or `None` if no such record exists.
    ///
    /// A missing record is not an error at this level, the caller decides
    /// whether absence is a failure (see [crate::validate::require_found]).
    ///
    /// # Errors
    ///
    /// This function will return an error if there is an SQL error.
    pub fn get(&self, id: DatabaseID) -> Result<Option<T>, Error> {
        self.lock()?
            .prepare(&format!("{} WHERE id = :id", Self::select_sql()))?
            .query_row(&[(":id", &id)], T::map_row)
            .optional()
            .map_err(|error| error.into())
    }

    /// Get all records of this kind, in no particular order.
    ///
    /// # Errors
    ///
    /// This function will return an error if there is an SQL error.
    pub fn get_all(&self) -> Result<Vec<T>, Error> {
        self.lock()?
            .prepare(&Self::select_sql())?
            .query_map([], |row| T::map_row(row))?
            .map(|maybe_record| maybe_record.map_err(|error| error.into()))
            .collect()
    }

    /// Insert a new record and return it with its assigned ID and defaults
    /// applied.
    ///
    /// If `owner` is given, the new row's `user_id` column is stamped with
    /// the owner's ID. The insert and the read-back of the stored row happen
    /// in one transaction that commits before returning.
    ///
    /// # Errors
    ///
    /// This function will return an error if a constraint was violated
    /// (e.g. [Error::DuplicateCategoryName], [Error::InvalidForeignKey]) or
    /// there is some other SQL error.
    pub fn create(&self, new: &T::New, owner: Option<UserID>) -> Result<T, Error> {
        let fields = new.fields();

        let mut columns: Vec<&str> = fields.iter().map(|field| field.column).collect();
        let mut values: Vec<Value> = fields.into_iter().map(|field| field.value).collect();

        if let Some(user_id) = owner {
            columns.push("user_id");
            values.push(Value::from(user_id.as_i64()));
        }

        let placeholders = (1..=values.len())
            .map(|position| format!("?{position}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            T::TABLE,
            columns.join(", "),
            placeholders
        );

        let connection = self.lock()?;
        let transaction = Transaction::new_unchecked(&connection, TransactionBehavior::Deferred)?;

        transaction.execute(&sql, params_from_iter(values))?;
        let id = transaction.last_insert_rowid();
        let record = transaction
            .prepare(&format!("{} WHERE id = :id", Self::select_sql()))?
            .query_row(&[(":id", &id)], T::map_row)?;

        transaction.commit()?;

        Ok(record)
    }

    /// Apply a partial update to `existing` and return the stored row.
    ///
    /// Only the fields present in `patch` are overwritten, all other columns
    /// keep their prior values. A patch with no fields set is a no-op that
    /// returns the current row.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::NotFound] if the record no longer
    /// exists, or an error if a constraint was violated or there is some
    /// other SQL error.
    pub fn update(&self, existing: &T, patch: &T::Patch) -> Result<T, Error>
    where
        T: Patchable,
    {
        let id = existing.id();
        let fields = patch.fields();

        if fields.is_empty() {
            return self.get(id)?.ok_or(Error::NotFound);
        }

        let assignments = fields
            .iter()
            .enumerate()
            .map(|(index, field)| format!("{} = ?{}", field.column, index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            T::TABLE,
            assignments,
            fields.len() + 1
        );

        let mut values: Vec<Value> = fields.into_iter().map(|field| field.value).collect();
        values.push(Value::from(id));

        let connection = self.lock()?;
        let transaction = Transaction::new_unchecked(&connection, TransactionBehavior::Deferred)?;

        let rows_affected = transaction.execute(&sql, params_from_iter(values))?;
        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        let record = transaction
            .prepare(&format!("{} WHERE id = :id", Self::select_sql()))?
            .query_row(&[(":id", &id)], T::map_row)?;

        transaction.commit()?;

        Ok(record)
    }

    /// Delete `existing` and return its last-known values.
    ///
    /// Deleting a record that is already gone is not an error, callers are
    /// expected to have validated existence beforehand.
    ///
    /// # Errors
    ///
    /// This function will return an error if there is an SQL error.
    pub fn remove(&self, existing: T) -> Result<T, Error> {
        self.lock()?.execute(
            &format!("DELETE FROM {} WHERE id = ?1", T::TABLE),
            [existing.id()],
        )?;

        Ok(existing)
    }
}

impl<T: Owned> Store<T> {
    /// Get all records of this kind owned by the user with `user_id`.
    ///
    /// # Errors
    ///
    /// This function will return an error if there is an SQL error.
    pub fn get_all_by_owner(&self, user_id: UserID) -> Result<Vec<T>, Error> {
        self.lock()?
            .prepare(&format!("{} WHERE user_id = :user_id", Self::select_sql()))?
            .query_map(&[(":user_id", &user_id.as_i64())], |row| T::map_row(row))?
            .map(|maybe_record| maybe_record.map_err(|error| error.into()))
            .collect()
    }
}

impl<T: Named> Store<T> {
    /// Get the ID of the record of this kind with `name`, or `None` if the
    /// name is unused.
    ///
    /// The lookup runs against this kind's own table, so an expense category
    /// and an income category may share a name.
    ///
    /// # Errors
    ///
    /// This function will return an error if there is an SQL error.
    pub fn get_id_by_name(&self, name: &str) -> Result<Option<DatabaseID>, Error> {
        self.lock()?
            .prepare(&format!("SELECT id FROM {} WHERE name = :name", T::TABLE))?
            .query_row(&[(":name", &name)], |row| row.get(0))
            .optional()
            .map_err(|error| error.into())
    }
}
