//! Database initialization and storage formats for dates and timestamps.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    category::create_category_tables,
    expense::create_expense_table,
    income::create_income_table,
    user::create_user_table,
};

/// The format transaction dates are stored in, e.g. `2026-08-06`.
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Format a date for storage in a TEXT column.
pub(crate) fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .expect("formatting a date with a static format description cannot fail")
}

/// Parse a date from the TEXT column at `index` of a row.
pub(crate) fn date_from_column(index: usize, text: String) -> Result<Date, rusqlite::Error> {
    Date::parse(&text, DATE_FORMAT).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(error))
    })
}

/// Parse a unix timestamp from the INTEGER column at `index` of a row.
pub(crate) fn timestamp_from_column(
    index: usize,
    seconds: i64,
) -> Result<OffsetDateTime, rusqlite::Error> {
    OffsetDateTime::from_unix_timestamp(seconds).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Integer,
            Box::new(error),
        )
    })
}

/// Create the application's tables if they do not exist.
///
/// All tables are created inside a single exclusive transaction. This also
/// enables SQLite's foreign key enforcement on `connection`, which is off by
/// default and required for cascading deletes from categories and users to
/// their transactions.
///
/// # Errors
///
/// This function will return an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_tables(&transaction)?;
    create_expense_table(&transaction)?;
    create_income_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
