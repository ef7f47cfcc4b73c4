//! Database bindings for the expense table.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    database_id::DatabaseID,
    db::{date_from_column, format_date, timestamp_from_column},
    amount::Amount,
    store::{Field, InsertFields, Owned, Patchable, PatchFields, Record},
    user::UserID,
};

use super::domain::{Expense, ExpensePatch, NewExpense};

impl Record for Expense {
    const TABLE: &'static str = "expense";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "amount",
        "description",
        "category_id",
        "user_id",
        "date",
        "created_at",
        "is_paid",
    ];

    type New = NewExpense;

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let raw_date: String = row.get(5)?;
        let raw_created_at: i64 = row.get(6)?;

        Ok(Self {
            id: row.get(0)?,
            amount: Amount::new_unchecked(row.get(1)?),
            description: row.get(2)?,
            category_id: row.get(3)?,
            user_id: UserID::new(row.get(4)?),
            date: date_from_column(5, raw_date)?,
            created_at: timestamp_from_column(6, raw_created_at)?,
            is_paid: row.get(7)?,
        })
    }

    fn id(&self) -> DatabaseID {
        self.id
    }
}

impl Patchable for Expense {
    type Patch = ExpensePatch;
}

impl Owned for Expense {
    fn owner(&self) -> UserID {
        self.user_id
    }
}

impl InsertFields for NewExpense {
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("amount", self.amount.as_f64()),
            Field::new("description", self.description.clone()),
            Field::new("category_id", self.category_id),
            Field::new("date", format_date(self.date)),
            Field::new("created_at", OffsetDateTime::now_utc().unix_timestamp()),
            Field::new("is_paid", self.is_paid),
        ]
    }
}

impl PatchFields for ExpensePatch {
    fn fields(&self) -> Vec<Field> {
        let mut fields = Vec::new();

        if let Some(amount) = self.amount {
            fields.push(Field::new("amount", amount.as_f64()));
        }
        if let Some(description) = &self.description {
            fields.push(Field::new("description", description.clone()));
        }
        if let Some(category_id) = self.category_id {
            fields.push(Field::new("category_id", category_id));
        }
        if let Some(date) = self.date {
            fields.push(Field::new("date", format_date(date)));
        }
        if let Some(is_paid) = self.is_paid {
            fields.push(Field::new("is_paid", is_paid));
        }

        fields
    }
}

/// Create the expense table.
///
/// Deleting a category or a user cascades to their expenses.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY,
                amount REAL NOT NULL CHECK (amount > 0),
                description TEXT,
                category_id INTEGER,
                user_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                is_paid INTEGER NOT NULL DEFAULT 1,
                FOREIGN KEY(category_id) REFERENCES expense_category(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}
