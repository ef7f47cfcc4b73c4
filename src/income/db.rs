//! Database bindings for the income table.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    amount::Amount,
    database_id::DatabaseID,
    db::{date_from_column, format_date, timestamp_from_column},
    store::{Field, InsertFields, Owned, Patchable, PatchFields, Record},
    user::UserID,
};

use super::domain::{Income, IncomePatch, NewIncome};

impl Record for Income {
    const TABLE: &'static str = "income";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "amount",
        "description",
        "category_id",
        "user_id",
        "date",
        "created_at",
    ];

    type New = NewIncome;

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
        })
    }

    fn id(&self) -> DatabaseID {
        self.id
    }
}

impl Patchable for Income {
    type Patch = IncomePatch;
}

impl Owned for Income {
    fn owner(&self) -> UserID {
        self.user_id
    }
}

impl InsertFields for NewIncome {
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("amount", self.amount.as_f64()),
            Field::new("description", self.description.clone()),
            Field::new("category_id", self.category_id),
            Field::new("date", format_date(self.date)),
            Field::new("created_at", OffsetDateTime::now_utc().unix_timestamp()),
        ]
    }
}

impl PatchFields for IncomePatch {
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

        fields
    }
}

/// Create the income table.
///
/// Unlike the expense table, `category_id` is NOT NULL: every income must be
/// recorded against a category. Deleting a category or a user cascades to
/// their incomes.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_income_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS income (
                id INTEGER PRIMARY KEY,
                amount REAL NOT NULL CHECK (amount > 0),
                description TEXT,
                category_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                FOREIGN KEY(category_id) REFERENCES income_category(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}
