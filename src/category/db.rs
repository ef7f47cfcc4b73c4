//! Database bindings for the two category tables.

use rusqlite::{Connection, Row};

use crate::{
    database_id::DatabaseID,
    store::{Field, InsertFields, Named, Patchable, PatchFields, Record},
};

use super::domain::{CategoryName, CategoryPatch, ExpenseCategory, IncomeCategory, NewCategory};

impl Record for ExpenseCategory {
    const TABLE: &'static str = "expense_category";
    const COLUMNS: &'static [&'static str] = &["id", "name", "description", "color", "icon"];

    type New = NewCategory;

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let (id, name, description, color, icon) = map_category_row(row)?;

        Ok(Self {
            id,
            name,
            description,
            color,
            icon,
        })
    }

    fn id(&self) -> DatabaseID {
        self.id
    }
}

impl Patchable for ExpenseCategory {
    type Patch = CategoryPatch;
}

impl Named for ExpenseCategory {}

impl Record for IncomeCategory {
    const TABLE: &'static str = "income_category";
    const COLUMNS: &'static [&'static str] = &["id", "name", "description", "color", "icon"];

    type New = NewCategory;

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let (id, name, description, color, icon) = map_category_row(row)?;

        Ok(Self {
            id,
            name,
            description,
            color,
            icon,
        })
    }

    fn id(&self) -> DatabaseID {
        self.id
    }
}

impl Patchable for IncomeCategory {
    type Patch = CategoryPatch;
}

impl Named for IncomeCategory {}

type CategoryRow = (
    DatabaseID,
    CategoryName,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn map_category_row(row: &Row) -> Result<CategoryRow, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let description = row.get(2)?;
    let color = row.get(3)?;
    let icon = row.get(4)?;

    Ok((
        id,
        CategoryName::new_unchecked(&raw_name),
        description,
        color,
        icon,
    ))
}

impl InsertFields for NewCategory {
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("name", self.name.to_string()),
            Field::new("description", self.description.clone()),
            Field::new("color", self.color.clone()),
            Field::new("icon", self.icon.clone()),
        ]
    }
}

impl PatchFields for CategoryPatch {
    fn fields(&self) -> Vec<Field> {
        let mut fields = Vec::new();

        if let Some(name) = &self.name {
            fields.push(Field::new("name", name.to_string()));
        }
        if let Some(description) = &self.description {
            fields.push(Field::new("description", description.clone()));
        }
        if let Some(color) = &self.color {
            fields.push(Field::new("color", color.clone()));
        }
        if let Some(icon) = &self.icon {
            fields.push(Field::new("icon", icon.clone()));
        }

        fields
    }
}

/// Create the expense and income category tables.
///
/// The UNIQUE constraint on `name` is scoped to each table, so an expense
/// category and an income category may share a name.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_category_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense_category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            color TEXT,
            icon TEXT
        );

        CREATE TABLE IF NOT EXISTS income_category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            color TEXT,
            icon TEXT
        );",
    )?;

    Ok(())
}
