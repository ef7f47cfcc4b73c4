//! Expense records: money spent, optionally categorized, owned by the user
//! that recorded them.

mod db;
mod domain;
mod endpoints;

pub use db::create_expense_table;
pub use domain::{
    Expense, ExpenseData, ExpensePatch, ExpensePatchData, MAX_DESCRIPTION_LENGTH, NewExpense,
};
pub(crate) use domain::validate_description;
pub use endpoints::{create_expense, delete_expense, get_expenses, update_expense};
