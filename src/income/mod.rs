//! Income records: money received, always categorized, owned by the user
//! that recorded them.

mod db;
mod domain;
mod endpoints;

pub use db::create_income_table;
pub use domain::{Income, IncomeData, IncomePatch, IncomePatchData, NewIncome};
pub use endpoints::{create_income, delete_income, get_incomes, update_income};
