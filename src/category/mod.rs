//! Transaction categories, one set for expenses and one for incomes.
//!
//! The two kinds are separate record kinds over separate tables with
//! identical columns; the endpoint handlers are generic over the kind and
//! mounted twice by the router.

mod db;
mod domain;
mod endpoints;

pub use db::create_category_tables;
pub use domain::{
    CategoryData, CategoryName, CategoryPatch, CategoryPatchData, CategoryRecord, ExpenseCategory,
    IncomeCategory, MAX_NAME_LENGTH, NewCategory,
};
pub use endpoints::{create_category, delete_category, get_all_categories, update_category};
