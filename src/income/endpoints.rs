//! The income CRUD endpoints.
//!
//! Every route requires a signed-in user; records are stamped with and
//! scoped to their owner.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    auth::AuthUser,
    database_id::DatabaseID,
    state::AppState,
    validate::{require_found, require_owner},
};

use super::domain::{Income, IncomeData, IncomePatchData};

/// Create a new income owned by the authenticated user.
///
/// # Errors
///
/// This function will return an error if the body fails validation or
/// `category_id` does not refer to an existing income category.
pub async fn create_income(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(income_data): Json<IncomeData>,
) -> Result<Json<Income>, Error> {
    let new_income = income_data.validate()?;
    let income = state.store::<Income>().create(&new_income, Some(user.id))?;

    Ok(Json(income))
}

/// Get the authenticated user's incomes.
///
/// # Errors
///
/// This function will return an error if there is an SQL error.
pub async fn get_incomes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Income>>, Error> {
    let incomes = state.store::<Income>().get_all_by_owner(user.id)?;

    Ok(Json(incomes))
}

/// Partially update one of the authenticated user's incomes.
///
/// # Errors
///
/// This function will return an error if the income does not exist, belongs
/// to another user, or the body fails validation.
pub async fn update_income(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(income_id): Path<DatabaseID>,
    Json(patch_data): Json<IncomePatchData>,
) -> Result<Json<Income>, Error> {
    let patch = patch_data.validate()?;
    let store = state.store::<Income>();

    let income = require_found(store.get(income_id)?)?;
    let income = require_owner(income, user.id)?;

    let income = store.update(&income, &patch)?;

    Ok(Json(income))
}

/// Delete one of the authenticated user's incomes and return its last-known
/// values.
///
/// # Errors
///
/// This function will return an error if the income does not exist or
/// belongs to another user.
pub async fn delete_income(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(income_id): Path<DatabaseID>,
) -> Result<Json<Income>, Error> {
    let store = state.store::<Income>();

    let income = require_found(store.get(income_id)?)?;
    let income = require_owner(income, user.id)?;

    let income = store.remove(income)?;

    Ok(Json(income))
}
