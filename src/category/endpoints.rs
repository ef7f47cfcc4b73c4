//! The category CRUD endpoints.
//!
//! One generic handler per verb, instantiated for both category kinds by the
//! router. Mutation requires a superuser, listing is open.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    auth::Superuser,
    database_id::DatabaseID,
    state::AppState,
    validate::{require_found, require_unique_name},
};

use super::domain::{CategoryData, CategoryPatchData, CategoryRecord};

/// Create a new category. Superusers only.
///
/// # Errors
///
/// This function will return an error if the body fails validation or the
/// name is already in use by a category of the same kind.
pub async fn create_category<C: CategoryRecord>(
    State(state): State<AppState>,
    _superuser: Superuser,
    Json(category_data): Json<CategoryData>,
) -> Result<Json<C>, Error> {
    let new_category = category_data.validate()?;
    let store = state.store::<C>();

    require_unique_name(&store, &new_category.name)?;

    let category = store.create(&new_category, None)?;

    Ok(Json(category))
}

/// Get all categories of one kind.
///
/// # Errors
///
/// This function will return an error if there is an SQL error.
pub async fn get_all_categories<C: CategoryRecord>(
    State(state): State<AppState>,
) -> Result<Json<Vec<C>>, Error> {
    let categories = state.store::<C>().get_all()?;

    Ok(Json(categories))
}

/// Partially update an existing category. Superusers only.
///
/// # Errors
///
/// This function will return an error if the category does not exist, the
/// body fails validation, or the new name is already in use by a category of
/// the same kind.
pub async fn update_category<C: CategoryRecord>(
    State(state): State<AppState>,
    _superuser: Superuser,
    Path(category_id): Path<DatabaseID>,
    Json(patch_data): Json<CategoryPatchData>,
) -> Result<Json<C>, Error> {
    let patch = patch_data.validate()?;
    let store = state.store::<C>();

    let category = require_found(store.get(category_id)?)?;

    if let Some(name) = &patch.name {
        require_unique_name(&store, name)?;
    }

    let category = store.update(&category, &patch)?;

    Ok(Json(category))
}

/// Delete a category and return its last-known values. Superusers only.
///
/// Deleting a category cascades to the transactions recorded against it.
///
/// # Errors
///
/// This function will return an error if the category does not exist.
pub async fn delete_category<C: CategoryRecord>(
    State(state): State<AppState>,
    _superuser: Superuser,
    Path(category_id): Path<DatabaseID>,
) -> Result<Json<C>, Error> {
    let store = state.store::<C>();

    let category = require_found(store.get(category_id)?)?;
    let category = store.remove(category)?;

    Ok(Json(category))
}
