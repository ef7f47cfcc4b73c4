//! The expense CRUD endpoints.
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

use super::domain::{Expense, ExpenseData, ExpensePatchData};

/// Create a new expense owned by the authenticated user.
///
/// # Errors
///
/// This function will return an error if the body fails validation or
/// `category_id` does not refer to an existing expense category.
pub async fn create_expense(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(expense_data): Json<ExpenseData>,
) -> Result<Json<Expense>, Error> {
    let new_expense = expense_data.validate()?;
    let expense = state.store::<Expense>().create(&new_expense, Some(user.id))?;

    Ok(Json(expense))
}

/// Get the authenticated user's expenses.
///
/// # Errors
///
/// This function will return an error if there is an SQL error.
pub async fn get_expenses(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Expense>>, Error> {
    let expenses = state.store::<Expense>().get_all_by_owner(user.id)?;

    Ok(Json(expenses))
}

/// Partially update one of the authenticated user's expenses.
///
/// # Errors
///
/// This function will return an error if the expense does not exist, belongs
/// to another user, or the body fails validation.
pub async fn update_expense(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(expense_id): Path<DatabaseID>,
    Json(patch_data): Json<ExpensePatchData>,
) -> Result<Json<Expense>, Error> {
    let patch = patch_data.validate()?;
    let store = state.store::<Expense>();

    let expense = require_found(store.get(expense_id)?)?;
    let expense = require_owner(expense, user.id)?;

    let expense = store.update(&expense, &patch)?;

    Ok(Json(expense))
}

/// Delete one of the authenticated user's expenses and return its last-known
/// values.
///
/// # Errors
///
/// This function will return an error if the expense does not exist or
/// belongs to another user.
pub async fn delete_expense(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(expense_id): Path<DatabaseID>,
) -> Result<Json<Expense>, Error> {
    let store = state.store::<Expense>();

    let expense = require_found(store.get(expense_id)?)?;
    let expense = require_owner(expense, user.id)?;

    let expense = store.remove(expense)?;

    Ok(Json(expense))
}

#[cfg(test)]
mod expense_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;
    use time::OffsetDateTime;

    use crate::{
        category::ExpenseCategory,
        db::initialize,
        email::Email,
        endpoints::{self, format_endpoint},
        expense::Expense,
        password::RawPassword,
        routing::build_router,
        state::AppState,
        user::ensure_superuser,
    };

    const SUPERUSER_EMAIL: &str = "admin@example.com";
    const PASSWORD: &str = "averysecurepassword";

    fn get_test_state() -> AppState {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        initialize(&connection).expect("Could not initialize database.");

        let state = AppState::new(Arc::new(Mutex::new(connection)), "42");
        ensure_superuser(
            &state.store(),
            &Email::new_unchecked(SUPERUSER_EMAIL),
            &RawPassword::new_unchecked(PASSWORD),
        )
        .expect("Could not create superuser.");

        state
    }

    async fn sign_in(server: &TestServer, email: &str) -> String {
        let response = server
            .post(endpoints::SIGN_IN)
            .content_type("application/json")
            .json(&json!({
                "email": email,
                "password": PASSWORD,
            }))
            .await;

        response.assert_status_ok();

        response.json::<String>()
    }

    async fn register_and_sign_in(server: &TestServer, email: &str) -> String {
        server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&json!({
                "email": email,
                "password": PASSWORD,
            }))
            .await
            .assert_status(StatusCode::CREATED);

        sign_in(server, email).await
    }

    /// Set up a test server with a signed-in regular user and one expense
    /// category created by the superuser.
    async fn create_test_app() -> (TestServer, String, ExpenseCategory) {
        let server = TestServer::try_new(build_router(get_test_state()))
            .expect("Could not create test server.");

        let superuser_token = sign_in(&server, SUPERUSER_EMAIL).await;
        let category = server
            .post(endpoints::EXPENSE_CATEGORIES)
            .authorization_bearer(superuser_token)
            .content_type("application/json")
            .json(&json!({ "name": "Groceries" }))
            .await
            .json::<ExpenseCategory>();

        let token = register_and_sign_in(&server, "test@test.com").await;

        (server, token, category)
    }

    #[tokio::test]
    async fn create_expense_succeeds_and_applies_defaults() {
        let (server, token, category) = create_test_app().await;

        let response = server
            .post(endpoints::EXPENSES)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({
                "amount": 15.50,
                "description": "Cheese",
                "category_id": category.id,
            }))
            .await;

        response.assert_status_ok();

        let expense = response.json::<Expense>();
        assert!(expense.id > 0);
        assert_eq!(expense.amount.as_f64(), 15.50);
        assert_eq!(expense.description, Some("Cheese".to_string()));
        assert_eq!(expense.category_id, Some(category.id));
        assert_eq!(expense.date, OffsetDateTime::now_utc().date());
        assert!(expense.is_paid);
    }

    #[tokio::test]
    async fn create_expense_without_category_succeeds() {
        let (server, token, _) = create_test_app().await;

        let response = server
            .post(endpoints::EXPENSES)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({ "amount": 0.01 }))
            .await;

        response.assert_status_ok();

        let expense = response.json::<Expense>();
        assert_eq!(expense.category_id, None);
    }

    #[tokio::test]
    async fn create_expense_fails_on_non_positive_amount() {
        let (server, token, _) = create_test_app().await;

        for amount in [0.0, -15.50] {
            server
                .post(endpoints::EXPENSES)
                .authorization_bearer(&token)
                .content_type("application/json")
                .json(&json!({ "amount": amount }))
                .await
                .assert_status(StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn create_expense_fails_on_invalid_category_id() {
        let (server, token, category) = create_test_app().await;

        server
            .post(endpoints::EXPENSES)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({
                "amount": 15.50,
                "category_id": category.id + 1337,
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_expense_fails_without_token() {
        let (server, _, _) = create_test_app().await;

        server
            .post(endpoints::EXPENSES)
            .content_type("application/json")
            .json(&json!({ "amount": 15.50 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_expenses_excludes_other_users_records() {
        let (server, token, category) = create_test_app().await;

        let expense = server
            .post(endpoints::EXPENSES)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({
                "amount": 15.50,
                "category_id": category.id,
            }))
            .await
            .json::<Expense>();

        let response = server.get(endpoints::EXPENSES).authorization_bearer(&token).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Expense>>(), vec![expense]);

        let other_token = register_and_sign_in(&server, "test2@test.com").await;
        let response = server
            .get(endpoints::EXPENSES)
            .authorization_bearer(other_token)
            .await;

        response.assert_status_ok();
        assert!(response.json::<Vec<Expense>>().is_empty());
    }

    #[tokio::test]
    async fn update_expense_overwrites_only_present_fields() {
        let (server, token, _) = create_test_app().await;

        let expense = server
            .post(endpoints::EXPENSES)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({
                "amount": 15.50,
                "description": "Cheese",
            }))
            .await
            .json::<Expense>();

        let response = server
            .patch(&format_endpoint(endpoints::EXPENSE, expense.id))
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({ "is_paid": false }))
            .await;

        response.assert_status_ok();

        let updated = response.json::<Expense>();
        assert!(!updated.is_paid);
        assert_eq!(updated.amount, expense.amount);
        assert_eq!(updated.description, expense.description);
        assert_eq!(updated.date, expense.date);
        assert_eq!(updated.user_id, expense.user_id);
    }

    #[tokio::test]
    async fn update_expense_fails_on_missing_id() {
        let (server, token, _) = create_test_app().await;

        server
            .patch(&format_endpoint(endpoints::EXPENSE, 1337))
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({ "is_paid": false }))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn update_expense_fails_on_foreign_record() {
        let (server, token, _) = create_test_app().await;

        let expense = server
            .post(endpoints::EXPENSES)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({ "amount": 15.50 }))
            .await
            .json::<Expense>();

        let other_token = register_and_sign_in(&server, "test2@test.com").await;

        server
            .patch(&format_endpoint(endpoints::EXPENSE, expense.id))
            .authorization_bearer(other_token)
            .content_type("application/json")
            .json(&json!({ "amount": 0.01 }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn delete_expense_returns_last_known_values() {
        let (server, token, _) = create_test_app().await;

        let expense = server
            .post(endpoints::EXPENSES)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({ "amount": 15.50 }))
            .await
            .json::<Expense>();

        let response = server
            .delete(&format_endpoint(endpoints::EXPENSE, expense.id))
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Expense>(), expense);

        let remaining = server
            .get(endpoints::EXPENSES)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Expense>>();
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn delete_expense_fails_on_foreign_record() {
        let (server, token, _) = create_test_app().await;

        let expense = server
            .post(endpoints::EXPENSES)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({ "amount": 15.50 }))
            .await
            .json::<Expense>();

        let other_token = register_and_sign_in(&server, "test2@test.com").await;

        server
            .delete(&format_endpoint(endpoints::EXPENSE, expense.id))
            .authorization_bearer(other_token)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        // The expense must still be there for its owner.
        let remaining = server
            .get(endpoints::EXPENSES)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Expense>>();
        assert_eq!(remaining, vec![expense]);
    }

    #[tokio::test]
    async fn deleting_category_cascades_to_expenses() {
        let (server, token, category) = create_test_app().await;

        server
            .post(endpoints::EXPENSES)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({
                "amount": 15.50,
                "category_id": category.id,
            }))
            .await
            .assert_status_ok();

        let superuser_token = sign_in(&server, SUPERUSER_EMAIL).await;
        server
            .delete(&format_endpoint(endpoints::EXPENSE_CATEGORY, category.id))
            .authorization_bearer(superuser_token)
            .await
            .assert_status_ok();

        let remaining = server
            .get(endpoints::EXPENSES)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Expense>>();
        assert!(remaining.is_empty());
    }
}
