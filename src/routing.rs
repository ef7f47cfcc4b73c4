//! Application router configuration.

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::{
    auth,
    category::{
        ExpenseCategory, IncomeCategory, create_category, delete_category, get_all_categories,
        update_category,
    },
    endpoints,
    expense::{create_expense, delete_expense, get_expenses, update_expense},
    income::{create_income, delete_income, get_incomes, update_income},
    state::AppState,
};

/// Return a router with all the app's routes.
///
/// The category endpoints are generic over the category kind and mounted
/// twice, once per kind.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::REGISTER, post(auth::register))
        .route(endpoints::SIGN_IN, post(auth::sign_in))
        .route(
            endpoints::EXPENSE_CATEGORIES,
            post(create_category::<ExpenseCategory>).get(get_all_categories::<ExpenseCategory>),
        )
        .route(
            endpoints::EXPENSE_CATEGORY,
            patch(update_category::<ExpenseCategory>)
                .delete(delete_category::<ExpenseCategory>),
        )
        .route(
            endpoints::INCOME_CATEGORIES,
            post(create_category::<IncomeCategory>).get(get_all_categories::<IncomeCategory>),
        )
        .route(
            endpoints::INCOME_CATEGORY,
            patch(update_category::<IncomeCategory>)
                .delete(delete_category::<IncomeCategory>),
        )
        .route(
            endpoints::EXPENSES,
            post(create_expense).get(get_expenses),
        )
        .route(
            endpoints::EXPENSE,
            patch(update_expense).delete(delete_expense),
        )
        .route(endpoints::INCOMES, post(create_income).get(get_incomes))
        .route(
            endpoints::INCOME,
            patch(update_income).delete(delete_income),
        )
        .route("/", get(get_index))
        .with_state(state)
}

/// The root path reports the service name so that a health check has
/// something cheap to probe.
async fn get_index() -> &'static str {
    concat!("ledgerly ", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod scenario_tests {
    use std::sync::{Arc, Mutex};

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        category::ExpenseCategory,
        db::initialize,
        email::Email,
        endpoints,
        expense::Expense,
        password::RawPassword,
        state::AppState,
        user::ensure_superuser,
    };

    use super::build_router;

    const PASSWORD: &str = "averysecurepassword";

    fn get_test_state() -> AppState {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        initialize(&connection).expect("Could not initialize database.");

        let state = AppState::new(Arc::new(Mutex::new(connection)), "42");
        ensure_superuser(
            &state.store(),
            &Email::new_unchecked("admin@example.com"),
            &RawPassword::new_unchecked(PASSWORD),
        )
        .expect("Could not create superuser.");

        state
    }

    async fn sign_in(server: &TestServer, email: &str) -> String {
        let response = server
            .post(endpoints::SIGN_IN)
            .content_type("application/json")
            .json(&json!({ "email": email, "password": PASSWORD }))
            .await;

        response.assert_status_ok();

        response.json::<String>()
    }

    async fn register_and_sign_in(server: &TestServer, email: &str) -> String {
        server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&json!({ "email": email, "password": PASSWORD }))
            .await
            .assert_status(StatusCode::CREATED);

        sign_in(server, email).await
    }

    #[tokio::test]
    async fn index_reports_service_name() {
        let server = TestServer::try_new(build_router(get_test_state())).unwrap();

        let response = server.get("/").await;

        response.assert_status_ok();
        assert!(response.text().starts_with("ledgerly"));
    }

    /// Walks the full flow: a superuser sets up a category, a user records
    /// an expense against it, and another user cannot see that expense.
    #[tokio::test]
    async fn groceries_scenario() {
        let server = TestServer::try_new(build_router(get_test_state())).unwrap();
        let superuser_token = sign_in(&server, "admin@example.com").await;

        let response = server
            .post(endpoints::EXPENSE_CATEGORIES)
            .authorization_bearer(&superuser_token)
            .content_type("application/json")
            .json(&json!({ "name": "Groceries" }))
            .await;
        response.assert_status_ok();
        let category = response.json::<ExpenseCategory>();
        assert!(category.id > 0);

        server
            .post(endpoints::EXPENSE_CATEGORIES)
            .authorization_bearer(&superuser_token)
            .content_type("application/json")
            .json(&json!({ "name": "Groceries" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let user_a_token = register_and_sign_in(&server, "a@test.com").await;
        let response = server
            .post(endpoints::EXPENSES)
            .authorization_bearer(&user_a_token)
            .content_type("application/json")
            .json(&json!({ "amount": 15.50, "category_id": category.id }))
            .await;
        response.assert_status_ok();
        let expense = response.json::<Expense>();

        let user_b_token = register_and_sign_in(&server, "b@test.com").await;
        let user_b_expenses = server
            .get(endpoints::EXPENSES)
            .authorization_bearer(&user_b_token)
            .await
            .json::<Vec<Expense>>();
        assert!(!user_b_expenses.contains(&expense));
        assert!(user_b_expenses.is_empty());
    }
}
