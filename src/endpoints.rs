//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g. '/expense/{expense_id}', use
//! [format_endpoint].

/// The route for registering a new user.
pub const REGISTER: &str = "/auth/register";
/// The route for signing in and getting a token.
pub const SIGN_IN: &str = "/auth/sign_in";
/// The route to create and list expense categories.
pub const EXPENSE_CATEGORIES: &str = "/category/expense";
/// The route to update or delete a single expense category.
pub const EXPENSE_CATEGORY: &str = "/category/expense/{category_id}";
/// The route to create and list income categories.
pub const INCOME_CATEGORIES: &str = "/category/income";
/// The route to update or delete a single income category.
pub const INCOME_CATEGORY: &str = "/category/income/{category_id}";
/// The route to create and list the current user's expenses.
pub const EXPENSES: &str = "/expense";
/// The route to update or delete a single expense.
pub const EXPENSE: &str = "/expense/{expense_id}";
/// The route to create and list the current user's incomes.
pub const INCOMES: &str = "/income";
/// The route to update or delete a single income.
pub const INCOME: &str = "/income/{income_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace and ends with a
/// right brace, for example '{expense_id}' in '/expense/{expense_id}'. This
/// function assumes that an endpoint path contains at most one parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::REGISTER,
            endpoints::SIGN_IN,
            endpoints::EXPENSE_CATEGORIES,
            endpoints::EXPENSE_CATEGORY,
            endpoints::INCOME_CATEGORIES,
            endpoints::INCOME_CATEGORY,
            endpoints::EXPENSES,
            endpoints::EXPENSE,
            endpoints::INCOMES,
            endpoints::INCOME,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }

    #[test]
    fn format_endpoint_replaces_parameter() {
        assert_eq!(format_endpoint(endpoints::EXPENSE, 42), "/expense/42");
        assert_eq!(
            format_endpoint(endpoints::INCOME_CATEGORY, 7),
            "/category/income/7"
        );
    }

    #[test]
    fn format_endpoint_returns_paths_without_parameters_unchanged() {
        assert_eq!(format_endpoint(endpoints::EXPENSES, 42), "/expense");
    }
}
