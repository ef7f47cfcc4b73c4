//! Ledgerly is a backend for tracking personal income and expenses.
//!
//! This library provides a JSON REST API over a SQLite database: users
//! register and sign in, record expenses and incomes against categorized
//! ledgers, and superusers manage the category lists. See [build_router] for
//! the full route table.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod amount;
mod auth;
mod category;
mod config;
mod database_id;
mod db;
mod email;
mod endpoints;
mod error;
mod expense;
mod income;
mod password;
mod routing;
mod state;
mod store;
mod user;
mod validate;

pub use amount::Amount;
pub use config::{AppConfig, SuperuserCredentials};
pub use database_id::DatabaseID;
pub use db::initialize as initialize_db;
pub use email::Email;
pub use error::Error;
pub use password::{PasswordHash, RawPassword};
pub use routing::build_router;
pub use state::AppState;
pub use store::Store;
pub use user::{User, UserID, ensure_superuser};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
