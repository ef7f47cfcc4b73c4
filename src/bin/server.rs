//! The ledgerly API server.

use std::{
    env,
    net::SocketAddr,
    process::exit,
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use ledgerly::{
    AppConfig, AppState, Email, RawPassword, SuperuserCredentials, build_router,
    ensure_superuser, graceful_shutdown, initialize_db,
};

/// The REST API server for ledgerly.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();
    let config = match build_config(args) {
        Ok(config) => config,
        Err(reason) => {
            tracing::error!("invalid configuration: {reason}");
            exit(1);
        }
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    let conn = Connection::open(&config.db_path).expect("Could not open the database.");
    initialize_db(&conn).expect("Could not initialize the database.");
    let conn = Arc::new(Mutex::new(conn));

    let state = AppState::new(conn, &config.jwt_secret);

    if let Some(superuser) = &config.superuser {
        ensure_superuser(&state.store(), &superuser.email, &superuser.password)
            .expect("Could not create the first superuser.");
    }

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

/// Assemble the app config from the parsed arguments and the environment.
///
/// The JWT secret comes from the environment variable `SECRET`. The first
/// superuser is created only when both `SUPERUSER_EMAIL` and
/// `SUPERUSER_PASSWORD` are set.
fn build_config(args: Args) -> Result<AppConfig, String> {
    let jwt_secret = env::var("SECRET")
        .map_err(|_| "the environment variable 'SECRET' must be set".to_string())?;

    let superuser = match (env::var("SUPERUSER_EMAIL"), env::var("SUPERUSER_PASSWORD")) {
        (Ok(email), Ok(password)) => Some(SuperuserCredentials {
            email: Email::new(&email).map_err(|error| error.to_string())?,
            password: RawPassword::new(password).map_err(|error| error.to_string())?,
        }),
        (Err(_), Err(_)) => None,
        _ => {
            return Err(
                "'SUPERUSER_EMAIL' and 'SUPERUSER_PASSWORD' must be set together".to_string(),
            );
        }
    };

    Ok(AppConfig {
        db_path: args.db_path,
        port: args.port,
        jwt_secret,
        superuser,
    })
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().pretty().with_filter(filter))
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they occur, so the default 5xx logging
        // would be redundant.
        .on_failure(());

    router.layer(tracing_layer)
}
