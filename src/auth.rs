//! Token issuance, registration and the extractors that guard routes.
//!
//! Handlers declare their authorization requirement through an extractor
//! argument: [AuthUser] for any signed-in user, [Superuser] for users that
//! may manage categories.

use axum::{
    Json, RequestPartsExt,
    extract::{FromRef, FromRequestParts, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    email::Email,
    password::{PasswordHash, RawPassword},
    state::AppState,
    user::{NewUser, User, UserID, UserProfile},
};

/// How long an issued token stays valid.
const TOKEN_LIFETIME: Duration = Duration::minutes(15);

/// The contents of a JSON Web Token.
#[derive(Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: i64,
    /// The time the token was issued.
    pub iat: usize,
    /// The expiry time of the token.
    pub exp: usize,
}

/// The errors that may occur while authenticating a request.
#[derive(Debug, PartialEq)]
pub enum AuthError {
    /// The email/password combination did not match a registered user.
    WrongCredentials,
    /// The bearer token was missing, malformed, expired, or referred to a
    /// user that no longer exists.
    InvalidToken,
    /// The token could not be signed.
    TokenCreation,
    /// The authenticated user lacks the privileges for the route.
    Forbidden,
    /// An unexpected error occurred, e.g. the database was unavailable.
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AuthError::WrongCredentials => (StatusCode::UNAUTHORIZED, "Wrong credentials"),
            AuthError::InvalidToken => (StatusCode::BAD_REQUEST, "Invalid token"),
            AuthError::TokenCreation => (StatusCode::INTERNAL_SERVER_ERROR, "Token creation error"),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Insufficient privileges"),
            AuthError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// The data entered during sign-in.
#[derive(Deserialize)]
pub struct Credentials {
    /// Email entered during sign-in.
    pub email: Email,
    /// Password entered during sign-in.
    pub password: RawPassword,
}

/// The data entered during registration.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterData {
    /// Email to register with.
    pub email: String,
    /// Password to register with.
    pub password: String,
}

/// An extractor for the currently authenticated user.
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthError::InvalidToken)?;

        let app_state = AppState::from_ref(state);
        let token_data = decode_jwt(bearer.token(), app_state.decoding_key())?;

        let user = app_state
            .store::<User>()
            .get(token_data.claims.sub)
            .map_err(|error| {
                tracing::error!("error looking up token user: {error}");
                AuthError::InternalError
            })?
            .ok_or(AuthError::InvalidToken)?;

        Ok(AuthUser(user))
    }
}

/// An extractor for the currently authenticated user that additionally
/// requires the superuser flag.
pub struct Superuser(pub User);

impl<S> FromRequestParts<S> for Superuser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;

        if user.is_superuser {
            Ok(Superuser(user))
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

/// Handler for registration requests.
///
/// Registration always creates a regular user, the superuser flag can only
/// be set through the server's bootstrap config.
///
/// # Errors
///
/// This function will return an error if the email is invalid or already
/// registered, or the password is below the minimum length.
pub async fn register(
    State(state): State<AppState>,
    Json(register_data): Json<RegisterData>,
) -> Result<(StatusCode, Json<UserProfile>), Error> {
    let email = Email::new(&register_data.email)?;
    let password = RawPassword::new(register_data.password)?;
    let password_hash = PasswordHash::new(&password)?;

    let user = state.store::<User>().create(
        &NewUser {
            email,
            password_hash,
            is_superuser: false,
        },
        None,
    )?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Handler for sign-in requests.
///
/// Returns a signed token as a JSON string on success.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<String>, AuthError> {
    let user = state
        .store::<User>()
        .get_by_email(credentials.email.as_ref())
        .map_err(|error| {
            tracing::error!("error matching user: {error}");
            AuthError::InternalError
        })?
        .ok_or(AuthError::WrongCredentials)?;

    let password_is_correct = user.password_hash.verify(&credentials.password).map_err(|error| {
        tracing::error!("error verifying password: {error}");
        AuthError::InternalError
    })?;

    if password_is_correct {
        let token = encode_jwt(user.id, state.encoding_key())?;

        Ok(Json(token))
    } else {
        Err(AuthError::WrongCredentials)
    }
}

fn encode_jwt(user_id: UserID, encoding_key: &EncodingKey) -> Result<String, AuthError> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id.as_i64(),
        iat: now.unix_timestamp() as usize,
        exp: (now + TOKEN_LIFETIME).unix_timestamp() as usize,
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|_| AuthError::TokenCreation)
}

fn decode_jwt(token: &str, decoding_key: &DecodingKey) -> Result<TokenData<Claims>, AuthError> {
    decode(token, decoding_key, &Validation::default()).map_err(|_| AuthError::InvalidToken)
}


#[cfg(test)]
mod auth_route_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Router,
        http::StatusCode,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        auth::{self, AuthUser, Superuser},
        db::initialize,
        email::Email,
        password::RawPassword,
        state::AppState,
        user::{UserProfile, ensure_superuser},
    };

    fn get_test_state() -> AppState {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        initialize(&connection).expect("Could not initialize database.");

        AppState::new(Arc::new(Mutex::new(connection)), "42")
    }

    fn build_test_router(state: AppState) -> Router {
        async fn protected(_: AuthUser) -> StatusCode {
            StatusCode::OK
        }

        async fn superuser_only(_: Superuser) -> StatusCode {
            StatusCode::OK
        }

        Router::new()
            .route("/register", post(auth::register))
            .route("/sign_in", post(auth::sign_in))
            .route("/protected", get(protected))
            .route("/superuser_only", get(superuser_only))
            .with_state(state)
    }

    async fn register_and_sign_in(server: &TestServer, email: &str, password: &str) -> String {
        server
            .post("/register")
            .content_type("application/json")
            .json(&json!({
                "email": email,
                "password": password,
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/sign_in")
            .content_type("application/json")
            .json(&json!({
                "email": email,
                "password": password,
            }))
            .await;

        response.assert_status_ok();

        response.json::<String>()
    }

    #[tokio::test]
    async fn register_returns_profile_without_password() {
        let server = TestServer::try_new(build_test_router(get_test_state())).unwrap();

        let response = server
            .post("/register")
            .content_type("application/json")
            .json(&json!({
                "email": "test@test.com",
                "password": "averysecurepassword",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);

        let profile = response.json::<UserProfile>();
        assert!(profile.id.as_i64() > 0);
        assert_eq!(profile.email.as_ref(), "test@test.com");
        assert!(!profile.is_superuser);
    }

    #[tokio::test]
    async fn register_fails_with_invalid_email() {
        let server = TestServer::try_new(build_test_router(get_test_state())).unwrap();

        server
            .post("/register")
            .content_type("application/json")
            .json(&json!({
                "email": "notanemail",
                "password": "averysecurepassword",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_fails_with_short_password() {
        let server = TestServer::try_new(build_test_router(get_test_state())).unwrap();

        server
            .post("/register")
            .content_type("application/json")
            .json(&json!({
                "email": "test@test.com",
                "password": "hunter2",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_fails_with_duplicate_email() {
        let server = TestServer::try_new(build_test_router(get_test_state())).unwrap();

        register_and_sign_in(&server, "test@test.com", "averysecurepassword").await;

        server
            .post("/register")
            .content_type("application/json")
            .json(&json!({
                "email": "test@test.com",
                "password": "anothersecurepassword",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn sign_in_fails_with_invalid_credentials() {
        let server = TestServer::try_new(build_test_router(get_test_state())).unwrap();

        server
            .post("/sign_in")
            .content_type("application/json")
            .json(&json!({
                "email": "wrongemail@gmail.com",
                "password": "definitelyNotTheCorrectPassword",
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn get_protected_route_with_valid_jwt() {
        let server = TestServer::try_new(build_test_router(get_test_state())).unwrap();

        let token = register_and_sign_in(&server, "test@test.com", "averysecurepassword").await;

        server
            .get("/protected")
            .authorization_bearer(token)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn get_protected_route_with_missing_header() {
        let server = TestServer::try_new(build_test_router(get_test_state())).unwrap();

        server
            .get("/protected")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_protected_route_with_garbage_token() {
        let server = TestServer::try_new(build_test_router(get_test_state())).unwrap();

        server
            .get("/protected")
            .authorization_bearer("notavalidtoken")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn superuser_route_rejects_regular_user() {
        let server = TestServer::try_new(build_test_router(get_test_state())).unwrap();

        let token = register_and_sign_in(&server, "test@test.com", "averysecurepassword").await;

        server
            .get("/superuser_only")
            .authorization_bearer(token)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn superuser_route_accepts_superuser() {
        let state = get_test_state();
        ensure_superuser(
            &state.store(),
            &Email::new_unchecked("admin@example.com"),
            &RawPassword::new_unchecked("averysecurepassword"),
        )
        .unwrap();
        let server = TestServer::try_new(build_test_router(state)).unwrap();

        let response = server
            .post("/sign_in")
            .content_type("application/json")
            .json(&json!({
                "email": "admin@example.com",
                "password": "averysecurepassword",
            }))
            .await;

        response.assert_status_ok();
        let token = response.json::<String>();

        server
            .get("/superuser_only")
            .authorization_bearer(token)
            .await
            .assert_status_ok();
    }
}
