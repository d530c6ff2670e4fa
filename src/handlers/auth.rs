//! # Auth API Handlers
//!
//! Registration, login, logout and "who am I" over the `session` cookie.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Json},
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{MaybeUser, Session};
use crate::error::{ApiError, bad_request};
use crate::handlers::types::{MessageResponse, required};
use crate::repositories::{PublicUser, UserRepository};
use crate::server::AppState;

/// Registration request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "山田 花子")]
    pub name: Option<String>,
    #[schema(example = "hanako@example.com")]
    pub email: Option<String>,
    /// At least 8 characters
    #[schema(example = "correct horse")]
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "hanako@example.com")]
    pub email: Option<String>,
    #[schema(example = "correct horse")]
    pub password: Option<String>,
}

/// Register/login response
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "logged in")]
    pub message: String,
    pub user: PublicUser,
}

/// Current session, or null when logged out
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: Option<Session>,
}

fn user_repository(state: &AppState) -> UserRepository {
    UserRepository::new(state.db.clone(), state.config.bcrypt_cost)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = UserResponse),
        (status = 400, description = "Missing or invalid fields", body = ApiError),
        (status = 500, description = "Email already registered or database error", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(request) = payload?;

    let (Some(name), Some(email), Some(password)) = (
        required(request.name.as_deref()),
        required(request.email.as_deref()),
        request.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(bad_request("name, email and password are required"));
    };

    let user = user_repository(&state)
        .register_user(name, email, password)
        .await?;

    Ok(Json(UserResponse {
        message: "registered".to_string(),
        user,
    }))
}

/// Log in and receive the session cookie
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; sets the session cookie", body = UserResponse, headers(
            ("Set-Cookie", description = "session cookie, HttpOnly, seven days")
        )),
        (status = 400, description = "Missing fields", body = ApiError),
        (status = 401, description = "Invalid credentials", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;

    let (Some(email), Some(password)) = (
        required(request.email.as_deref()),
        request.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(bad_request("email and password are required"));
    };

    let user = match user_repository(&state).authenticate(email, password).await {
        Ok(user) => user,
        Err(err) => {
            counter!("csa_logins_total", "outcome" => "rejected").increment(1);
            return Err(err.into());
        }
    };

    let cookie = state.sessions.session_cookie(&user.session())?;
    counter!("csa_logins_total", "outcome" => "accepted").increment(1);
    tracing::info!(user_id = user.id, "User logged in");

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(UserResponse {
            message: "logged in".to_string(),
            user,
        }),
    ))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out; clears the session cookie", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> impl IntoResponse {
    if let Some(session) = user {
        tracing::info!(user_id = session.user_id, "User logged out");
    }

    (
        AppendHeaders([(SET_COOKIE, state.sessions.removal_cookie())]),
        Json(MessageResponse::new("logged out")),
    )
}

/// Current session user
///
/// Never fails: a missing or unreadable cookie yields `{"user": null}`.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user or null", body = MeResponse)
    ),
    tag = "auth"
)]
pub async fn me(MaybeUser(user): MaybeUser) -> Json<MeResponse> {
    Json(MeResponse { user })
}
