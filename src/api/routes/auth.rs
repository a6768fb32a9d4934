use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::api::{bearer_token, ApiResponse, AppState, AuthUser, JsonBody};
use crate::auth::Session;
use crate::error::{Error, Result};
use crate::models::{UpdateUser, User};

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh", post(refresh))
        .route("/me", get(me).put(update_me))
}

#[derive(Debug, Deserialize)]
struct SignUpRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    nome: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
struct RefreshRequest {
    #[serde(default)]
    refresh_token: String,
}

/// Profile plus the tokens of a fresh session
#[derive(Debug, Serialize)]
struct AuthPayload {
    user: User,
    token: String,
    refresh_token: String,
}

impl AuthPayload {
    fn new(user: User, session: Session) -> Self {
        Self {
            user,
            token: session.access_token,
            refresh_token: session.refresh_token,
        }
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(format!("'{}' is required", field)));
    }
    Ok(value)
}

async fn profile(state: &AppState, user_id: &str) -> Result<User> {
    state
        .users
        .get(user_id)
        .await?
        .ok_or_else(|| Error::not_found("user profile"))
}

async fn signup(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SignUpRequest>,
) -> ApiResponse<AuthPayload> {
    ApiResponse::from_result(sign_up(&state, &body).await, "Failed to sign up")
}

/// Register with the provider, create the profile row, then sign in
async fn sign_up(state: &AppState, body: &SignUpRequest) -> Result<AuthPayload> {
    let email = required("email", &body.email)?;
    let password = required("password", &body.password)?;
    let auth = state.supabase.auth();

    let registered = auth.sign_up(email, password).await?;
    let name = body
        .nome
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or(email));
    let user = state.users.create(&registered.user().id, email, name).await?;

    let session = auth.sign_in_with_password(email, password).await?;
    Ok(AuthPayload::new(user, session))
}

async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> ApiResponse<AuthPayload> {
    ApiResponse::from_result(log_in(&state, &body).await, "Failed to log in")
}

async fn log_in(state: &AppState, body: &LoginRequest) -> Result<AuthPayload> {
    let email = required("email", &body.email)?;
    let password = required("password", &body.password)?;

    let session = state
        .supabase
        .auth()
        .sign_in_with_password(email, password)
        .await?;
    let user = profile(state, &session.user.id).await?;
    Ok(AuthPayload::new(user, session))
}

/// Revokes the caller's session when a token is supplied
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResponse<()> {
    let result = match bearer_token(&headers) {
        Some(token) => state.supabase.auth().sign_out(token).await,
        None => Ok(()),
    };
    ApiResponse::done(result, "Logged out", "Failed to log out")
}

async fn refresh(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RefreshRequest>,
) -> ApiResponse<AuthPayload> {
    ApiResponse::from_result(refresh_session(&state, &body).await, "Failed to refresh session")
}

async fn refresh_session(state: &AppState, body: &RefreshRequest) -> Result<AuthPayload> {
    let refresh_token = required("refresh_token", &body.refresh_token)?;
    let session = state.supabase.auth().refresh_session(refresh_token).await?;
    let user = profile(state, &session.user.id).await?;
    Ok(AuthPayload::new(user, session))
}

async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResponse<User> {
    ApiResponse::from_result(profile(&state, &user.id).await, "Failed to fetch user")
}

async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(changes): JsonBody<UpdateUser>,
) -> ApiResponse<User> {
    ApiResponse::from_result(
        state.users.update(&user.id, &changes).await,
        "Failed to update user",
    )
    .with_success_message("Profile updated")
}
