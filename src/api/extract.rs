//! Request extractors shared by the route handlers

use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use super::envelope::ApiResponse;
use super::state::AppState;
use crate::models::PageRequest;

/// The caller resolved from a valid bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
}

/// Token from an `Authorization: Bearer <token>` header, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn unauthorized(error: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::rejected(error, "UNAUTHORIZED")),
    )
        .into_response()
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| unauthorized("Unauthorized: No token provided"))?;

        match state.supabase.auth().get_user(token).await {
            Ok(user) => Ok(AuthUser { id: user.id }),
            Err(err) => {
                warn!(error = %err, "Rejected bearer token");
                Err(unauthorized("Unauthorized: Invalid token"))
            }
        }
    }
}

/// JSON body whose rejection is a failure envelope instead of plain text
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(body_rejected(rejection)),
        }
    }
}

fn body_rejected(rejection: JsonRejection) -> Response {
    warn!(error = %rejection.body_text(), "Rejected request body");
    (
        rejection.status(),
        Json(ApiResponse::rejected(rejection.body_text(), "VALIDATION_ERROR")),
    )
        .into_response()
}

/// `?page=&limit=`, kept as text so bad values fall back to defaults
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn resolve(&self, default_limit: u64) -> PageRequest {
        PageRequest::new(
            positive(self.page.as_deref()).unwrap_or(1),
            positive(self.limit.as_deref()).unwrap_or(default_limit),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ExpiringQuery {
    pub days: Option<String>,
}

impl ExpiringQuery {
    pub fn days_or(&self, default: u32) -> u32 {
        self.days
            .as_deref()
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(default)
    }
}

fn positive(value: Option<&str>) -> Option<u64> {
    value?.trim().parse().ok().filter(|v| *v > 0)
}
