//! Types for authentication and user management

use serde::{Deserialize, Serialize};

use super::Session;

/// A user as known to the auth provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The user ID
    pub id: String,

    /// The user's email address
    pub email: Option<String>,

    /// The user's role
    pub role: Option<String>,

    /// Whether the email has been confirmed
    pub email_confirmed_at: Option<String>,

    /// The creation time
    pub created_at: Option<String>,
}

/// Response of the sign-up endpoint.
///
/// The provider answers with a full session when email confirmation is
/// disabled and with the bare user otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(Session),
    User(User),
}

impl SignUpResponse {
    pub fn user(&self) -> &User {
        match self {
            SignUpResponse::Session(session) => &session.user,
            SignUpResponse::User(user) => user,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordCredentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefreshTokenGrant<'a> {
    pub refresh_token: &'a str,
}

/// Error body returned by the auth provider; the field used depends on the endpoint
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AuthErrorBody {
    pub error: Option<String>,
    pub error_description: Option<String>,
    pub msg: Option<String>,
    pub message: Option<String>,
}

impl AuthErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}
