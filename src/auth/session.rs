//! Session data issued by the auth provider

use serde::{Deserialize, Serialize};

use super::User;

/// Session data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The access token
    pub access_token: String,

    /// The refresh token
    pub refresh_token: String,

    /// The token type
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// The expiry time in seconds
    #[serde(default)]
    pub expires_in: i64,

    /// The expiry timestamp
    pub expires_at: Option<i64>,

    /// The user the session belongs to
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}
