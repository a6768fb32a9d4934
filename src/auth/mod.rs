//! Authentication through the Supabase auth (GoTrue) API
//!
//! The client is stateless: sessions are handed back to the caller and
//! every token is passed in explicitly.

mod session;
mod types;

use reqwest::{Client, Method, StatusCode};
use tracing::{debug, info};

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{FetchBuilder, FetchResponse};

pub use session::*;
pub use types::*;

/// Client for Supabase Authentication
#[derive(Clone)]
pub struct Auth {
    /// The base URL for the Supabase project
    url: String,

    /// The anonymous API key for the Supabase project
    key: String,

    /// HTTP client used for requests
    client: Client,

    /// Client options
    options: ClientOptions,
}

impl Auth {
    /// Create a new Auth client
    pub fn new(url: &str, key: &str, client: Client, options: ClientOptions) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            client,
            options,
        }
    }

    fn get_auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.url, path)
    }

    fn request(&self, method: Method, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(&self.client, &self.get_auth_url(path), method)
            .header("apikey", &self.key)
            .header("X-Client-Info", &self.options.client_info)
            .timeout(self.options.request_timeout)
    }

    /// Sign up a new user with email and password
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResponse, Error> {
        let response = self
            .request(Method::POST, "/signup")
            .json(&PasswordCredentials { email, password })?
            .send()
            .await?;

        let result: SignUpResponse = check(response)?.json()?;
        info!(user_id = %result.user().id, "User signed up");
        Ok(result)
    }

    /// Sign in a user with email and password
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, Error> {
        let response = self
            .request(Method::POST, "/token")
            .query(&[("grant_type".to_string(), "password".to_string())])
            .json(&PasswordCredentials { email, password })?
            .send()
            .await?;

        let session: Session = check(response)?.json()?;
        info!(user_id = %session.user.id, "User signed in");
        Ok(session)
    }

    /// Exchange a refresh token for a new session
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<Session, Error> {
        let response = self
            .request(Method::POST, "/token")
            .query(&[("grant_type".to_string(), "refresh_token".to_string())])
            .json(&RefreshTokenGrant { refresh_token })?
            .send()
            .await?;

        let session: Session = check(response)?.json()?;
        debug!(user_id = %session.user.id, "Session refreshed");
        Ok(session)
    }

    /// Resolve an access token to the user it was issued for
    pub async fn get_user(&self, access_token: &str) -> Result<User, Error> {
        let response = self
            .request(Method::GET, "/user")
            .bearer_auth(access_token)
            .send()
            .await?;

        check(response)?.json()
    }

    /// Revoke the session behind an access token
    pub async fn sign_out(&self, access_token: &str) -> Result<(), Error> {
        let response = self
            .request(Method::POST, "/logout")
            .bearer_auth(access_token)
            .send()
            .await?;

        check(response)?;
        Ok(())
    }
}

fn check(response: FetchResponse) -> Result<FetchResponse, Error> {
    if response.is_success() {
        return Ok(response);
    }

    let message = serde_json::from_str::<AuthErrorBody>(&response.body)
        .ok()
        .and_then(AuthErrorBody::into_message)
        .unwrap_or_else(|| format!("request failed with status {}", response.status));

    match response.status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::unauthorized(message)),
        _ => Err(Error::auth(message)),
    }
}
