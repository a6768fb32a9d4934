//! Configuration for the provider client and the HTTP server

use std::env;
use std::time::Duration;

use tracing::info;

use crate::error::{Error, Result};

/// Configuration options for the Supabase client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// The database schema
    pub db_schema: String,

    /// Value of the `X-Client-Info` header sent with every request
    pub client_info: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            db_schema: "public".to_string(),
            client_info: concat!("stockhome-api/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the database schema
    pub fn with_db_schema(mut self, value: &str) -> Self {
        self.db_schema = value.to_string();
        self
    }

    /// Set the client info header
    pub fn with_client_info(mut self, value: &str) -> Self {
        self.client_info = value.to_string();
        self
    }
}

/// Server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Used for data access when present
    pub supabase_service_role_key: Option<String>,
    /// Allowed CORS origin; `*` mirrors the request origin
    pub cors_origin: String,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from the process environment, reading `.env` first
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| Error::config(format!("Missing environment variable '{}'", key)))
        };

        let supabase_url = required("SUPABASE_URL")?.trim_end_matches('/').to_string();
        let supabase_anon_key = required("SUPABASE_ANON_KEY")?;
        let supabase_service_role_key = get("SUPABASE_SERVICE_ROLE_KEY");

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = get("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| Error::config(format!("Invalid PORT: {}", e)))?;
        let cors_origin = get("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:5000".to_string());
        let request_timeout = get("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| Error::config(format!("Invalid REQUEST_TIMEOUT_SECS: {}", e)))?;

        info!(
            host = %host,
            port,
            service_role = supabase_service_role_key.is_some(),
            "Configuration loaded"
        );

        Ok(Self {
            host,
            port,
            supabase_url,
            supabase_anon_key,
            supabase_service_role_key,
            cors_origin,
            request_timeout,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Options for the provider client derived from this configuration
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::default().with_request_timeout(Some(self.request_timeout))
    }
}
