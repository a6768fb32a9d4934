//! StockHome API
//!
//! A household inventory and shopping-list backend. Data lives in a Supabase
//! project: rows are read and written through PostgREST and users are managed
//! by Supabase Auth. Every query is scoped to the owning user's id.
//!
//! The crate is layered as routes ([`api`]) over repositories
//! ([`repository`], [`analytics`]) over a small Supabase client
//! ([`Supabase`], [`postgrest`], [`auth`]).

pub mod analytics;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod postgrest;
pub mod repository;

use reqwest::Client;

use crate::auth::Auth;
use crate::config::{AppConfig, ClientOptions};
use crate::postgrest::PostgrestClient;

/// Entry point to the Supabase project backing the API
#[derive(Clone)]
pub struct Supabase {
    /// The base URL for the Supabase project
    url: String,
    /// Key used for database requests (service role when configured, anon otherwise)
    db_key: String,
    /// HTTP client used for requests
    http_client: Client,
    /// Auth client for user management and authentication
    auth: Auth,
    /// Client options
    options: ClientOptions,
}

impl Supabase {
    /// Create a new Supabase client
    ///
    /// # Example
    ///
    /// ```
    /// use stockhome_api::Supabase;
    ///
    /// let supabase = Supabase::new("https://your-project-url.supabase.co", "your-anon-key");
    /// let items = supabase.from("items");
    /// ```
    pub fn new(supabase_url: &str, supabase_key: &str) -> Self {
        Self::new_with_options(supabase_url, supabase_key, ClientOptions::default())
    }

    /// Create a new Supabase client with custom options
    pub fn new_with_options(supabase_url: &str, supabase_key: &str, options: ClientOptions) -> Self {
        let http_client = Client::new();
        let url = supabase_url.trim_end_matches('/').to_string();
        let auth = Auth::new(&url, supabase_key, http_client.clone(), options.clone());

        Self {
            url,
            db_key: supabase_key.to_string(),
            http_client,
            auth,
            options,
        }
    }

    /// Use a different key (typically the service role key) for database requests
    pub fn with_db_key(mut self, key: &str) -> Self {
        self.db_key = key.to_string();
        self
    }

    /// Build the client described by the server configuration
    pub fn from_config(config: &AppConfig) -> Self {
        let supabase = Self::new_with_options(
            &config.supabase_url,
            &config.supabase_anon_key,
            config.client_options(),
        );
        match &config.supabase_service_role_key {
            Some(key) => supabase.with_db_key(key),
            None => supabase,
        }
    }

    /// Get a reference to the auth client
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Create a new PostgrestClient for database operations on a specific table
    pub fn from(&self, table: &str) -> PostgrestClient {
        PostgrestClient::new(
            &self.url,
            &self.db_key,
            table,
            self.http_client.clone(),
            &self.options,
        )
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::{AppConfig, ClientOptions};
    pub use crate::error::{Error, Result};
    pub use crate::postgrest::{Filterable, SortOrder};
    pub use crate::Supabase;
}
