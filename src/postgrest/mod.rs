//! Database operations through the PostgREST API

mod filter;
mod query;
mod types;

use reqwest::Client;
use serde::Serialize;

use crate::config::ClientOptions;

pub use filter::*;
pub use query::*;
pub use types::*;

use query::RequestTarget;

/// Client for database operations on one table
pub struct PostgrestClient {
    target: RequestTarget,
}

impl PostgrestClient {
    /// Create a new PostgrestClient; `key` is sent both as `apikey` and as the bearer token
    pub fn new(url: &str, key: &str, table: &str, client: Client, options: &ClientOptions) -> Self {
        Self {
            target: RequestTarget {
                url: format!("{}/rest/v1/{}", url.trim_end_matches('/'), table),
                key: key.to_string(),
                schema: options.db_schema.clone(),
                client_info: options.client_info.clone(),
                timeout: options.request_timeout,
                client,
            },
        }
    }

    /// Select specific columns from the table
    pub fn select(&self, columns: &str) -> SelectBuilder {
        SelectBuilder::new(self.target.clone(), columns)
    }

    /// Insert data into the table
    pub fn insert<T: Serialize>(&self, values: T) -> InsertBuilder<T> {
        InsertBuilder::new(self.target.clone(), values)
    }

    /// Update data in the table
    pub fn update<T: Serialize>(&self, values: T) -> UpdateBuilder<T> {
        UpdateBuilder::new(self.target.clone(), values)
    }

    /// Delete data from the table
    pub fn delete(&self) -> DeleteBuilder {
        DeleteBuilder::new(self.target.clone())
    }
}
