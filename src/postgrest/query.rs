//! Query builders for PostgrestClient

use std::time::Duration;

use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Error;
use crate::fetch::{FetchBuilder, FetchResponse};
use crate::postgrest::filter::{Filter, Filterable};
use crate::postgrest::types::*;

/// Everything needed to address one table
#[derive(Debug, Clone)]
pub(crate) struct RequestTarget {
    pub(crate) url: String,
    pub(crate) key: String,
    pub(crate) schema: String,
    pub(crate) client_info: String,
    pub(crate) timeout: Option<Duration>,
    pub(crate) client: Client,
}

impl RequestTarget {
    fn fetch(&self, method: Method) -> FetchBuilder<'_> {
        let profile_header = if method == Method::GET || method == Method::HEAD {
            "Accept-Profile"
        } else {
            "Content-Profile"
        };

        let mut fetch = FetchBuilder::new(&self.client, &self.url, method)
            .header("apikey", &self.key)
            .header("X-Client-Info", &self.client_info)
            .bearer_auth(&self.key)
            .timeout(self.timeout);
        if self.schema != "public" {
            fetch = fetch.header(profile_header, &self.schema);
        }
        fetch
    }
}

/// Query parameters shared by all builders
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    params: Vec<(String, String)>,
    filters: Vec<Filter>,
}

impl QueryBuilder {
    /// Create a new QueryBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing a previous value for the same key
    pub fn set_param(&mut self, key: &str, value: &str) {
        self.params.retain(|(k, _)| k != key);
        self.params.push((key.to_string(), value.to_string()));
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Filters first, then the remaining parameters
    pub fn to_params(&self) -> Vec<(String, String)> {
        self.filters
            .iter()
            .map(Filter::to_param)
            .chain(self.params.iter().cloned())
            .collect()
    }
}

/// Turn a non-success response into an error
fn check(response: FetchResponse) -> Result<FetchResponse, Error> {
    if response.is_success() {
        return Ok(response);
    }

    let details = serde_json::from_str::<PostgrestErrorDetails>(&response.body).unwrap_or_else(|_| {
        PostgrestErrorDetails {
            message: Some(response.body.clone()),
            ..Default::default()
        }
    });

    if details.code.as_deref() == Some(NO_ROWS_CODE) {
        return Err(Error::not_found(
            details.message.as_deref().unwrap_or("no rows returned"),
        ));
    }

    Err(Error::Database {
        status: response.status.as_u16(),
        details,
    })
}

/// Builder for SELECT queries
pub struct SelectBuilder {
    target: RequestTarget,
    query: QueryBuilder,
    count: Option<CountOption>,
}

impl Filterable for SelectBuilder {
    fn filters_mut(&mut self) -> &mut Vec<Filter> {
        &mut self.query.filters
    }
}

impl SelectBuilder {
    pub(crate) fn new(target: RequestTarget, columns: &str) -> Self {
        let mut query = QueryBuilder::new();
        query.set_param("select", columns);

        Self {
            target,
            query,
            count: None,
        }
    }

    /// Order the results by a column
    pub fn order(mut self, column: &str, order: SortOrder) -> Self {
        self.query
            .set_param("order", &format!("{}.{}", column, order.as_str()));
        self
    }

    /// Limit the number of rows returned
    pub fn limit(mut self, count: u64) -> Self {
        self.query.set_param("limit", &count.to_string());
        self
    }

    /// Skip a number of rows
    pub fn offset(mut self, count: u64) -> Self {
        self.query.set_param("offset", &count.to_string());
        self
    }

    /// Restrict the result to rows `from..=to` (zero based)
    pub fn range(self, from: u64, to: u64) -> Self {
        let count = to.saturating_sub(from) + 1;
        self.offset(from).limit(count)
    }

    /// Ask the server to report a total row count
    pub fn count(mut self, option: CountOption) -> Self {
        self.count = Some(option);
        self
    }

    fn fetch(&self) -> FetchBuilder<'_> {
        let mut fetch = self.target.fetch(Method::GET).query(&self.query.to_params());
        if let Some(count) = self.count {
            fetch = fetch.header("Prefer", &format!("count={}", count.as_str()));
        }
        fetch
    }

    /// Execute the query and return the rows
    pub async fn execute<T: DeserializeOwned>(self) -> Result<Vec<T>, Error> {
        let response = check(self.fetch().send().await?)?;
        response.json()
    }

    /// Execute the query and return the rows plus the server-side total
    pub async fn execute_with_count<T: DeserializeOwned>(self) -> Result<CountedRows<T>, Error> {
        let builder = if self.count.is_none() {
            self.count(CountOption::Exact)
        } else {
            self
        };
        let response = check(builder.fetch().send().await?)?;
        let rows: Vec<T> = response.json()?;
        let total = response
            .header("Content-Range")
            .and_then(parse_content_range_total)
            .unwrap_or(rows.len() as u64);

        Ok(CountedRows { rows, total })
    }

    /// Execute the query expecting exactly one row
    pub async fn single<T: DeserializeOwned>(self) -> Result<T, Error> {
        let response = check(
            self.fetch()
                .header("Accept", SINGLE_OBJECT_MEDIA_TYPE)
                .send()
                .await?,
        )?;
        response.json()
    }
}

/// Builder for INSERT queries
pub struct InsertBuilder<T: Serialize> {
    target: RequestTarget,
    values: T,
}

impl<T: Serialize> InsertBuilder<T> {
    pub(crate) fn new(target: RequestTarget, values: T) -> Self {
        Self { target, values }
    }

    /// Insert a single row and return its stored representation
    pub async fn single<R: DeserializeOwned>(self) -> Result<R, Error> {
        let response = self
            .target
            .fetch(Method::POST)
            .header("Prefer", ReturnOption::Representation.as_str())
            .header("Accept", SINGLE_OBJECT_MEDIA_TYPE)
            .json(&self.values)?
            .send()
            .await?;
        check(response)?.json()
    }
}

/// Builder for UPDATE queries
pub struct UpdateBuilder<T: Serialize> {
    target: RequestTarget,
    values: T,
    query: QueryBuilder,
}

impl<T: Serialize> Filterable for UpdateBuilder<T> {
    fn filters_mut(&mut self) -> &mut Vec<Filter> {
        &mut self.query.filters
    }
}

impl<T: Serialize> UpdateBuilder<T> {
    pub(crate) fn new(target: RequestTarget, values: T) -> Self {
        Self {
            target,
            values,
            query: QueryBuilder::new(),
        }
    }

    /// Update exactly one row and return its new representation
    pub async fn single<R: DeserializeOwned>(self) -> Result<R, Error> {
        if !self.query.has_filters() {
            return Err(Error::validation("refusing to update without a filter"));
        }
        let response = self
            .target
            .fetch(Method::PATCH)
            .header("Prefer", ReturnOption::Representation.as_str())
            .header("Accept", SINGLE_OBJECT_MEDIA_TYPE)
            .query(&self.query.to_params())
            .json(&self.values)?
            .send()
            .await?;
        check(response)?.json()
    }
}

/// Builder for DELETE queries
pub struct DeleteBuilder {
    target: RequestTarget,
    query: QueryBuilder,
}

impl Filterable for DeleteBuilder {
    fn filters_mut(&mut self) -> &mut Vec<Filter> {
        &mut self.query.filters
    }
}

impl DeleteBuilder {
    pub(crate) fn new(target: RequestTarget) -> Self {
        Self {
            target,
            query: QueryBuilder::new(),
        }
    }

    /// Delete the matching rows
    pub async fn execute(self) -> Result<(), Error> {
        if !self.query.has_filters() {
            return Err(Error::validation("refusing to delete without a filter"));
        }
        let response = self
            .target
            .fetch(Method::DELETE)
            .header("Prefer", ReturnOption::Minimal.as_str())
            .query(&self.query.to_params())
            .send()
            .await?;
        check(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;
    use reqwest::StatusCode;

    fn response(status: u16, body: &str) -> FetchResponse {
        FetchResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn set_param_replaces_previous_value() {
        let mut query = QueryBuilder::new();
        query.set_param("limit", "10");
        query.set_param("limit", "1");
        assert_eq!(query.to_params(), vec![("limit".to_string(), "1".to_string())]);
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let err = check(response(
            406,
            r#"{"code":"PGRST116","message":"JSON object requested, multiple (or no) rows returned"}"#,
        ))
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn unparsed_error_bodies_are_kept() {
        let err = check(response(502, "bad gateway")).unwrap_err();
        match err {
            Error::Database { status, details } => {
                assert_eq!(status, 502);
                assert_eq!(details.message.as_deref(), Some("bad gateway"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
