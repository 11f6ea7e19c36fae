//! Request builders for the table client

use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Error;
use crate::fetch::FetchBuilder;
use crate::postgrest::filter::{Filter, Order};
use crate::postgrest::types::{parse_content_range, CountOption, ReturnOption};

/// Everything a request to one table needs besides its own parameters
#[derive(Clone)]
pub struct RequestContext {
    /// Table endpoint, `{project}/rest/v1/{table}`
    pub(crate) url: String,
    /// The API key
    pub(crate) key: String,
    /// Bearer token: the session's access token or the API key
    pub(crate) token: String,
    /// Database schema
    pub(crate) schema: String,
    /// HTTP client
    pub(crate) client: Client,
}

impl RequestContext {
    fn request(&self, method: Method) -> FetchBuilder<'_> {
        let profile = if method == Method::GET {
            "Accept-Profile"
        } else {
            "Content-Profile"
        };
        FetchBuilder::new(&self.client, &self.url, method)
            .header("apikey", &self.key)
            .header(profile, &self.schema)
            .bearer_auth(&self.token)
    }
}

/// Ordered query parameters
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    params: Vec<(String, String)>,
}

impl QueryBuilder {
    /// Create a new QueryBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing an earlier one with the same key
    pub fn set_param(&mut self, key: &str, value: &str) {
        self.params.retain(|(k, _)| k != key);
        self.params.push((key.to_string(), value.to_string()));
    }

    /// Add a parameter; repeated keys are kept
    pub fn add_param(&mut self, key: &str, value: &str) {
        self.params.push((key.to_string(), value.to_string()));
    }

    /// Get the query parameters
    pub fn get_params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Builder for SELECT queries
pub struct SelectBuilder {
    ctx: RequestContext,
    query: QueryBuilder,
}

impl SelectBuilder {
    pub(crate) fn new(ctx: RequestContext, columns: &str) -> Self {
        let mut query = QueryBuilder::new();
        query.set_param("select", columns);
        Self { ctx, query }
    }

    /// Filter rows where column equals a value
    pub fn eq<T: ToString>(&mut self, column: &str, value: T) -> &mut Self {
        let (key, value) = Filter::eq(column, value).to_param();
        self.query.add_param(&key, &value);
        self
    }

    /// Order the results by a column
    pub fn order(&mut self, column: &str, ascending: bool) -> &mut Self {
        let order = Order {
            column: column.to_string(),
            ascending,
        };
        let (key, value) = order.to_param();
        self.query.set_param(&key, &value);
        self
    }

    /// Limit the number of rows returned
    pub fn limit(&mut self, count: usize) -> &mut Self {
        self.query.set_param("limit", &count.to_string());
        self
    }

    /// Execute the query and return the results
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        self.ctx
            .request(Method::GET)
            .query(self.query.get_params())
            .execute::<Vec<T>>()
            .await
    }

    /// Fetch at most one row; `None` when nothing matches
    pub async fn single<T: DeserializeOwned>(&mut self) -> Result<Option<T>, Error> {
        self.limit(1);
        let rows = self.execute::<T>().await?;
        Ok(rows.into_iter().next())
    }

    /// Execute the query and return only the number of matching rows
    pub async fn count(&self, option: CountOption) -> Result<u64, Error> {
        let mut query = self.query.clone();
        query.set_param("limit", "1");

        let response = self
            .ctx
            .request(Method::GET)
            .header("Prefer", &format!("count={}", option.as_str()))
            .query(query.get_params())
            .send()
            .await?;

        response
            .headers()
            .get("Content-Range")
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| Error::general("response carried no usable Content-Range"))
    }
}

/// Builder for INSERT queries
pub struct InsertBuilder<T: Serialize> {
    ctx: RequestContext,
    values: T,
}

impl<T: Serialize> InsertBuilder<T> {
    pub(crate) fn new(ctx: RequestContext, values: T) -> Self {
        Self { ctx, values }
    }

    /// Execute the insert without returning the inserted data
    pub async fn execute_no_return(&self) -> Result<(), Error> {
        self.ctx
            .request(Method::POST)
            .header("Prefer", ReturnOption::Minimal.as_header())
            .json(&self.values)?
            .send()
            .await?;
        Ok(())
    }
}

/// Builder for UPDATE queries
pub struct UpdateBuilder<T: Serialize> {
    ctx: RequestContext,
    values: T,
    query: QueryBuilder,
}

impl<T: Serialize> UpdateBuilder<T> {
    pub(crate) fn new(ctx: RequestContext, values: T) -> Self {
        Self {
            ctx,
            values,
            query: QueryBuilder::new(),
        }
    }

    /// Filter rows where column equals a value
    pub fn eq<V: ToString>(&mut self, column: &str, value: V) -> &mut Self {
        let (key, value) = Filter::eq(column, value).to_param();
        self.query.add_param(&key, &value);
        self
    }

    /// Execute the update without returning the updated data
    pub async fn execute_no_return(&self) -> Result<(), Error> {
        if self.query.get_params().is_empty() {
            return Err(Error::general("refusing to update without a filter"));
        }
        self.ctx
            .request(Method::PATCH)
            .header("Prefer", ReturnOption::Minimal.as_header())
            .query(self.query.get_params())
            .json(&self.values)?
            .send()
            .await?;
        Ok(())
    }
}

/// Builder for DELETE queries
pub struct DeleteBuilder {
    ctx: RequestContext,
    query: QueryBuilder,
}

impl DeleteBuilder {
    pub(crate) fn new(ctx: RequestContext) -> Self {
        Self {
            ctx,
            query: QueryBuilder::new(),
        }
    }

    /// Filter rows where column equals a value
    pub fn eq<V: ToString>(&mut self, column: &str, value: V) -> &mut Self {
        let (key, value) = Filter::eq(column, value).to_param();
        self.query.add_param(&key, &value);
        self
    }

    /// Execute the delete without returning the deleted data
    pub async fn execute_no_return(&self) -> Result<(), Error> {
        if self.query.get_params().is_empty() {
            return Err(Error::general("refusing to delete without a filter"));
        }
        self.ctx
            .request(Method::DELETE)
            .header("Prefer", ReturnOption::Minimal.as_header())
            .query(self.query.get_params())
            .send()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_param_replaces() {
        let mut query = QueryBuilder::new();
        query.set_param("limit", "10");
        query.add_param("id", "eq.1");
        query.set_param("limit", "1");
        assert_eq!(
            query.get_params(),
            &[
                ("id".to_string(), "eq.1".to_string()),
                ("limit".to_string(), "1".to_string())
            ]
        );
    }
}
