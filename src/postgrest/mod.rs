//! Table operations through the PostgREST API

mod filter;
mod query;
mod types;

use reqwest::Client;
use serde::Serialize;

pub use filter::*;
pub use query::*;
pub use types::*;

/// Client for one table or view
pub struct TableClient {
    ctx: RequestContext,
}

impl TableClient {
    /// Create a new TableClient
    pub(crate) fn new(
        url: &str,
        key: &str,
        token: &str,
        schema: &str,
        table: &str,
        client: Client,
    ) -> Self {
        Self {
            ctx: RequestContext {
                url: format!("{}/rest/v1/{}", url, table),
                key: key.to_string(),
                token: token.to_string(),
                schema: schema.to_string(),
                client,
            },
        }
    }

    /// Select specific columns from the table
    pub fn select(&self, columns: &str) -> SelectBuilder {
        SelectBuilder::new(self.ctx.clone(), columns)
    }

    /// Insert data into the table
    pub fn insert<T: Serialize>(&self, values: T) -> InsertBuilder<T> {
        InsertBuilder::new(self.ctx.clone(), values)
    }

    /// Update data in the table
    pub fn update<T: Serialize>(&self, values: T) -> UpdateBuilder<T> {
        UpdateBuilder::new(self.ctx.clone(), values)
    }

    /// Delete data from the table
    pub fn delete(&self) -> DeleteBuilder {
        DeleteBuilder::new(self.ctx.clone())
    }

    /// Exact number of rows in the table
    pub async fn count(&self) -> Result<u64, crate::error::Error> {
        self.select("id").count(CountOption::Exact).await
    }
}
