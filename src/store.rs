//! The table-store seam every screen talks through

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Error;
use crate::postgrest::{Filter, Order};

/// Primary key column shared by every table
pub const ID_COLUMN: &str = "id";

/// Filter, order and limit for a collection read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq<T: ToString>(mut self, column: &str, value: T) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.limit = Some(count);
        self
    }
}

/// Remote table storage.
///
/// Each call is one atomic remote operation; a multi-field update is one
/// call, never one per field.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Read rows matching the query
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, Error>;

    /// First row matching the query, if any
    async fn select_one(&self, table: &str, query: &Query) -> Result<Option<Value>, Error> {
        let rows = self.select(table, &query.clone().limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert one row; the store assigns its key
    async fn insert(&self, table: &str, row: Value) -> Result<(), Error>;

    /// Write the given fields onto the row with this key
    async fn update(&self, table: &str, id: &str, fields: Value) -> Result<(), Error>;

    /// Delete the row with this key
    async fn delete(&self, table: &str, id: &str) -> Result<(), Error>;

    /// Exact number of rows in the table
    async fn count(&self, table: &str) -> Result<u64, Error>;
}
