//! Portfolio content client
//!
//! Public pages and the admin panel of a portfolio site, backed by a hosted
//! Supabase project. Every screen reads and writes remote tables through the
//! [`TableStore`](store::TableStore) seam; admin screens share one
//! load/submit/remove contract in [`crud`].

pub mod admin;
pub mod auth;
pub mod config;
pub mod crud;
pub mod error;
pub mod facet;
pub mod fetch;
pub mod form;
pub mod guard;
pub mod models;
pub mod notify;
pub mod postgrest;
pub mod routes;
pub mod singleton;
pub mod site;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::info;

use crate::auth::Auth;
use crate::config::{BackendConfig, ClientOptions};
use crate::error::Error;
use crate::postgrest::{SelectBuilder, TableClient};
use crate::store::{Query, TableStore, ID_COLUMN};

/// The main entry point: one per process
pub struct Backend {
    /// The base URL for the project
    pub url: String,
    /// The anonymous API key for the project
    pub key: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Auth client, also the shared session context
    pub auth: Auth,
    /// Client options
    pub options: ClientOptions,
}

impl Backend {
    /// Create a new backend client
    ///
    /// # Example
    ///
    /// ```
    /// use portfolio_supabase::Backend;
    ///
    /// let backend = Backend::new("https://your-project.supabase.co", "your-anon-key").unwrap();
    /// ```
    pub fn new(url: &str, key: &str) -> Result<Self, Error> {
        Self::new_with_options(url, key, ClientOptions::default())
    }

    /// Create a new backend client with custom options
    pub fn new_with_options(url: &str, key: &str, options: ClientOptions) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let url = url.trim_end_matches('/');
        let auth = Auth::new(url, key, http_client.clone(), options.clone());

        Ok(Self {
            url: url.to_string(),
            key: key.to_string(),
            http_client,
            auth,
            options,
        })
    }

    /// Create a backend client from loaded configuration
    pub fn from_config(config: BackendConfig) -> Result<Self, Error> {
        Self::new_with_options(&config.url, &config.anon_key, config.options)
    }

    /// Get a reference to the auth client
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Create a client for one table, carrying the current session's token
    pub fn from(&self, table: &str) -> TableClient {
        TableClient::new(
            &self.url,
            &self.key,
            &self.auth.access_token(),
            &self.options.db_schema,
            table,
            self.http_client.clone(),
        )
    }
}

impl Backend {
    fn select_builder(&self, table: &str, query: &Query) -> SelectBuilder {
        let mut select = self.from(table).select("*");
        for filter in &query.filters {
            select.eq(&filter.column, &filter.value);
        }
        if let Some(order) = &query.order {
            select.order(&order.column, order.ascending);
        }
        if let Some(limit) = query.limit {
            select.limit(limit);
        }
        select
    }
}

#[async_trait]
impl TableStore for Backend {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, Error> {
        self.select_builder(table, query).execute::<Value>().await
    }

    async fn select_one(&self, table: &str, query: &Query) -> Result<Option<Value>, Error> {
        self.select_builder(table, query).single::<Value>().await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), Error> {
        self.from(table).insert(row).execute_no_return().await?;
        info!(table, "row inserted");
        Ok(())
    }

    async fn update(&self, table: &str, id: &str, fields: Value) -> Result<(), Error> {
        self.from(table)
            .update(fields)
            .eq(ID_COLUMN, id)
            .execute_no_return()
            .await?;
        info!(table, id, "row updated");
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), Error> {
        self.from(table)
            .delete()
            .eq(ID_COLUMN, id)
            .execute_no_return()
            .await?;
        info!(table, id, "row deleted");
        Ok(())
    }

    async fn count(&self, table: &str) -> Result<u64, Error> {
        self.from(table).count().await
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::{BackendConfig, ClientOptions};
    pub use crate::crud::CrudController;
    pub use crate::error::{Error, SyncError, ValidationError};
    pub use crate::notify::{Confirm, Notice, NoticeLog, Notifier};
    pub use crate::store::{Query, TableStore};
    pub use crate::Backend;
}
