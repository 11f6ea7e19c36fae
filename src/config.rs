//! Configuration options for the backend client

use std::env;
use std::time::Duration;

use crate::error::Error;

/// Environment variable holding the project URL
pub const URL_VAR: &str = "SUPABASE_URL";

/// Environment variable holding the anonymous API key
pub const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";

/// Configuration options for the backend client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Whether an expired session is refreshed when checked
    pub auto_refresh_token: bool,

    /// Whether sign-in keeps the session in memory
    pub persist_session: bool,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// The database schema
    pub db_schema: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            auto_refresh_token: true,
            persist_session: true,
            request_timeout: Some(Duration::from_secs(30)),
            db_schema: "public".to_string(),
        }
    }
}

impl ClientOptions {
    /// Set whether to automatically refresh the token
    pub fn with_auto_refresh_token(mut self, value: bool) -> Self {
        self.auto_refresh_token = value;
        self
    }

    /// Set whether to persist the session
    pub fn with_persist_session(mut self, value: bool) -> Self {
        self.persist_session = value;
        self
    }

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
}

/// Connection settings for one backend project
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub options: ClientOptions,
}

impl BackendConfig {
    pub fn new(url: &str, anon_key: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            options: ClientOptions::default(),
        }
    }

    /// Read `SUPABASE_URL` and `SUPABASE_ANON_KEY` from the environment
    pub fn from_env() -> Result<Self, Error> {
        let url = env::var(URL_VAR).map_err(|_| Error::config(format!("{} must be set", URL_VAR)))?;
        let key = env::var(ANON_KEY_VAR)
            .map_err(|_| Error::config(format!("{} must be set", ANON_KEY_VAR)))?;

        url::Url::parse(&url)?;

        Ok(Self::new(&url, &key))
    }

    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_dropped() {
        let config = BackendConfig::new("https://demo.supabase.co/", "anon");
        assert_eq!(config.url, "https://demo.supabase.co");
        assert_eq!(config.options.db_schema, "public");
        assert_eq!(config.options.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_options_builder() {
        let options = ClientOptions::default()
            .with_auto_refresh_token(false)
            .with_request_timeout(None)
            .with_db_schema("content");
        assert!(!options.auto_refresh_token);
        assert!(options.persist_session);
        assert_eq!(options.request_timeout, None);
        assert_eq!(options.db_schema, "content");
    }
}
