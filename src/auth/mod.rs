//! Authentication and session state for the admin panel

mod session;
mod types;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

pub use session::*;
pub use types::*;

/// Anything that can answer "is there an active session" and report changes.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolve the current session, refreshing it if needed
    async fn check_session(&self) -> Result<Option<Session>, Error>;

    /// Subscribe to session changes
    fn subscribe(&self) -> SessionSubscription;
}

/// Client for the hosted authentication service.
///
/// One instance is the process-wide session context: screens hold a reference
/// and a [`SessionSubscription`], never their own copy of the session.
pub struct Auth {
    /// The base URL for the project
    url: String,

    /// The anonymous API key for the project
    key: String,

    /// HTTP client used for requests
    client: Client,

    /// The current session, broadcast to subscribers
    session: watch::Sender<Option<Session>>,

    /// Client options
    options: ClientOptions,
}

fn auth_failure(err: Error) -> Error {
    match err {
        Error::Database { message, .. } => Error::Auth(message),
        other => other,
    }
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(url: &str, key: &str, client: Client, options: ClientOptions) -> Self {
        let (session, _) = watch::channel(None);
        Self {
            url: url.to_string(),
            key: key.to_string(),
            client,
            session,
            options,
        }
    }

    fn get_auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.url, path)
    }

    fn store(&self, session: Option<Session>) {
        self.session.send_replace(session);
    }

    /// Sign in a user with email and password
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, Error> {
        let url = self.get_auth_url("/token?grant_type=password");
        let body = PasswordCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        let session = Fetch::post(&self.client, &url)
            .header("apikey", &self.key)
            .json(&body)?
            .execute::<Session>()
            .await
            .map_err(auth_failure)?
            .with_expiry();

        info!(user_id = %session.user.id, "signed in");

        if self.options.persist_session {
            self.store(Some(session.clone()));
        }

        Ok(session)
    }

    /// Sign out the current user.
    ///
    /// The local session is cleared even when the remote call fails.
    pub async fn sign_out(&self) -> Result<(), Error> {
        let token = match self.get_session() {
            Some(session) => session.access_token,
            None => return Err(Error::auth("Not logged in")),
        };

        let url = self.get_auth_url("/logout");
        let result = Fetch::post(&self.client, &url)
            .header("apikey", &self.key)
            .bearer_auth(&token)
            .send()
            .await;

        self.store(None);

        match result {
            Ok(_) => {
                info!("signed out");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "remote sign-out failed; local session cleared");
                Err(auth_failure(err))
            }
        }
    }

    /// Get the user data for the currently authenticated user
    pub async fn get_user(&self) -> Result<User, Error> {
        let token = match self.get_session() {
            Some(session) => session.access_token,
            None => return Err(Error::auth("Not logged in")),
        };

        let url = self.get_auth_url("/user");
        Fetch::get(&self.client, &url)
            .header("apikey", &self.key)
            .bearer_auth(&token)
            .execute::<User>()
            .await
            .map_err(auth_failure)
    }

    /// Exchange the refresh token for a new session
    pub async fn refresh_session(&self) -> Result<Session, Error> {
        let refresh_token = match self.get_session() {
            Some(session) => session.refresh_token,
            None => return Err(Error::auth("Not logged in")),
        };

        let url = self.get_auth_url("/token?grant_type=refresh_token");
        let session = Fetch::post(&self.client, &url)
            .header("apikey", &self.key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))?
            .execute::<Session>()
            .await
            .map_err(auth_failure)?
            .with_expiry();

        self.store(Some(session.clone()));
        Ok(session)
    }

    /// Get the current session
    pub fn get_session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    /// Set the session
    pub fn set_session(&self, session: Session) {
        self.store(Some(session));
    }

    /// Drop the local session without calling the server
    pub fn clear_session(&self) {
        self.store(None);
    }

    /// The token table requests should carry: the session's when signed in
    pub(crate) fn access_token(&self) -> String {
        match self.get_session() {
            Some(session) => session.access_token,
            None => self.key.clone(),
        }
    }
}

#[async_trait]
impl SessionProvider for Auth {
    async fn check_session(&self) -> Result<Option<Session>, Error> {
        let session = match self.get_session() {
            Some(session) => session,
            None => return Ok(None),
        };

        if !session.is_expired() {
            return Ok(Some(session));
        }

        if !self.options.auto_refresh_token {
            self.clear_session();
            return Ok(None);
        }

        match self.refresh_session().await {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                warn!(error = %err, "session refresh failed");
                self.clear_session();
                Ok(None)
            }
        }
    }

    fn subscribe(&self) -> SessionSubscription {
        SessionSubscription::new(self.session.subscribe())
    }
}
