//! Gates admin screens behind a live session

use std::sync::Arc;

use tracing::{debug, warn};

use crate::auth::{Session, SessionProvider, SessionSubscription};
use crate::routes::Route;

/// Where the guard is in its check
#[derive(Debug, Clone, PartialEq)]
pub enum GuardState {
    Unknown,
    Checking,
    Authenticated(Session),
    Anonymous,
}

/// What the guarded screen should do right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Still checking; show a loading indicator, do not redirect yet
    Pending,
    Render,
    Redirect(Route),
}

/// Holds a session subscription for as long as it is mounted and
/// re-evaluates on every session change.
pub struct SessionGuard<P: SessionProvider + ?Sized> {
    provider: Arc<P>,
    state: GuardState,
    subscription: Option<SessionSubscription>,
}

fn settle(session: Option<Session>) -> GuardState {
    match session {
        Some(session) if !session.is_expired() => GuardState::Authenticated(session),
        _ => GuardState::Anonymous,
    }
}

impl<P: SessionProvider + ?Sized> SessionGuard<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            state: GuardState::Unknown,
            subscription: None,
        }
    }

    /// Subscribe to session changes, then resolve the current session.
    ///
    /// A failed check counts as no session.
    pub async fn mount(&mut self) -> Decision {
        self.subscription = Some(self.provider.subscribe());
        self.state = GuardState::Checking;

        self.state = match self.provider.check_session().await {
            Ok(session) => settle(session),
            Err(err) => {
                warn!(error = %err, "Session check failed");
                GuardState::Anonymous
            }
        };
        debug!(state = ?self.decision(), "Session guard mounted");
        self.decision()
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn decision(&self) -> Decision {
        match self.state {
            GuardState::Unknown | GuardState::Checking => Decision::Pending,
            GuardState::Authenticated(_) => Decision::Render,
            GuardState::Anonymous => Decision::Redirect(Route::AdminLogin),
        }
    }

    /// Wait for the next session change and return the new decision.
    ///
    /// Returns `None` when not mounted or when the session context is gone.
    pub async fn next_change(&mut self) -> Option<Decision> {
        let session = self.subscription.as_mut()?.changed().await?;
        self.state = settle(session);
        Some(self.decision())
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Release the subscription
    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.state = GuardState::Unknown;
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::auth::tests::{offline_auth, test_session};
    use crate::auth::Auth;
    use crate::config::ClientOptions;
    use crate::error::Error;

    #[tokio::test]
    async fn test_pending_until_mounted() {
        let guard = SessionGuard::new(Arc::new(offline_auth(ClientOptions::default())));
        assert_eq!(guard.decision(), Decision::Pending);
        assert!(!guard.is_mounted());
    }

    #[tokio::test]
    async fn test_anonymous_redirects_to_login() {
        let mut guard = SessionGuard::new(Arc::new(offline_auth(ClientOptions::default())));
        assert_eq!(guard.mount().await, Decision::Redirect(Route::AdminLogin));
        assert_eq!(guard.state(), &GuardState::Anonymous);
    }

    #[tokio::test]
    async fn test_sign_out_elsewhere_redirects() {
        let auth: Arc<Auth> = Arc::new(offline_auth(ClientOptions::default()));
        auth.set_session(test_session("token", 3600));

        let mut guard = SessionGuard::new(auth.clone());
        assert_eq!(guard.mount().await, Decision::Render);

        auth.clear_session();
        assert_eq!(
            guard.next_change().await,
            Some(Decision::Redirect(Route::AdminLogin))
        );

        auth.set_session(test_session("again", 3600));
        assert_eq!(guard.next_change().await, Some(Decision::Render));
    }

    #[tokio::test]
    async fn test_unmount_releases_subscription() {
        let mut guard = SessionGuard::new(Arc::new(offline_auth(ClientOptions::default())));
        guard.mount().await;
        guard.unmount();

        assert!(!guard.is_mounted());
        assert_eq!(guard.decision(), Decision::Pending);
        assert_eq!(guard.next_change().await, None);
    }

    struct Broken;

    #[async_trait]
    impl SessionProvider for Broken {
        async fn check_session(&self) -> Result<Option<Session>, Error> {
            Err(Error::auth("unreachable"))
        }

        fn subscribe(&self) -> SessionSubscription {
            let (_sender, receiver) = tokio::sync::watch::channel(None);
            SessionSubscription::new(receiver)
        }
    }

    #[tokio::test]
    async fn test_failed_check_counts_as_anonymous() {
        let mut guard = SessionGuard::new(Arc::new(Broken));
        assert_eq!(guard.mount().await, Decision::Redirect(Route::AdminLogin));
        assert_eq!(guard.next_change().await, None);
    }
}
