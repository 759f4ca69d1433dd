//! # Session context
//!
//! One [`Session`] is built at startup and shared with every view. It owns the
//! API client, the one-shot latch that guards the token exchange, and the
//! hand-off slot used to carry a freshly authenticated [`User`] into the next
//! guarded navigation so the guard can skip its "who am I" check.
//!
//! The session cookie itself belongs to the backend; this type never sees it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use api::{ApiClient, ApiConfig, ApiError, HttpTransport, Transport, User};

use crate::latch::OnceLatch;

/// What the client currently knows about the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// Not resolved yet for this navigation.
    #[default]
    Unknown,
    Authenticated(User),
    Unauthenticated,
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, SessionState::Unknown)
    }
}

#[derive(Debug)]
pub struct Session<T = HttpTransport> {
    client: ApiClient<T>,
    carried: Arc<Mutex<Option<User>>>,
    exchange_latch: Arc<OnceLatch>,
}

impl<T> Clone for Session<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            carried: Arc::clone(&self.carried),
            exchange_latch: Arc::clone(&self.exchange_latch),
        }
    }
}

/// Two handles are equal when they share the same underlying session.
impl<T> PartialEq for Session<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.carried, &other.carried)
    }
}

impl Session<HttpTransport> {
    pub fn from_config(config: ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::new(ApiClient::from_config(config)?))
    }
}

impl<T: Transport> Session<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self {
            client,
            carried: Arc::new(Mutex::new(None)),
            exchange_latch: Arc::new(OnceLatch::new()),
        }
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    fn carried(&self) -> MutexGuard<'_, Option<User>> {
        self.carried.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand `user` to the next guarded navigation.
    pub fn carry(&self, user: User) {
        *self.carried() = Some(user);
    }

    /// Take the carried user, leaving the slot empty.
    pub fn take_carried(&self) -> Option<User> {
        self.carried().take()
    }

    /// Latch guarding the identity-provider token exchange for this page load.
    pub fn exchange_latch(&self) -> &OnceLatch {
        &self.exchange_latch
    }

    /// Ask the backend to clear the session cookie and forget any carried user.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.take_carried();
        self.client.logout().await?;
        tracing::info!("signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::user;
    use api::{ApiResponse, Method, MockTransport};
    use serde_json::json;

    #[test]
    fn test_carried_user_is_taken_once() {
        let session = Session::new(ApiClient::new(MockTransport::new()));
        session.carry(user("u1", "Ana"));

        let clone = session.clone();
        assert_eq!(clone.take_carried().map(|u| u.user_id), Some("u1".to_string()));
        assert!(session.take_carried().is_none());
    }

    #[test]
    fn test_clones_share_the_latch() {
        let session = Session::new(ApiClient::new(MockTransport::new()));
        let clone = session.clone();
        assert!(session.exchange_latch().try_acquire());
        assert!(!clone.exchange_latch().try_acquire());
        assert_eq!(session, clone);

        let other = Session::new(ApiClient::new(MockTransport::new()));
        assert_ne!(session, other);
    }

    #[tokio::test]
    async fn test_logout_clears_carried_user() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Post,
            "/auth/logout",
            ApiResponse::json(200, json!({ "message": "Logged out" })),
        );
        let session = Session::new(ApiClient::new(mock.clone()));
        session.carry(user("u1", "Ana"));

        session.logout().await.unwrap();

        assert!(session.take_carried().is_none());
        assert_eq!(mock.count(Method::Post, "/auth/logout"), 1);
    }

    #[test]
    fn test_state_accessors() {
        assert!(!SessionState::Unknown.is_resolved());
        assert!(SessionState::Unauthenticated.is_resolved());
        let state = SessionState::Authenticated(user("u1", "Ana"));
        assert_eq!(state.user().map(|u| u.name.as_str()), Some("Ana"));
    }
}
