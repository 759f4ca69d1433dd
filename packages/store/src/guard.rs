//! Route guard resolution.
//!
//! Every navigation to a guarded route starts in [`SessionState::Unknown`] and
//! ends in exactly one of the two resolved states:
//!
//! - a user carried forward by the login form or the OAuth callback is
//!   trusted for this navigation without touching the network;
//! - otherwise one `GET /auth/me` decides. Any failure (non-2xx, network,
//!   decode) resolves to [`SessionState::Unauthenticated`], never back to
//!   `Unknown`, so the view cannot get stuck on its loading indicator.

use api::Transport;

use crate::session::{Session, SessionState};

/// Where to send the browser once the guard has resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardVerdict {
    /// Render the guarded page.
    Allow,
    /// Replace the current history entry with the login route.
    RedirectToLogin,
    /// Keep showing the loading indicator.
    Wait,
}

impl From<&SessionState> for GuardVerdict {
    fn from(state: &SessionState) -> Self {
        match state {
            SessionState::Unknown => GuardVerdict::Wait,
            SessionState::Authenticated(_) => GuardVerdict::Allow,
            SessionState::Unauthenticated => GuardVerdict::RedirectToLogin,
        }
    }
}

/// Resolve the session for one guarded navigation.
pub async fn resolve<T: Transport>(session: &Session<T>) -> SessionState {
    if let Some(user) = session.take_carried() {
        tracing::debug!(user_id = %user.user_id, "using carried user, skipping session check");
        return SessionState::Authenticated(user);
    }

    match session.client().current_user().await {
        Ok(user) => {
            tracing::info!(user_id = %user.user_id, "session valid");
            SessionState::Authenticated(user)
        }
        Err(e) => {
            tracing::info!("no valid session: {}", e);
            SessionState::Unauthenticated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ana_response, user};
    use api::{ApiClient, ApiResponse, Method, MockTransport};
    use serde_json::json;

    fn session(mock: &MockTransport) -> Session<MockTransport> {
        Session::new(ApiClient::new(mock.clone()))
    }

    #[tokio::test]
    async fn test_carried_user_skips_session_check() {
        let mock = MockTransport::new();
        let session = session(&mock);
        session.carry(user("u1", "Ana"));

        let state = resolve(&session).await;

        assert_eq!(state.user().map(|u| u.user_id.as_str()), Some("u1"));
        assert_eq!(mock.count(Method::Get, "/auth/me"), 0);
    }

    #[tokio::test]
    async fn test_session_check_success_authenticates() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/auth/me", ana_response());
        let session = session(&mock);

        let state = resolve(&session).await;

        assert_eq!(GuardVerdict::from(&state), GuardVerdict::Allow);
        assert_eq!(mock.count(Method::Get, "/auth/me"), 1);
    }

    #[tokio::test]
    async fn test_session_check_401_redirects_to_login() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Get,
            "/auth/me",
            ApiResponse::json(401, json!({ "detail": "Not authenticated" })),
        );
        let session = session(&mock);

        let state = resolve(&session).await;

        assert_eq!(state, SessionState::Unauthenticated);
        assert_eq!(GuardVerdict::from(&state), GuardVerdict::RedirectToLogin);
        assert_eq!(mock.count(Method::Get, "/auth/me"), 1);
    }

    #[tokio::test]
    async fn test_network_failure_and_garbage_redirect_to_login() {
        let mock = MockTransport::new();
        mock.fail(Method::Get, "/auth/me", "offline")
            .respond(Method::Get, "/auth/me", ApiResponse::html(200, "<html></html>"));
        let session = session(&mock);

        assert_eq!(resolve(&session).await, SessionState::Unauthenticated);
        assert_eq!(resolve(&session).await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_carried_user_only_covers_one_navigation() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/auth/me", ana_response());
        let session = session(&mock);
        session.carry(user("u1", "Ana"));

        resolve(&session).await;
        resolve(&session).await;

        assert_eq!(mock.count(Method::Get, "/auth/me"), 1);
    }

    #[tokio::test]
    async fn test_repeated_session_checks_are_idempotent() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/auth/me", ana_response());
        let session = session(&mock);

        let first = resolve(&session).await;
        let second = resolve(&session).await;

        assert_eq!(first, second);
        assert_eq!(mock.count(Method::Get, "/auth/me"), 2);
    }

    #[test]
    fn test_unknown_waits() {
        assert_eq!(GuardVerdict::from(&SessionState::Unknown), GuardVerdict::Wait);
    }
}
