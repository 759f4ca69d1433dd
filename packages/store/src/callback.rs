//! Identity-provider callback: trade the fragment token for a session.
//!
//! [`complete`] is safe to call from code that may run more than once per page
//! load. The session's exchange latch lets the first call through and turns
//! every later one into a no-op (`None`), so at most one exchange request is
//! ever sent. The token is never logged.

use api::{ExchangeRoute, Transport, User};

use crate::fragment;
use crate::notice::Notice;
use crate::session::Session;

pub const MISSING_TOKEN_MESSAGE: &str = "Authentication failed - no session ID";
pub const EXCHANGE_FAILED_MESSAGE: &str = "Authentication failed";

/// Result of the one exchange attempt of this page load.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    /// Session established; go to the landing page, history replaced.
    SignedIn { user: User, notice: Notice },
    /// No token or the exchange failed; go to login, history replaced.
    Rejected { notice: Notice },
}

impl CallbackOutcome {
    pub fn notice(&self) -> &Notice {
        match self {
            CallbackOutcome::SignedIn { notice, .. } | CallbackOutcome::Rejected { notice } => notice,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, CallbackOutcome::SignedIn { .. })
    }
}

/// Run the callback for `fragment` (the URL hash, with or without `#`).
///
/// On success the user is carried forward so the landing page's guard does not
/// check again. Returns `None` when a previous invocation already ran.
pub async fn complete<T: Transport>(
    session: &Session<T>,
    route: ExchangeRoute,
    fragment: &str,
) -> Option<CallbackOutcome> {
    if !session.exchange_latch().try_acquire() {
        tracing::debug!("callback already handled for this page load");
        return None;
    }

    let Some(token) = fragment::session_token(fragment) else {
        tracing::warn!("callback without a session token");
        return Some(CallbackOutcome::Rejected {
            notice: Notice::error(MISSING_TOKEN_MESSAGE),
        });
    };

    let outcome = match session.client().exchange_session(route, &token).await {
        Ok(user) => {
            tracing::info!(user_id = %user.user_id, "session established from callback");
            session.carry(user.clone());
            CallbackOutcome::SignedIn {
                notice: Notice::success(format!("Welcome, {}!", user.display_name())),
                user,
            }
        }
        Err(e) => {
            tracing::error!("session exchange failed: {}", e);
            CallbackOutcome::Rejected {
                notice: Notice::from_error(&e, EXCHANGE_FAILED_MESSAGE),
            }
        }
    };
    Some(outcome)
}

/// Where the callback screen sends the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct Landing {
    pub signed_in: bool,
    /// Only the visit that ran the exchange has something to say.
    pub notice: Option<Notice>,
}

/// [`complete`] for a screen that has to leave whatever happens.
///
/// A repeat visit after the exchange already ran in this page load cannot
/// exchange again; it asks `/auth/me` instead and lands accordingly.
pub async fn land<T: Transport>(session: &Session<T>, route: ExchangeRoute, fragment: &str) -> Landing {
    if let Some(outcome) = complete(session, route, fragment).await {
        return Landing {
            signed_in: outcome.is_signed_in(),
            notice: Some(outcome.notice().clone()),
        };
    }
    let signed_in = session.client().current_user().await.is_ok();
    tracing::debug!(signed_in, "repeat callback visit resolved by session check");
    Landing {
        signed_in,
        notice: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard;
    use crate::notice::NoticeLevel;
    use crate::testing::ana_response;
    use api::error::SERVER_ERROR_MESSAGE;
    use api::{ApiClient, ApiResponse, Method, MockTransport};
    use serde_json::json;

    const GOOGLE: &str = "/auth/google/session";

    fn session(mock: &MockTransport) -> Session<MockTransport> {
        Session::new(ApiClient::new(mock.clone()))
    }

    #[tokio::test]
    async fn test_fragment_exchange_then_dashboard_without_session_check() {
        let mock = MockTransport::new();
        mock.respond(Method::Post, GOOGLE, ana_response());
        let session = session(&mock);

        let outcome = complete(&session, ExchangeRoute::Google, "#session_id=abc123")
            .await
            .unwrap();

        let CallbackOutcome::SignedIn { user, notice } = outcome else {
            panic!("expected sign in");
        };
        assert_eq!(user.user_id, "u1");
        assert_eq!(notice.message, "Welcome, Ana!");

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body, Some(json!({ "session_id": "abc123" })));

        // The landing page's guard consumes the carried user.
        let state = guard::resolve(&session).await;
        assert_eq!(state.user().map(|u| u.name.as_str()), Some("Ana"));
        assert_eq!(mock.count(Method::Get, "/auth/me"), 0);
        assert_eq!(mock.total(), 1);
    }

    #[tokio::test]
    async fn test_reentrant_invocations_exchange_once() {
        let mock = MockTransport::new();
        mock.respond(Method::Post, GOOGLE, ana_response());
        let session = session(&mock);
        let remount = session.clone();

        let first = complete(&session, ExchangeRoute::Google, "#session_id=abc123").await;
        let second = complete(&remount, ExchangeRoute::Google, "#session_id=abc123").await;
        let third = complete(&session, ExchangeRoute::Google, "#session_id=abc123").await;

        assert!(first.is_some_and(|o| o.is_signed_in()));
        assert!(second.is_none());
        assert!(third.is_none());
        assert_eq!(mock.count(Method::Post, GOOGLE), 1);
    }

    #[tokio::test]
    async fn test_missing_marker_fails_closed_without_request() {
        let mock = MockTransport::new();
        let session = session(&mock);

        let outcome = complete(&session, ExchangeRoute::Google, "#state=xyz")
            .await
            .unwrap();

        assert!(!outcome.is_signed_in());
        assert_eq!(outcome.notice().message, MISSING_TOKEN_MESSAGE);
        assert_eq!(mock.total(), 0);
    }

    #[tokio::test]
    async fn test_html_response_is_server_error() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Post,
            GOOGLE,
            ApiResponse::html(500, "<html><body>Internal Server Error</body></html>"),
        );
        let session = session(&mock);

        let outcome = complete(&session, ExchangeRoute::Google, "#session_id=abc123")
            .await
            .unwrap();

        assert_eq!(outcome.notice().level, NoticeLevel::Error);
        assert_eq!(outcome.notice().message, SERVER_ERROR_MESSAGE);
        assert!(session.take_carried().is_none());
    }

    #[tokio::test]
    async fn test_rejected_exchange_uses_detail() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Post,
            GOOGLE,
            ApiResponse::json(401, json!({ "detail": "Invalid session" })),
        );
        let session = session(&mock);

        let outcome = complete(&session, ExchangeRoute::Google, "#session_id=used")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CallbackOutcome::Rejected {
                notice: Notice::error("Invalid session")
            }
        );
    }

    #[tokio::test]
    async fn test_network_error_rejects() {
        let mock = MockTransport::new();
        mock.fail(Method::Post, "/auth/session", "offline");
        let session = session(&mock);

        let outcome = complete(&session, ExchangeRoute::Generic, "#session_id=abc")
            .await
            .unwrap();

        assert!(!outcome.is_signed_in());
        assert_eq!(mock.count(Method::Post, "/auth/session"), 1);
    }

    #[tokio::test]
    async fn test_repeat_visit_lands_on_session_check() {
        let mock = MockTransport::new();
        mock.respond(Method::Post, GOOGLE, ana_response());
        mock.respond(Method::Get, "/auth/me", ana_response());
        let session = session(&mock);

        let first = land(&session, ExchangeRoute::Google, "#session_id=abc123").await;
        assert!(first.signed_in);
        assert_eq!(first.notice.map(|n| n.message).as_deref(), Some("Welcome, Ana!"));

        let again = land(&session, ExchangeRoute::Google, "").await;
        assert_eq!(
            again,
            Landing {
                signed_in: true,
                notice: None
            }
        );
        assert_eq!(mock.count(Method::Post, GOOGLE), 1);
        assert_eq!(mock.count(Method::Get, "/auth/me"), 1);
    }

    #[tokio::test]
    async fn test_repeat_visit_without_session_goes_to_login() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Post,
            GOOGLE,
            ApiResponse::json(401, json!({ "detail": "Invalid session" })),
        );
        mock.respond(Method::Get, "/auth/me", ApiResponse::json(401, json!({ "detail": "Not authenticated" })));
        let session = session(&mock);

        let first = land(&session, ExchangeRoute::Google, "#session_id=used").await;
        assert!(!first.signed_in);

        let again = land(&session, ExchangeRoute::Google, "#session_id=used").await;
        assert!(!again.signed_in);
        assert!(again.notice.is_none());
        assert_eq!(mock.count(Method::Post, GOOGLE), 1);
    }
}
