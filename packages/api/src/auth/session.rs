//! Session exchange types.

use serde::Serialize;

/// Name of the fragment parameter carrying the transient token.
pub const SESSION_ID_KEY: &str = "session_id";

/// One-time token delivered by the identity provider redirect.
///
/// Never logged: `Debug` prints a placeholder and there is no `Display`.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token. Blank values are not tokens.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Which exchange endpoint trades the token for a session cookie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExchangeRoute {
    /// `POST /auth/google/session`, used by the identity-provider callback page.
    #[default]
    Google,
    /// `POST /auth/session`, the generic exchange.
    Generic,
}

impl ExchangeRoute {
    pub fn path(&self) -> &'static str {
        match self {
            ExchangeRoute::Google => "/auth/google/session",
            ExchangeRoute::Generic => "/auth/session",
        }
    }
}

/// Body of both exchange endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct SessionExchange<'a> {
    pub session_id: &'a SessionToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_rejected() {
        assert!(SessionToken::new("").is_none());
        assert!(SessionToken::new("   ").is_none());
        assert_eq!(SessionToken::new("abc123").unwrap().expose(), "abc123");
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = SessionToken::new("abc123").unwrap();
        assert!(!format!("{token:?}").contains("abc123"));
    }

    #[test]
    fn test_exchange_body_shape() {
        let token = SessionToken::new("abc123").unwrap();
        let body = serde_json::to_value(SessionExchange {
            session_id: &token,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "session_id": "abc123" }));
    }
}
