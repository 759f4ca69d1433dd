//! Reading the identity-provider redirect fragment.
//!
//! After sign-in the provider sends the browser back to
//! `<origin>/dashboard#session_id=<token>`. The fragment is parsed like a query
//! string (`+` and percent escapes decoded); the first `session_id` wins.

use api::auth::SESSION_ID_KEY;
use api::SessionToken;

/// Whether `fragment` carries the session marker at all, even with an empty value.
///
/// Used at startup to decide if the callback handler must run before routing.
pub fn has_session_marker(fragment: &str) -> bool {
    pairs(fragment).any(|(key, _)| key == SESSION_ID_KEY)
}

/// Extract the transient token, if the fragment carries a non-empty one.
pub fn session_token(fragment: &str) -> Option<SessionToken> {
    pairs(fragment)
        .find(|(key, _)| key == SESSION_ID_KEY)
        .and_then(|(_, value)| SessionToken::new(value))
}

fn pairs(fragment: &str) -> impl Iterator<Item = (String, String)> + '_ {
    let trimmed = fragment.strip_prefix('#').unwrap_or(fragment);
    url::form_urlencoded::parse(trimmed.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
}
