//! Session context and hooks for the UI.

use api::ApiConfig;
use dioxus::prelude::*;
use store::{Session, SessionState, ViewScope};

/// The shared [`Session`]. Panics outside a [`SessionProvider`].
pub fn use_session() -> Session {
    use_context::<Session>()
}

/// Latest resolved session state, for headers and badges.
///
/// Guards resolve their own navigation and publish the result here.
pub fn use_session_state() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

/// A [`ViewScope`] cancelled when the calling component unmounts.
pub fn use_view_scope() -> ViewScope {
    let scope = use_hook(ViewScope::new);
    use_drop({
        let scope = scope.clone();
        move || scope.cancel()
    });
    scope
}

/// Provider component that owns the session for the lifetime of the app.
/// Wrap the router with this component.
#[component]
pub fn SessionProvider(config: ApiConfig, children: Element) -> Element {
    let session = use_hook(move || Session::from_config(config));

    match session {
        Ok(session) => rsx! {
            SessionContext { session, {children} }
        },
        Err(e) => {
            tracing::error!("failed to build API client: {}", e);
            rsx! {
                div {
                    class: "app-fatal",
                    "The application could not start: {e}"
                }
            }
        }
    }
}

#[component]
fn SessionContext(session: Session, children: Element) -> Element {
    use_context_provider(|| session);
    use_context_provider(|| Signal::new(SessionState::Unknown));

    rsx! {
        {children}
    }
}
