use api::ExchangeRoute;
use dioxus::prelude::*;
use store::callback;

use crate::location::location_fragment;
use crate::session::use_session;
use crate::toast::{notify, use_toasts};
use crate::Spinner;

/// Full-screen handler for the identity-provider redirect.
///
/// Reads `#session_id=...` from the current URL and exchanges it exactly once
/// per page load, however often this component is mounted; later mounts
/// check the existing session instead. `on_complete` always fires and
/// receives `true` when the user has a valid session (go to the dashboard) and
/// `false` otherwise (go to login); either way the caller should replace the
/// history entry so the token does not linger in the address bar.
#[component]
pub fn AuthCallback(
    #[props(default)] route: ExchangeRoute,
    on_complete: EventHandler<bool>,
) -> Element {
    let session = use_session();
    let mut toasts = use_toasts();

    use_hook(move || {
        spawn(async move {
            let fragment = location_fragment();
            let landing = callback::land(&session, route, &fragment).await;
            if let Some(notice) = landing.notice {
                notify(&mut toasts, notice);
            }
            on_complete.call(landing.signed_in);
        })
    });

    rsx! {
        div {
            class: "auth-callback",
            Spinner { label: "Signing you in..." }
        }
    }
}
