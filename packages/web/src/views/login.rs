//! Login page and the standalone identity-provider callback route.

use dioxus::prelude::*;
use ui::{AuthCallback, LoginPanel};

use crate::Route;

#[component]
pub fn Login() -> Element {
    let nav = use_navigator();

    rsx! {
        LoginPanel {
            on_signed_in: move |_| {
                nav.replace(Route::Dashboard {});
            },
        }
    }
}

/// `/auth/callback`: same exchange as the fragment check at startup, for
/// providers configured to return here.
#[component]
pub fn AuthCallbackPage() -> Element {
    let nav = use_navigator();

    rsx! {
        AuthCallback {
            on_complete: move |signed_in: bool| {
                nav.replace(crate::landing_route(signed_in));
            },
        }
    }
}
