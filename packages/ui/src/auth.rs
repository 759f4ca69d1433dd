//! Sign-in and sign-out controls.

use dioxus::prelude::*;
use store::{Notice, SessionState};

use crate::icons::brands::FaGoogle;
use crate::icons::{FaRightFromBracket, FaUser};
use crate::location::{location_origin, redirect_external};
use crate::session::{use_session, use_session_state};
use crate::toast::{notify, use_toasts};
use crate::Icon;

/// Path the identity provider sends the browser back to, with `#session_id=...`.
pub const PROVIDER_RETURN_PATH: &str = "/dashboard";

/// Button that leaves the app for the external identity provider.
///
/// Renders nothing when no provider is configured.
#[component]
pub fn IdentityProviderButton(
    #[props(default = "Continue with Google".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let session = use_session();
    let mut loading = use_signal(|| false);
    let return_to = format!("{}{}", location_origin(), PROVIDER_RETURN_PATH);
    let Some(url) = session
        .client()
        .transport()
        .config()
        .identity_provider_redirect(&return_to)
    else {
        return rsx! {};
    };

    rsx! {
        button {
            class: "{class}",
            r#type: "button",
            disabled: loading(),
            onclick: move |_| {
                loading.set(true);
                redirect_external(&url);
            },
            Icon { icon: FaGoogle, width: 14, height: 14 }
            if loading() {
                span { "Redirecting..." }
            } else {
                span { "{label}" }
            }
        }
    }
}

/// Signs out, then calls `on_signed_out` (normally a redirect to login).
#[component]
pub fn LogoutButton(
    #[props(default = "Log out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
    on_signed_out: EventHandler<()>,
) -> Element {
    let session = use_session();
    let mut state = use_session_state();
    let mut toasts = use_toasts();

    let onclick = move |_| {
        let session = session.clone();
        async move {
            match session.logout().await {
                Ok(()) => {
                    state.set(SessionState::Unauthenticated);
                    notify(&mut toasts, Notice::info("Logged out successfully"));
                    on_signed_out.call(());
                }
                Err(e) => {
                    notify(&mut toasts, Notice::from_error(&e, "Logout failed"));
                }
            }
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            Icon { icon: FaRightFromBracket, width: 14, height: 14 }
            span { "{label}" }
        }
    }
}

/// Avatar, name and role of the signed-in user.
#[component]
pub fn UserBadge() -> Element {
    let state = use_session_state();
    let Some(user) = state().user().cloned() else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "user-badge",
            if let Some(ref avatar) = user.avatar_url {
                img {
                    class: "user-badge-avatar",
                    src: "{avatar}",
                    alt: "Avatar",
                }
            } else {
                span {
                    class: "user-badge-initials",
                    if user.initials().is_empty() {
                        Icon { icon: FaUser, width: 14, height: 14 }
                    } else {
                        "{user.initials()}"
                    }
                }
            }
            div {
                class: "user-badge-text",
                span { class: "user-badge-name", "{user.display_name()}" }
                span { class: "user-badge-role", "{user.role.label()}" }
            }
        }
    }
}
