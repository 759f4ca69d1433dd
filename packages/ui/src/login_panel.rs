use dioxus::prelude::*;
use store::{login, LoginForm};

use crate::auth::IdentityProviderButton;
use crate::session::{use_session, use_view_scope};
use crate::toast::{notify, use_toasts};

const LOGIN_CSS: Asset = asset!("/assets/styling/login.css");

/// Email/password form plus the identity-provider button.
///
/// Validation happens before any request. On success the user is carried to
/// the next guarded page and `on_signed_in` fires; on failure the reason is
/// shown as a toast and the form stays filled in.
#[component]
pub fn LoginPanel(
    #[props(default = "Pipeline CRM".to_string())] title: String,
    on_signed_in: EventHandler<()>,
) -> Element {
    let session = use_session();
    let scope = use_view_scope();
    let mut toasts = use_toasts();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut submitting = use_signal(|| false);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let session = session.clone();
        let scope = scope.clone();
        let form = LoginForm::new(email(), password());
        submitting.set(true);
        spawn(async move {
            let Some(result) = scope.run(login::submit(&session, &form)).await else {
                return;
            };
            submitting.set(false);
            match result {
                Ok(_) => on_signed_in.call(()),
                Err(notice) => notify(&mut toasts, notice),
            }
        });
    };

    rsx! {
        document::Stylesheet { href: LOGIN_CSS }

        div {
            class: "login-container",
            div {
                class: "login-card",
                h1 { class: "login-title", "{title}" }
                p { class: "login-subtitle", "Sign in to your account" }

                form {
                    class: "login-form",
                    onsubmit: onsubmit,
                    label { r#for: "login-email", "Email" }
                    input {
                        id: "login-email",
                        r#type: "email",
                        autocomplete: "username",
                        value: "{email}",
                        oninput: move |evt| email.set(evt.value()),
                    }
                    label { r#for: "login-password", "Password" }
                    input {
                        id: "login-password",
                        r#type: "password",
                        autocomplete: "current-password",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                    button {
                        class: "login-btn primary",
                        r#type: "submit",
                        disabled: submitting(),
                        if submitting() { "Signing in..." } else { "Sign in" }
                    }
                }

                div { class: "login-divider", span { "or" } }

                IdentityProviderButton { class: "login-btn google-btn" }
            }
        }
    }
}
