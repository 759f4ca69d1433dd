//! Profile, password change and (for admins) the user directory.

use dioxus::prelude::*;
use store::login::{self, PasswordForm};
use ui::{notify, use_session, use_session_state, use_toasts, use_view_scope, Spinner};

use super::{use_loader, PageHeader};

#[component]
pub fn Settings() -> Element {
    let state = use_session_state();
    let user = state().user().cloned();

    rsx! {
        PageHeader { title: "Settings" }

        div {
            class: "dashboard-grid",
            section {
                class: "card",
                h2 { "Profile" }
                if let Some(user) = user.clone() {
                    dl {
                        class: "details",
                        dt { "Name" }
                        dd { "{user.display_name()}" }
                        dt { "Email" }
                        dd { "{user.email.clone().unwrap_or_default()}" }
                        dt { "Role" }
                        dd { span { class: "badge", "{user.role.label()}" } }
                    }
                } else {
                    p { class: "empty", "Profile unavailable." }
                }
            }
            ChangePassword {}
        }

        if user.as_ref().is_some_and(|u| u.is_admin()) {
            UserDirectory {}
        }
    }
}

#[component]
fn ChangePassword() -> Element {
    let session = use_session();
    let scope = use_view_scope();
    let mut toasts = use_toasts();
    let mut form = use_signal(PasswordForm::default);
    let mut saving = use_signal(|| false);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        if saving() {
            return;
        }
        saving.set(true);
        let session = session.clone();
        let scope = scope.clone();
        let pending = form.read().clone();
        spawn(async move {
            let Some(outcome) = scope.run(login::change_password(&session, &pending)).await else {
                return;
            };
            saving.set(false);
            match outcome {
                Ok(notice) => {
                    form.set(PasswordForm::default());
                    notify(&mut toasts, notice);
                }
                Err(notice) => notify(&mut toasts, notice),
            }
        });
    };

    rsx! {
        form {
            class: "card form-stack",
            onsubmit: onsubmit,
            h2 { "Change password" }
            input {
                r#type: "password",
                placeholder: "Current password",
                autocomplete: "current-password",
                value: "{form.read().current}",
                oninput: move |evt| form.write().current = evt.value(),
            }
            input {
                r#type: "password",
                placeholder: "New password",
                autocomplete: "new-password",
                value: "{form.read().new}",
                oninput: move |evt| form.write().new = evt.value(),
            }
            input {
                r#type: "password",
                placeholder: "Confirm new password",
                autocomplete: "new-password",
                value: "{form.read().confirm}",
                oninput: move |evt| form.write().confirm = evt.value(),
            }
            button {
                class: "btn primary",
                r#type: "submit",
                disabled: saving(),
                if saving() { "Saving..." } else { "Update password" }
            }
        }
    }
}

#[component]
fn UserDirectory() -> Element {
    let data = use_loader("Failed to load users", |client| async move { client.list_users().await });

    let loaded = data.read().clone();
    let Some(Some(users)) = loaded else {
        return rsx! {
            if data.read().is_none() {
                Spinner {}
            }
        };
    };

    rsx! {
        section {
            class: "card",
            h2 { "Users" }
            table {
                class: "table",
                thead {
                    tr {
                        th { "" }
                        th { "Name" }
                        th { "Email" }
                        th { "Role" }
                    }
                }
                tbody {
                    for user in users {
                        tr {
                            key: "{user.user_id}",
                            td { span { class: "avatar", "{user.initials()}" } }
                            td { "{user.display_name()}" }
                            td { "{user.email.clone().unwrap_or_default()}" }
                            td { span { class: "badge", "{user.role.label()}" } }
                        }
                    }
                }
            }
        }
    }
}
