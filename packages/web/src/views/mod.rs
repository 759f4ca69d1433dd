use std::future::Future;

use api::{ApiClient, ApiError};
use dioxus::prelude::*;
use store::Notice;
use ui::{notify, use_session, use_toasts, use_view_scope, Toasts};

mod layout;
pub use layout::AppLayout;

mod login;
pub use login::{AuthCallbackPage, Login};

mod dashboard;
pub use dashboard::{Dashboard, Executive};

mod pipeline;
pub use pipeline::Pipeline;

mod organizations;
pub use organizations::{OrganizationDetail, Organizations};

mod contacts;
pub use contacts::{ContactDetail, Contacts};

mod opportunity;
pub use opportunity::OpportunityDetail;

mod activities;
pub use activities::Activities;

mod reports;
pub use reports::Reports;

mod settings;
pub use settings::Settings;

/// Load page data for the lifetime of the calling view.
///
/// The request is bound to the view's scope; a failure is shown as a toast
/// (with `fallback` when the backend gave no detail) and leaves `None`.
/// Call `restart()` on the returned resource to reload after a mutation.
pub(crate) fn use_loader<T, F, Fut>(fallback: &'static str, load: F) -> Resource<Option<T>>
where
    T: 'static,
    F: Fn(ApiClient) -> Fut + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    let session = use_session();
    let scope = use_view_scope();
    let mut toasts = use_toasts();

    use_resource(move || {
        let scope = scope.clone();
        let pending = load(session.client().clone());
        async move {
            match scope.run(pending).await? {
                Ok(data) => Some(data),
                Err(e) => {
                    notify(&mut toasts, Notice::from_error(&e, fallback));
                    None
                }
            }
        }
    })
}

/// Run a mutation, toast the outcome and report success.
pub(crate) async fn mutate<T>(
    mut toasts: Signal<Toasts>,
    pending: impl Future<Output = Result<T, ApiError>>,
    success: &str,
    fallback: &str,
) -> Option<T> {
    match pending.await {
        Ok(value) => {
            notify(&mut toasts, Notice::success(success));
            Some(value)
        }
        Err(e) => {
            notify(&mut toasts, Notice::from_error(&e, fallback));
            None
        }
    }
}

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div {
            class: "page not-found",
            h1 { "Page not found" }
            p { "Nothing lives at /{path}." }
            Link { to: crate::Route::Dashboard {}, "Back to the dashboard" }
        }
    }
}

#[component]
pub(crate) fn PageHeader(title: String, #[props(default)] subtitle: Option<String>, children: Element) -> Element {
    rsx! {
        div {
            class: "page-header",
            div {
                h1 { "{title}" }
                if let Some(subtitle) = subtitle {
                    p { class: "page-subtitle", "{subtitle}" }
                }
            }
            div { class: "page-actions", {children} }
        }
    }
}
