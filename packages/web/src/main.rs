use dioxus::prelude::*;

use api::ApiConfig;
use store::fragment::has_session_marker;
use ui::{AuthCallback, Guarded, SessionProvider, ToastProvider};
use views::{
    Activities, AppLayout, AuthCallbackPage, ContactDetail, Contacts, Dashboard, Executive, Login,
    NotFound, OpportunityDetail, OrganizationDetail, Organizations, Pipeline, Reports, Settings,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Bootstrap)]
        #[route("/")]
        Root {},
        #[route("/my-pipeline")]
        MyPipeline {},
        #[route("/login")]
        Login {},
        #[route("/auth/callback")]
        AuthCallbackPage {},
        #[layout(AppLayout)]
            #[route("/dashboard")]
            Dashboard {},
            #[route("/executive")]
            Executive {},
            #[route("/pipeline")]
            Pipeline {},
            #[route("/organizations")]
            Organizations {},
            #[route("/organizations/:org_id")]
            OrganizationDetail { org_id: String },
            #[route("/contacts")]
            Contacts {},
            #[route("/contacts/:contact_id")]
            ContactDetail { contact_id: String },
            #[route("/opportunities/:opp_id")]
            OpportunityDetail { opp_id: String },
            #[route("/activities")]
            Activities {},
            #[route("/reports")]
            Reports {},
            #[route("/settings")]
            Settings {},
        #[end_layout]
        #[route("/:..segments")]
        NotFound { segments: Vec<String> },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let config = use_hook(ApiConfig::from_env);

    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: ui::THEME_CSS }
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        ToastProvider {
            SessionProvider {
                config: config,
                Router::<Route> {}
            }
        }
    }
}

/// Outermost layout. When the page was loaded from the identity-provider
/// redirect (`#session_id=...` in the fragment, on any path) the token
/// exchange runs here, before any route renders.
#[component]
fn Bootstrap() -> Element {
    let nav = use_navigator();
    let mut exchanging = use_signal(|| has_session_marker(&ui::location::location_fragment()));

    if exchanging() {
        tracing::debug!("session marker in fragment; exchanging before routing");
        return rsx! {
            AuthCallback {
                on_complete: move |signed_in: bool| {
                    exchanging.set(false);
                    nav.replace(landing_route(signed_in));
                },
            }
        };
    }

    rsx! {
        Outlet::<Route> {}
    }
}

/// Where the callback screen sends the browser once it is done.
fn landing_route(signed_in: bool) -> Route {
    if signed_in {
        Route::Dashboard {}
    } else {
        Route::Login {}
    }
}

/// Redirect `/` to `/dashboard`
#[component]
fn Root() -> Element {
    let nav = use_navigator();
    nav.replace(Route::Dashboard {});
    rsx! {}
}

/// Redirect the legacy `/my-pipeline` to `/pipeline`
#[component]
fn MyPipeline() -> Element {
    let nav = use_navigator();
    nav.replace(Route::Pipeline {});
    rsx! {}
}

/// Guard keyed by route: each navigation resolves the session afresh.
#[component]
fn GuardedOutlet() -> Element {
    let nav = use_navigator();
    let route = use_route::<Route>();

    rsx! {
        Guarded {
            key: "{route}",
            on_unauthenticated: move |_| {
                nav.replace(Route::Login {});
            },
            Outlet::<Route> {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_lands_on_dashboard_or_login() {
        assert_eq!(landing_route(true), Route::Dashboard {});
        assert_eq!(landing_route(false), Route::Login {});
        assert_eq!(landing_route(false).to_string(), "/login");
    }
}
