//! Guard for pages that need a signed-in user.

use dioxus::prelude::*;
use store::{guard, GuardVerdict, SessionState};

use crate::session::{use_session, use_session_state, use_view_scope};
use crate::Spinner;

/// Renders `children` only once the session is known to be valid.
///
/// Each mount resolves the session once: a carried user is accepted as is,
/// otherwise `/auth/me` decides. Key the component by route so every
/// navigation gets a fresh resolution. On an invalid session
/// `on_unauthenticated` fires once; the caller replaces the history entry with
/// the login page.
#[component]
pub fn Guarded(on_unauthenticated: EventHandler<()>, children: Element) -> Element {
    let session = use_session();
    let mut shared = use_session_state();
    let scope = use_view_scope();
    let mut state = use_signal(|| SessionState::Unknown);

    use_hook(move || {
        spawn(async move {
            let Some(resolved) = scope.run(guard::resolve(&session)).await else {
                return;
            };
            let redirect = GuardVerdict::from(&resolved) == GuardVerdict::RedirectToLogin;
            shared.set(resolved.clone());
            state.set(resolved);
            if redirect {
                on_unauthenticated.call(());
            }
        })
    });

    let verdict = GuardVerdict::from(&*state.read());
    match verdict {
        GuardVerdict::Allow => rsx! {
            {children}
        },
        GuardVerdict::Wait | GuardVerdict::RedirectToLogin => rsx! {
            Spinner { label: "Checking your session..." }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionProvider;
    use api::ApiConfig;
    use dioxus::dioxus_core::{NoOpMutations, VirtualDom};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    static REDIRECTS: AtomicUsize = AtomicUsize::new(0);
    static PAGE_MOUNTS: AtomicUsize = AtomicUsize::new(0);

    #[component]
    fn GuardedPage() -> Element {
        use_hook(|| PAGE_MOUNTS.fetch_add(1, Ordering::SeqCst));
        rsx! { "secret" }
    }

    #[component]
    fn App() -> Element {
        // Nothing listens here, so the session check fails fast.
        let config = ApiConfig::new("http://127.0.0.1:9");
        rsx! {
            SessionProvider {
                config,
                Guarded {
                    on_unauthenticated: move |_| {
                        REDIRECTS.fetch_add(1, Ordering::SeqCst);
                    },
                    GuardedPage {}
                }
            }
        }
    }

    #[tokio::test]
    async fn test_waits_then_redirects_without_rendering_page() {
        let mut dom = VirtualDom::new(App);
        dom.rebuild_in_place();

        // First render: still Unknown, spinner only.
        assert_eq!(REDIRECTS.load(Ordering::SeqCst), 0);
        assert_eq!(PAGE_MOUNTS.load(Ordering::SeqCst), 0);

        tokio::time::timeout(Duration::from_secs(10), async {
            while REDIRECTS.load(Ordering::SeqCst) == 0 {
                dom.wait_for_work().await;
                dom.render_immediate(&mut NoOpMutations);
            }
        })
        .await
        .unwrap();

        assert_eq!(REDIRECTS.load(Ordering::SeqCst), 1);
        assert_eq!(PAGE_MOUNTS.load(Ordering::SeqCst), 0);
    }
}
