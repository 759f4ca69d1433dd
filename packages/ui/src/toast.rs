use dioxus::prelude::*;
use store::{Notice, NoticeLevel};

const TOAST_CSS: Asset = asset!("/assets/styling/toast.css");

/// Browser toasts disappear on their own after this long.
#[cfg(target_arch = "wasm32")]
const AUTO_DISMISS: std::time::Duration = std::time::Duration::from_secs(4);

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub timestamp: String,
    pub notice: Notice,
}

#[derive(Clone, Debug, Default)]
pub struct Toasts {
    pub entries: Vec<Toast>,
    next_id: u64,
}

impl Toasts {
    fn push(&mut self, notice: Notice) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Toast {
            id,
            timestamp: current_time(),
            notice,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|t| t.id != id);
    }
}

pub fn use_toasts() -> Signal<Toasts> {
    use_context::<Signal<Toasts>>()
}

/// Show `notice` as a toast.
///
/// The dismiss timer is not owned by the calling component: callers often
/// navigate away right after notifying, and the toast must still expire.
pub fn notify(toasts: &mut Signal<Toasts>, notice: Notice) {
    match notice.level {
        NoticeLevel::Error => tracing::warn!("toast: {}", notice.message),
        _ => tracing::debug!("toast: {}", notice.message),
    }
    let id = toasts.write().push(notice);

    #[cfg(target_arch = "wasm32")]
    {
        let mut toasts = *toasts;
        spawn_forever(async move {
            gloo_timers::future::sleep(AUTO_DISMISS).await;
            toasts.write().dismiss(id);
        });
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = id;
}

#[cfg(target_arch = "wasm32")]
fn current_time() -> String {
    let date = js_sys::Date::new_0();
    let h = date.get_hours();
    let m = date.get_minutes();
    let s = date.get_seconds();
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(not(target_arch = "wasm32"))]
fn current_time() -> String {
    "00:00:00".to_string()
}

/// Provides the toast stack and renders it over `children`.
#[component]
pub fn ToastProvider(children: Element) -> Element {
    use_context_provider(|| Signal::new(Toasts::default()));

    rsx! {
        {children}
        Toaster {}
    }
}

#[component]
fn Toaster() -> Element {
    let mut toasts = use_toasts();
    let entries = toasts().entries.clone();

    rsx! {
        document::Stylesheet { href: TOAST_CSS }

        div {
            class: "toaster",
            for toast in entries {
                div {
                    key: "{toast.id}",
                    class: match toast.notice.level {
                        NoticeLevel::Error => "toast error",
                        NoticeLevel::Warning => "toast warning",
                        NoticeLevel::Success => "toast success",
                        NoticeLevel::Info => "toast info",
                    },
                    title: "{toast.timestamp}",
                    onclick: {
                        let id = toast.id;
                        move |_| toasts.write().dismiss(id)
                    },
                    "{toast.notice.message}"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismiss_removes_only_that_toast() {
        let mut toasts = Toasts::default();
        let first = toasts.push(Notice::success("Saved"));
        let second = toasts.push(Notice::error("Failed"));
        assert_ne!(first, second);

        toasts.dismiss(first);
        toasts.dismiss(first);

        let ids: Vec<u64> = toasts.entries.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second]);
    }
}
