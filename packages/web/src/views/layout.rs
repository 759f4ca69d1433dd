use dioxus::prelude::*;

use ui::icons::{
    FaBuilding, FaCalendar, FaChartBar, FaChartLine, FaChevronLeft, FaChevronRight, FaCompass,
    FaGauge, FaGear, FaTableColumns, FaUsers,
};
use ui::{use_session_state, Icon, LogoutButton, UserBadge};

use crate::{GuardedOutlet, Route};

/// Sidebar shell around every signed-in page.
#[component]
pub fn AppLayout() -> Element {
    rsx! {
        div {
            class: "app-shell",
            Sidebar {}
            main {
                class: "app-main",
                GuardedOutlet {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let nav = use_navigator();
    let state = use_session_state();
    let mut collapsed = use_signal(|| false);
    let is_admin = state().user().is_some_and(|u| u.is_admin());

    rsx! {
        aside {
            class: if collapsed() { "sidebar collapsed" } else { "sidebar" },

            div {
                class: "sidebar-brand",
                Link {
                    to: Route::Dashboard {},
                    class: "sidebar-logo",
                    Icon { icon: FaCompass, width: 20, height: 20 }
                    if !collapsed() {
                        span { "Pipeline CRM" }
                    }
                }
                button {
                    class: "sidebar-collapse",
                    title: if collapsed() { "Expand" } else { "Collapse" },
                    onclick: move |_| collapsed.toggle(),
                    if collapsed() {
                        Icon { icon: FaChevronRight, width: 12, height: 12 }
                    } else {
                        Icon { icon: FaChevronLeft, width: 12, height: 12 }
                    }
                }
            }

            nav {
                class: "sidebar-nav",
                NavLink { to: Route::Dashboard {}, label: "Dashboard", collapsed: collapsed(),
                    Icon { icon: FaGauge, width: 16, height: 16 }
                }
                if is_admin {
                    NavLink { to: Route::Executive {}, label: "Executive", collapsed: collapsed(),
                        Icon { icon: FaChartLine, width: 16, height: 16 }
                    }
                }
                NavLink { to: Route::Pipeline {}, label: "Pipeline", collapsed: collapsed(),
                    Icon { icon: FaTableColumns, width: 16, height: 16 }
                }
                NavLink { to: Route::Organizations {}, label: "Clients", collapsed: collapsed(),
                    Icon { icon: FaBuilding, width: 16, height: 16 }
                }
                NavLink { to: Route::Contacts {}, label: "Contacts", collapsed: collapsed(),
                    Icon { icon: FaUsers, width: 16, height: 16 }
                }
                NavLink { to: Route::Activities {}, label: "Activities", collapsed: collapsed(),
                    Icon { icon: FaCalendar, width: 16, height: 16 }
                }
                NavLink { to: Route::Reports {}, label: "Reports", collapsed: collapsed(),
                    Icon { icon: FaChartBar, width: 16, height: 16 }
                }
            }

            div {
                class: "sidebar-bottom",
                NavLink { to: Route::Settings {}, label: "Settings", collapsed: collapsed(),
                    Icon { icon: FaGear, width: 16, height: 16 }
                }
                if !collapsed() {
                    UserBadge {}
                }
                LogoutButton {
                    class: "sidebar-item",
                    on_signed_out: move |_| {
                        nav.replace(Route::Login {});
                    },
                }
            }
        }
    }
}

/// Sidebar entry, highlighted for its route and any route below it.
#[component]
fn NavLink(to: Route, label: String, collapsed: bool, children: Element) -> Element {
    let current = use_route::<Route>().to_string();
    let target = to.to_string();
    let active = current == target || current.starts_with(&format!("{target}/"));
    let class = if active { "sidebar-item active" } else { "sidebar-item" };

    rsx! {
        Link {
            to: to,
            class: "{class}",
            {children}
            if !collapsed {
                span { "{label}" }
            }
        }
    }
}
