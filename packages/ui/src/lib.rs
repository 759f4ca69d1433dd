//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;

    pub mod brands {
        pub use dioxus_free_icons::icons::fa_brands_icons::*;
    }
}

pub const THEME_CSS: Asset = asset!("/assets/theme.css");

mod session;
pub use session::{use_session, use_session_state, use_view_scope, SessionProvider};

pub mod location;

mod toast;
pub use toast::{notify, use_toasts, Toast, ToastProvider, Toasts};

mod spinner;
pub use spinner::Spinner;

mod guard;
pub use guard::Guarded;

mod callback;
pub use callback::AuthCallback;

mod auth;
pub use auth::{IdentityProviderButton, LogoutButton, UserBadge, PROVIDER_RETURN_PATH};

mod login_panel;
pub use login_panel::LoginPanel;
