//! # Store crate: client-side session and page state
//!
//! Everything the views need that is not rendering lives here, free of any UI
//! framework so it can be exercised with a [`MockTransport`](api::MockTransport)
//! under plain `tokio` tests.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`session`] | Shared [`Session`] context and the [`SessionState`] machine |
//! | [`guard`] | Resolve `Unknown` into `Authenticated` or `Unauthenticated` per navigation |
//! | [`callback`] | One-shot identity-provider token exchange |
//! | [`login`] | Email/password form validation and submission, password change |
//! | [`fragment`] | Reading the `session_id` marker from the URL fragment |
//! | [`latch`] | [`OnceLatch`], the at-most-once gate |
//! | [`scope`] | [`ViewScope`], dropping results that arrive after a view is gone |
//! | [`notice`] | Toast-style [`Notice`]s |
//! | [`forms`] | Create and edit forms for organizations, contacts, opportunities and activities |
//! | [`owners`] | Owner names from the user directory, "mine/all" analytics scope |
//! | [`board`] | Pipeline kanban grouping and optimistic stage moves |

pub mod board;
pub mod callback;
pub mod forms;
pub mod fragment;
pub mod guard;
pub mod latch;
pub mod login;
pub mod notice;
pub mod owners;
pub mod scope;
pub mod session;

#[cfg(test)]
mod testing;

pub use board::{Board, Column, DropTarget, StageMove};
pub use callback::{CallbackOutcome, Landing};
pub use forms::{ActivityForm, ContactForm, OpportunityEditForm, OpportunityForm, OrganizationForm};
pub use guard::GuardVerdict;
pub use latch::OnceLatch;
pub use login::{LoginForm, PasswordForm};
pub use notice::{Notice, NoticeLevel};
pub use owners::{OwnerNames, OwnerScope};
pub use scope::ViewScope;
pub use session::{Session, SessionState};
