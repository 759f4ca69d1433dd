//! Typed response and request contracts for every endpoint the app calls.

mod crm;
mod dashboard;
mod user;

pub use crm::*;
pub use dashboard::*;
pub use user::{Credentials, PasswordChange, Role, User};
