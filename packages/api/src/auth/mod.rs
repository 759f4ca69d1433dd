//! Authentication endpoints.
//!
//! The backend owns the session cookie. Every call here either establishes it
//! (login, session exchange), checks it (`/auth/me`) or clears it (logout);
//! the client never reads the cookie itself.

mod session;

pub use session::{ExchangeRoute, SessionToken, SESSION_ID_KEY};

use serde::de::IgnoredAny;

use crate::models::{Credentials, PasswordChange, User};
use crate::transport::Transport;
use crate::{ApiClient, ApiError};

impl<T: Transport> ApiClient<T> {
    /// "Who am I" check. Any non-2xx means there is no valid session.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/auth/me").await
    }

    /// Trade a transient identity-provider token for a session cookie.
    pub async fn exchange_session(
        &self,
        route: ExchangeRoute,
        token: &SessionToken,
    ) -> Result<User, ApiError> {
        self.post(route.path(), &session::SessionExchange { session_id: token })
            .await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        self.post("/auth/login", credentials).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let _: IgnoredAny = self.post_empty("/auth/logout").await?;
        Ok(())
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        let _: IgnoredAny = self.post("/auth/change-password", change).await?;
        Ok(())
    }

    /// All users. Admin only; sales leads get a 403.
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get("/auth/users").await
    }
}
