//! Email/password sign-in.

use api::{ApiError, Credentials, PasswordChange, Transport, User};

use crate::notice::Notice;
use crate::session::Session;

pub const MISSING_FIELDS_MESSAGE: &str = "Please enter your email and password";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const MIN_PASSWORD_LEN: usize = 8;

/// Raw form input, as typed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Both fields are required; the email is trimmed and lowercased.
    pub fn credentials(&self) -> Result<Credentials, ApiError> {
        let email = self.email.trim().to_lowercase();
        if email.is_empty() || self.password.is_empty() {
            return Err(ApiError::validation(MISSING_FIELDS_MESSAGE));
        }
        Ok(Credentials {
            email,
            password: self.password.clone(),
        })
    }
}

/// Validate and submit the form. On success the user is carried forward to the
/// landing page; on failure the notice explains why.
pub async fn submit<T: Transport>(session: &Session<T>, form: &LoginForm) -> Result<User, Notice> {
    let credentials = form
        .credentials()
        .map_err(|e| Notice::from_error(&e, LOGIN_FAILED_MESSAGE))?;

    match session.client().login(&credentials).await {
        Ok(user) => {
            tracing::info!(user_id = %user.user_id, "signed in with password");
            session.carry(user.clone());
            Ok(user)
        }
        Err(e) => {
            tracing::warn!("login failed: {}", e);
            Err(Notice::from_error(&e, LOGIN_FAILED_MESSAGE))
        }
    }
}

/// Settings-page password change form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PasswordForm {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

impl PasswordForm {
    pub fn change(&self) -> Result<PasswordChange, ApiError> {
        if self.current.is_empty() || self.new.is_empty() {
            return Err(ApiError::validation("Please fill in all password fields"));
        }
        if self.new != self.confirm {
            return Err(ApiError::validation("New passwords do not match"));
        }
        if self.new.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(PasswordChange {
            current_password: self.current.clone(),
            new_password: self.new.clone(),
        })
    }
}

pub async fn change_password<T: Transport>(session: &Session<T>, form: &PasswordForm) -> Result<Notice, Notice> {
    let change = form
        .change()
        .map_err(|e| Notice::from_error(&e, "Failed to change password"))?;
    session
        .client()
        .change_password(&change)
        .await
        .map(|()| Notice::success("Password changed successfully"))
        .map_err(|e| Notice::from_error(&e, "Failed to change password"))
}
