//! # User projection
//!
//! [`User`] is the client-visible subset of an account, returned by every
//! auth endpoint (`/auth/me`, `/auth/login`, the session exchanges) and by the
//! admin user directory. The backend owns the record; the client only reads it
//! and holds it in transient session state.
//!
//! Only `user_id` and `name` are guaranteed. `email`, `picture` (exposed here
//! as `avatar_url`) and `role` may be absent; a missing role means
//! [`Role::SalesLead`], matching the backend default.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    SalesLead,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::SalesLead => "Sales Lead",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "picture")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl User {
    /// Name for greetings and badges, falling back to email, then the id.
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            &self.name
        } else {
            self.email.as_deref().unwrap_or(&self.user_id)
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Up to two uppercase initials for avatar placeholders.
    pub fn initials(&self) -> String {
        self.display_name()
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Email/password pair for `POST /auth/login`.
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body for `POST /auth/change-password`.
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordChange")
            .field("current_password", &"<redacted>")
            .field("new_password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_user_decodes() {
        let user: User = serde_json::from_value(json!({ "user_id": "u1", "name": "Ana" })).unwrap();
        assert_eq!(user.user_id, "u1");
        assert_eq!(user.display_name(), "Ana");
        assert_eq!(user.role, Role::SalesLead);
        assert!(user.email.is_none());
    }

    #[test]
    fn test_full_user_decodes() {
        let user: User = serde_json::from_value(json!({
            "user_id": "user_1",
            "email": "lead@example.com",
            "name": "Maria Lopez",
            "role": "admin",
            "picture": "https://example.com/a.png"
        }))
        .unwrap();
        assert!(user.is_admin());
        assert_eq!(user.avatar_url.as_deref(), Some("https://example.com/a.png"));
        assert_eq!(user.initials(), "ML");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = User {
            user_id: "u2".to_string(),
            name: " ".to_string(),
            email: Some("x@example.com".to_string()),
            avatar_url: None,
            role: Role::SalesLead,
        };
        assert_eq!(user.display_name(), "x@example.com");
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials {
            email: "a@b.c".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(!format!("{creds:?}").contains("hunter2"));
    }

    #[test]
    fn test_password_change_debug_redacts_both_passwords() {
        let change = PasswordChange {
            current_password: "old-secret".to_string(),
            new_password: "new-secret".to_string(),
        };
        let printed = format!("{change:?}");
        assert!(!printed.contains("old-secret"));
        assert!(!printed.contains("new-secret"));
    }
}
