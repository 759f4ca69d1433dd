//! Owner names for records that only carry an `owner_id`.

use std::collections::HashMap;

use api::{ApiClient, Transport, User};

pub const UNASSIGNED: &str = "Unassigned";

/// `owner_id` to display name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnerNames {
    names: HashMap<String, String>,
    users: Vec<User>,
}

impl OwnerNames {
    pub fn new(users: Vec<User>) -> Self {
        let names = users
            .iter()
            .map(|u| (u.user_id.clone(), u.display_name().to_string()))
            .collect();
        Self { names, users }
    }

    pub fn name(&self, owner_id: &str) -> &str {
        self.names.get(owner_id).map(String::as_str).unwrap_or(UNASSIGNED)
    }

    /// Everyone who can own a record, in directory order.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Fetch the user directory for name lookups.
///
/// The directory is restricted to admins, so a refusal is expected for
/// everyone else; names then fall back to [`UNASSIGNED`] rather than failing
/// the page.
pub async fn load<T: Transport>(client: &ApiClient<T>) -> OwnerNames {
    match client.list_users().await {
        Ok(users) => OwnerNames::new(users),
        Err(e) => {
            tracing::debug!("user directory unavailable: {}", e);
            OwnerNames::default()
        }
    }
}

/// Whose records an analytics view covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OwnerScope {
    #[default]
    All,
    Mine,
}

impl OwnerScope {
    pub fn label(self) -> &'static str {
        match self {
            OwnerScope::All => "All deals",
            OwnerScope::Mine => "My deals",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            OwnerScope::All => OwnerScope::Mine,
            OwnerScope::Mine => OwnerScope::All,
        }
    }

    /// The `owner_id` filter to send. "Mine" without a known user reads as all.
    pub fn owner_id(self, user: Option<&User>) -> Option<String> {
        match (self, user) {
            (OwnerScope::Mine, Some(user)) => Some(user.user_id.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::user;
    use api::{ApiResponse, Method, MockTransport};
    use serde_json::json;

    #[test]
    fn test_unknown_owner_is_unassigned() {
        let names = OwnerNames::new(vec![user("u1", "Ana"), user("u2", "Bo")]);
        assert_eq!(names.name("u2"), "Bo");
        assert_eq!(names.name("u9"), UNASSIGNED);
    }

    #[test]
    fn test_scope_filters_only_when_mine_and_known() {
        let ana = user("u1", "Ana");
        assert_eq!(OwnerScope::All.owner_id(Some(&ana)), None);
        assert_eq!(OwnerScope::Mine.owner_id(Some(&ana)).as_deref(), Some("u1"));
        assert_eq!(OwnerScope::Mine.owner_id(None), None);
        assert_eq!(OwnerScope::All.toggled(), OwnerScope::Mine);
    }

    #[tokio::test]
    async fn test_load_resolves_names() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Get,
            "/auth/users",
            ApiResponse::json(200, json!([{ "user_id": "u1", "name": "Ana" }])),
        );
        let client = ApiClient::new(mock.clone());

        let names = load(&client).await;

        assert_eq!(names.name("u1"), "Ana");
        assert_eq!(names.users().len(), 1);
    }

    #[tokio::test]
    async fn test_forbidden_directory_degrades_to_unassigned() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Get,
            "/auth/users",
            ApiResponse::json(403, json!({ "detail": "Admin access required" })),
        );
        let client = ApiClient::new(mock.clone());

        let names = load(&client).await;

        assert!(names.is_empty());
        assert_eq!(names.name("u1"), UNASSIGNED);
        assert_eq!(mock.count(Method::Get, "/auth/users"), 1);
    }
}
