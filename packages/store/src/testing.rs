//! Fixtures shared by the unit tests.

use api::{ApiResponse, Role, User};
use serde_json::json;

pub(crate) fn user(id: &str, name: &str) -> User {
    User {
        user_id: id.to_string(),
        name: name.to_string(),
        email: None,
        avatar_url: None,
        role: Role::SalesLead,
    }
}

pub(crate) fn ana_response() -> ApiResponse {
    ApiResponse::json(200, json!({ "user_id": "u1", "name": "Ana" }))
}
