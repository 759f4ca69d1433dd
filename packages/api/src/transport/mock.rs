use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::json;

use super::{ApiRequest, ApiResponse, Method, Transport};
use crate::ApiError;

#[derive(Debug, Clone)]
enum Reply {
    Respond(ApiResponse),
    Fail(String),
}

#[derive(Debug, Default)]
struct MockState {
    replies: HashMap<(Method, String), VecDeque<Reply>>,
    requests: Vec<ApiRequest>,
}

/// In-memory transport for tests and offline previews.
///
/// Replies are scripted per method and route (path without query string).
/// Queued replies are served in order and the last one repeats. Unscripted
/// routes answer `404 {"detail": "Not Found"}`. Every request is recorded.
#[derive(Clone, Debug, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, method: Method, route: &str, reply: Reply) {
        self.state()
            .replies
            .entry((method, route.to_string()))
            .or_default()
            .push_back(reply);
    }

    /// Queue a response for `method route`.
    pub fn respond(&self, method: Method, route: &str, response: ApiResponse) -> &Self {
        self.push(method, route, Reply::Respond(response));
        self
    }

    /// Queue a network failure for `method route`.
    pub fn fail(&self, method: Method, route: &str, message: &str) -> &Self {
        self.push(method, route, Reply::Fail(message.to_string()));
        self
    }

    /// Every request sent so far, oldest first.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state().requests.clone()
    }

    /// Number of requests sent to `method route`.
    pub fn count(&self, method: Method, route: &str) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|r| r.method == method && r.route() == route)
            .count()
    }

    pub fn total(&self) -> usize {
        self.state().requests.len()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut state = self.state();
        let key = (request.method, request.route().to_string());
        state.requests.push(request);

        let reply = match state.replies.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(message)) => Err(ApiError::Transport(message)),
            None => Ok(ApiResponse::json(404, json!({ "detail": "Not Found" }))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queued_replies_then_sticky() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/auth/me", ApiResponse::empty(401))
            .respond(Method::Get, "/auth/me", ApiResponse::empty(200));

        let first = mock.send(ApiRequest::new(Method::Get, "/auth/me")).await.unwrap();
        let second = mock.send(ApiRequest::new(Method::Get, "/auth/me")).await.unwrap();
        let third = mock.send(ApiRequest::new(Method::Get, "/auth/me")).await.unwrap();

        assert_eq!(first.status, 401);
        assert_eq!(second.status, 200);
        assert_eq!(third.status, 200);
        assert_eq!(mock.count(Method::Get, "/auth/me"), 3);
    }

    #[tokio::test]
    async fn test_routes_ignore_query_string() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/contacts", ApiResponse::json(200, json!([])));

        let response = mock
            .send(ApiRequest::new(Method::Get, "/contacts?org_id=org_1"))
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(mock.count(Method::Get, "/contacts"), 1);
        assert_eq!(mock.requests()[0].path, "/contacts?org_id=org_1");
    }

    #[tokio::test]
    async fn test_unscripted_is_not_found_and_failures_are_transport_errors() {
        let mock = MockTransport::new();
        mock.fail(Method::Post, "/auth/logout", "connection refused");

        let missing = mock.send(ApiRequest::new(Method::Get, "/nope")).await.unwrap();
        assert_eq!(missing.status, 404);

        let err = mock
            .send(ApiRequest::new(Method::Post, "/auth/logout"))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Transport("connection refused".to_string()));
        assert_eq!(mock.total(), 2);
    }
}
