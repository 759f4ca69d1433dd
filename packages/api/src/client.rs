//! Typed JSON client over a [`Transport`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
use crate::{ApiConfig, ApiError};

/// Cheap-to-clone handle used by every page and by the session logic.
#[derive(Debug)]
pub struct ApiClient<T = HttpTransport> {
    transport: Arc<T>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl ApiClient<HttpTransport> {
    pub fn from_config(config: ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.execute(ApiRequest::new(Method::Get, path)).await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::Post, path).with_body(to_json(body)?);
        self.execute(request).await
    }

    /// POST without a request body.
    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.execute(ApiRequest::new(Method::Post, path)).await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::Put, path).with_body(to_json(body)?);
        self.execute(request).await
    }

    /// DELETE, discarding whatever acknowledgement the backend returns.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let _: serde::de::IgnoredAny = self.execute(ApiRequest::new(Method::Delete, path)).await?;
        Ok(())
    }

    async fn execute<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let method = request.method;
        let route = request.route().to_string();
        let response = self.transport.send(request).await?;
        decode(response).inspect_err(|e| {
            tracing::debug!(%method, path = %route, "api call failed: {}", e);
        })
    }
}

fn to_json<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Schema(e.to_string()))
}

/// Turn a raw response into a typed value, classifying every failure.
pub fn decode<R: DeserializeOwned>(response: ApiResponse) -> Result<R, ApiError> {
    let status = response.status;
    let parsed: Result<Value, _> = if response.body.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str(&response.body)
    };

    if !response.is_success() {
        return Err(match parsed {
            Ok(value) => ApiError::Status {
                status,
                detail: value
                    .get("detail")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
            Err(_) => ApiError::NotJson { status },
        });
    }

    let value = parsed.map_err(|_| ApiError::NotJson { status })?;
    serde_json::from_value(value).map_err(|e| ApiError::Schema(e.to_string()))
}

/// Append query parameters, skipping absent ones.
pub fn with_query(path: &str, params: &[(&str, Option<&str>)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in params {
        if let Some(value) = value {
            serializer.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("{path}?{}", serializer.finish())
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockTransport;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_decode_success() {
        let named: Named = decode(ApiResponse::json(200, json!({ "name": "Acme" }))).unwrap();
        assert_eq!(named.name, "Acme");
    }

    #[test]
    fn test_decode_status_with_detail() {
        let err = decode::<Named>(ApiResponse::json(401, json!({ "detail": "Not authenticated" })))
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 401,
                detail: Some("Not authenticated".to_string())
            }
        );
    }

    #[test]
    fn test_decode_status_without_body() {
        let err = decode::<Named>(ApiResponse::empty(500)).unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                detail: None
            }
        );
    }

    #[test]
    fn test_decode_html_is_not_json() {
        let ok_html = decode::<Named>(ApiResponse::html(200, "<html>oops</html>")).unwrap_err();
        assert_eq!(ok_html, ApiError::NotJson { status: 200 });

        let err_html = decode::<Named>(ApiResponse::html(502, "<html>Bad Gateway</html>")).unwrap_err();
        assert_eq!(err_html, ApiError::NotJson { status: 502 });
    }

    #[test]
    fn test_decode_schema_mismatch() {
        let err = decode::<Named>(ApiResponse::json(200, json!({ "title": "Acme" }))).unwrap_err();
        assert!(matches!(err, ApiError::Schema(_)));
    }

    #[test]
    fn test_with_query() {
        assert_eq!(with_query("/contacts", &[("org_id", None)]), "/contacts");
        assert_eq!(
            with_query(
                "/activities",
                &[("opp_id", Some("opp 1")), ("status", Some("Planned"))]
            ),
            "/activities?opp_id=opp+1&status=Planned"
        );
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let mock = MockTransport::new();
        mock.respond(Method::Post, "/things", ApiResponse::json(200, json!({ "name": "x" })));
        let client = ApiClient::new(mock.clone());

        let named: Named = client.post("/things", &json!({ "name": "x" })).await.unwrap();

        assert_eq!(named.name, "x");
        let requests = mock.requests();
        assert_eq!(requests[0].body, Some(json!({ "name": "x" })));
    }

    #[tokio::test]
    async fn test_delete_ignores_acknowledgement() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Delete,
            "/organizations/org_1",
            ApiResponse::json(200, json!({ "message": "Deleted" })),
        );
        let client = ApiClient::new(mock.clone());

        client.delete("/organizations/org_1").await.unwrap();
        assert_eq!(mock.count(Method::Delete, "/organizations/org_1"), 1);
    }
}
