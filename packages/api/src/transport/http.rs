use reqwest::header::{ACCEPT, CONTENT_TYPE};

use super::{ApiRequest, ApiResponse, Method, Transport};
use crate::{ApiConfig, ApiError};

/// `reqwest`-backed transport.
///
/// In the browser every request is sent with `credentials: include` so the
/// backend's session cookie travels with it. Native builds keep their own
/// cookie jar for the lifetime of the client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ApiConfig,
}

/// Origin of the page hosting the app; `None` outside the browser.
fn page_origin() -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window().and_then(|window| window.location().origin().ok())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

impl HttpTransport {
    /// Build the transport. A same-origin configuration is pinned to the page
    /// origin here; outside the browser it is an error.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let config = config.resolve(page_origin().as_deref())?;

        #[cfg(not(target_arch = "wasm32"))]
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        #[cfg(target_arch = "wasm32")]
        let client = reqwest::Client::new();

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.config.endpoint(&request.path);

        // Bodies are never logged: the exchange and login calls carry secrets.
        tracing::debug!(method = %request.method, path = request.route(), "api request");

        let mut builder = self
            .client
            .request(Self::method(request.method), &url)
            .header(ACCEPT, "application/json");

        #[cfg(target_arch = "wasm32")]
        {
            builder = builder.fetch_credentials_include();
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %request.method, path = request.route(), "request failed: {}", e);
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        tracing::debug!(method = %request.method, path = request.route(), status, "api response");

        Ok(ApiResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_origin_config_is_rejected_outside_browser() {
        let err = HttpTransport::new(ApiConfig::default()).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_absolute_backend_builds_absolute_urls() {
        let transport = HttpTransport::new(ApiConfig::new("http://localhost:8000/")).unwrap();
        assert_eq!(
            transport.config().endpoint("/auth/me"),
            "http://localhost:8000/api/auth/me"
        );
    }
}
