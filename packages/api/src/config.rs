//! Backend configuration.
//!
//! The only required value is the backend base URL. In the browser it is baked
//! in at build time (`CRM_BACKEND_URL`); native builds additionally consult a
//! `.env` file and the process environment at run time. An empty value means
//! the API is served from the same origin as the app.

use crate::ApiError;

/// Build-time backend base URL.
const BUILD_BACKEND_URL: Option<&str> = option_env!("CRM_BACKEND_URL");
/// Build-time identity provider entry point for the "Continue with Google" flow.
const BUILD_AUTH_URL: Option<&str> = option_env!("CRM_AUTH_URL");

/// Where the REST backend lives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiConfig {
    /// Backend origin, e.g. `https://crm.example.com`. Empty for same-origin.
    pub backend_url: String,
    /// External identity provider that redirects back with `#session_id=...`.
    pub identity_provider_url: Option<String>,
}

impl ApiConfig {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            identity_provider_url: None,
        }
    }

    pub fn with_identity_provider(mut self, url: impl Into<String>) -> Self {
        self.identity_provider_url = Some(url.into());
        self
    }

    /// Resolve the configuration for the current target.
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            dotenvy::dotenv().ok();

            let backend_url = std::env::var("CRM_BACKEND_URL")
                .ok()
                .or_else(|| BUILD_BACKEND_URL.map(str::to_string))
                .unwrap_or_default();
            let identity_provider_url = std::env::var("CRM_AUTH_URL")
                .ok()
                .or_else(|| BUILD_AUTH_URL.map(str::to_string))
                .filter(|url| !url.trim().is_empty());

            Self {
                backend_url,
                identity_provider_url,
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            Self {
                backend_url: BUILD_BACKEND_URL.unwrap_or_default().to_string(),
                identity_provider_url: BUILD_AUTH_URL
                    .filter(|url| !url.trim().is_empty())
                    .map(str::to_string),
            }
        }
    }

    /// Pin the backend to an absolute URL.
    ///
    /// An empty backend URL, or one that is only a path such as `/crm`, is
    /// taken relative to `origin` (the page origin in the browser). Without an
    /// origin such a configuration cannot reach anything and is rejected.
    pub fn resolve(mut self, origin: Option<&str>) -> Result<Self, ApiError> {
        let backend = self.backend_url.trim().trim_end_matches('/').to_string();
        if url::Url::parse(&backend).is_ok_and(|u| u.has_host()) {
            self.backend_url = backend;
            return Ok(self);
        }
        if !backend.is_empty() && !backend.starts_with('/') {
            return Err(ApiError::Config(format!(
                "CRM_BACKEND_URL must be an absolute URL or a path, got {backend:?}"
            )));
        }
        let origin = origin
            .map(|o| o.trim().trim_end_matches('/'))
            .filter(|o| !o.is_empty())
            .ok_or_else(|| {
                ApiError::Config("CRM_BACKEND_URL must be set when not running in a browser".to_string())
            })?;
        self.backend_url = format!("{origin}{backend}");
        Ok(self)
    }

    /// Base URL every endpoint path is appended to.
    pub fn api_base(&self) -> String {
        format!("{}/api", self.backend_url.trim().trim_end_matches('/'))
    }

    /// Full URL for an endpoint path such as `/auth/me`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base(), path.trim_start_matches('/'))
    }

    /// Identity provider URL that sends the user back to `return_to` after sign-in.
    pub fn identity_provider_redirect(&self, return_to: &str) -> Option<String> {
        let base = self.identity_provider_url.as_deref()?;
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("redirect", return_to)
            .finish();
        Some(format!("{}/?{query}", base.trim_end_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_trims_trailing_slash() {
        let config = ApiConfig::new("https://crm.example.com/");
        assert_eq!(config.api_base(), "https://crm.example.com/api");
        assert_eq!(
            config.endpoint("/auth/me"),
            "https://crm.example.com/api/auth/me"
        );
    }

    #[test]
    fn test_empty_backend_is_same_origin() {
        let config = ApiConfig::default();
        assert_eq!(config.api_base(), "/api");
        assert_eq!(config.endpoint("organizations"), "/api/organizations");
    }

    #[test]
    fn test_same_origin_resolves_against_page() {
        let config = ApiConfig::default()
            .resolve(Some("https://app.example.com/"))
            .unwrap();
        assert_eq!(config.endpoint("/auth/me"), "https://app.example.com/api/auth/me");

        let config = ApiConfig::new("/crm").resolve(Some("https://app.example.com")).unwrap();
        assert_eq!(config.api_base(), "https://app.example.com/crm/api");
    }

    #[test]
    fn test_absolute_backend_ignores_origin() {
        let config = ApiConfig::new("https://crm.example.com/")
            .resolve(Some("https://app.example.com"))
            .unwrap();
        assert_eq!(config.api_base(), "https://crm.example.com/api");
        assert!(ApiConfig::new("https://crm.example.com").resolve(None).is_ok());
    }

    #[test]
    fn test_relative_backend_without_origin_is_rejected() {
        assert!(matches!(ApiConfig::default().resolve(None), Err(ApiError::Config(_))));
        assert!(matches!(ApiConfig::new("/crm").resolve(Some("")), Err(ApiError::Config(_))));
        assert!(matches!(
            ApiConfig::new("crm.example.com").resolve(Some("https://app.example.com")),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn test_identity_provider_redirect() {
        let config = ApiConfig::new("").with_identity_provider("https://auth.example.com");
        assert_eq!(
            config
                .identity_provider_redirect("https://app.example.com/dashboard")
                .as_deref(),
            Some("https://auth.example.com/?redirect=https%3A%2F%2Fapp.example.com%2Fdashboard")
        );
        assert!(ApiConfig::default()
            .identity_provider_redirect("/dashboard")
            .is_none());
    }
}
