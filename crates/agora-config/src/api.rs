use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:4000`.
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("AGORA_API_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .ok()
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.base_url),
            request_timeout: env::var("AGORA_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Absolute URL for an API path such as `/auth/login`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
