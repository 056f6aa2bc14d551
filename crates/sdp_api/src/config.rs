use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://sdpondemand.manageengine.com";
pub const DEFAULT_API_PATH: &str = "app/itdesk/api/v3";
pub const DEFAULT_ACCEPT: &str = "application/vnd.manageengine.v3+json";
pub const DEFAULT_USER_AGENT: &str = "sdp-worklogs";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthScheme {
    ZohoOAuthToken,
    Bearer,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::ZohoOAuthToken => "Zoho-oauthtoken",
            AuthScheme::Bearer => "Bearer",
        }
    }
}

/// Immutable connection settings handed to [`crate::SdpClient`]. Headers derived
/// from it are attached to every request the client issues.
#[derive(Clone, Debug)]
pub struct SdpConfig {
    pub base_url: String,
    pub api_path: String,
    pub token: String,
    pub auth_scheme: AuthScheme,
    pub accept: String,
    pub user_agent: String,
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl SdpConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            api_path: DEFAULT_API_PATH.to_string(),
            token: token.into(),
            auth_scheme: AuthScheme::ZohoOAuthToken,
            accept: DEFAULT_ACCEPT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            connect_timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_path(mut self, path: impl Into<String>) -> Self {
        self.api_path = path.into();
        self
    }

    pub fn with_auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = scheme;
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    pub fn with_connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Value of the `Authorization` header, e.g. `Zoho-oauthtoken 1000.abc`.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.auth_scheme.as_str(), self.token)
    }

    pub fn api_root(&self) -> String {
        let path = self.api_path.trim_matches('/');
        if path.is_empty() {
            format!("{}/", self.base_url.trim_end_matches('/'))
        } else {
            format!("{}/{}/", self.base_url.trim_end_matches('/'), path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_root_joins_base_and_path_once() {
        let config = SdpConfig::new("t")
            .with_base_url("https://desk.example.com/")
            .with_api_path("/app/itdesk/api/v3/");
        assert_eq!(config.api_root(), "https://desk.example.com/app/itdesk/api/v3/");
    }

    #[test]
    fn api_root_without_path() {
        let config = SdpConfig::new("t")
            .with_base_url("http://127.0.0.1:1234")
            .with_api_path("");
        assert_eq!(config.api_root(), "http://127.0.0.1:1234/");
    }

    #[test]
    fn authorization_uses_scheme_prefix() {
        let config = SdpConfig::new("abc");
        assert_eq!(config.authorization(), "Zoho-oauthtoken abc");

        let bearer = config.with_auth_scheme(AuthScheme::Bearer);
        assert_eq!(bearer.authorization(), "Bearer abc");
    }

    #[test]
    fn defaults_leave_timeouts_to_http_client() {
        let config = SdpConfig::new("abc");
        assert!(config.timeout.is_none());
        assert!(config.connect_timeout.is_none());
        assert_eq!(config.accept, DEFAULT_ACCEPT);
    }
}
