use std::time::Duration;

/// Remote data service connection configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the storefront API, without a trailing slash.
    pub base_url: String,

    /// Overall request timeout.
    pub request_timeout: Duration,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl RemoteConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("bagsync/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url cannot be empty".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("base_url must start with http:// or https://".to_string());
        }
        if self.request_timeout.is_zero() {
            return Err("request_timeout must be > 0".to_string());
        }
        Ok(())
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RemoteConfig::new("http://localhost:4000");
        assert_eq!(config.base_url, "http://localhost:4000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("bagsync/"));
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let config = RemoteConfig::new("http://localhost:4000/");
        assert_eq!(config.endpoint("/api/shop/bag"), "http://localhost:4000/api/shop/bag");
    }

    #[test]
    fn test_builder_pattern() {
        let config = RemoteConfig::new("https://shop.example.com")
            .request_timeout(Duration::from_secs(5))
            .user_agent("storefront-tests");

        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "storefront-tests");
    }

    #[test]
    fn test_validate() {
        assert!(RemoteConfig::new("http://localhost:4000").validate().is_ok());
        assert!(RemoteConfig::new("").validate().is_err());
        assert!(RemoteConfig::new("localhost:4000").validate().is_err());

        let zero_timeout =
            RemoteConfig::new("http://localhost:4000").request_timeout(Duration::ZERO);
        assert!(zero_timeout.validate().is_err());
    }
}
