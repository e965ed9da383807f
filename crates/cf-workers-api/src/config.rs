//! Process-wide provider configuration
//!
//! Built once at startup from CLI flags / environment and then shared
//! read-only with the dispatcher. Nothing below this module reads the
//! environment.

use std::fmt;

use url::Url;

use crate::{Error, Result};

/// Default base URL of the Cloudflare v4 API.
pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Account identifier, bearer credential and API base.
#[derive(Clone)]
pub struct Config {
    account_id: String,
    api_token: String,
    api_base: Url,
}

impl Config {
    /// Create a configuration against the default API base.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the account id or token is blank.
    pub fn new(account_id: impl Into<String>, api_token: impl Into<String>) -> Result<Self> {
        let api_base = Url::parse(DEFAULT_API_BASE)?;
        Self::with_api_base(account_id, api_token, api_base)
    }

    /// Create a configuration against a custom API base (tests, proxies).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the account id or token is blank, or the
    /// base URL cannot carry a path.
    pub fn with_api_base(
        account_id: impl Into<String>,
        api_token: impl Into<String>,
        api_base: Url,
    ) -> Result<Self> {
        let account_id = account_id.into();
        if account_id.trim().is_empty() {
            return Err(Error::config("CF_ACCOUNT_ID must not be empty"));
        }

        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(Error::config("CF_API_TOKEN must not be empty"));
        }

        if api_base.cannot_be_a_base() {
            return Err(Error::config(format!("API base '{api_base}' cannot carry a path")));
        }

        Ok(Self {
            account_id: account_id.trim().to_string(),
            api_token: api_token.trim().to_string(),
            api_base,
        })
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Resolve a provider path (e.g. `/accounts/x/workers/scripts`) against
    /// the API base, keeping any path prefix the base already has.
    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        let base = self.api_base.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// Value of the `Authorization` header sent with every request.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.api_token)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("account_id", &self.account_id)
            .field("api_token", &"<redacted>")
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_base() {
        let config = Config::new("acc", "tok").unwrap();
        assert_eq!(config.api_base().as_str(), DEFAULT_API_BASE);
        assert_eq!(config.account_id(), "acc");
    }

    #[test]
    fn test_blank_account_rejected() {
        let err = Config::new("  ", "tok").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("CF_ACCOUNT_ID"));
    }

    #[test]
    fn test_blank_token_rejected() {
        let err = Config::new("acc", "").unwrap_err();
        assert!(err.to_string().contains("CF_API_TOKEN"));
    }

    #[test]
    fn test_endpoint_url_keeps_base_prefix() {
        let config = Config::new("acc", "tok").unwrap();
        let url = config.endpoint_url("/accounts/acc/workers/scripts").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.cloudflare.com/client/v4/accounts/acc/workers/scripts"
        );
    }

    #[test]
    fn test_endpoint_url_with_trailing_slash_base() {
        let base = Url::parse("http://127.0.0.1:9000/").unwrap();
        let config = Config::with_api_base("acc", "tok", base).unwrap();
        let url = config.endpoint_url("/zones/z/workers/routes").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/zones/z/workers/routes");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::new("acc", "super-secret").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_authorization_header() {
        let config = Config::new("acc", "tok").unwrap();
        assert_eq!(config.authorization(), "Bearer tok");
    }
}
