//! Process-wide configuration for reaching an Aha! account.
//!
//! Values come from CLI flags or the environment:
//! - `AHA_DOMAIN` - Account subdomain (`acme` for `acme.aha.io`)
//! - `AHA_API_TOKEN` - API token used as a bearer credential
//! - `AHA_BASE_URL` - Optional override for `https://{domain}.aha.io`

use clap::Args;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Blank(&'static str),
}

/// Credentials and endpoint for the Aha! account.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Aha! subdomain, e.g. `acme` for acme.aha.io
    #[arg(long, env = "AHA_DOMAIN")]
    pub domain: String,

    /// Aha! API token
    #[arg(long, env = "AHA_API_TOKEN", hide_env_values = true)]
    pub api_token: String,

    /// Override the account URL (defaults to https://{domain}.aha.io)
    #[arg(long, env = "AHA_BASE_URL")]
    pub base_url: Option<String>,
}

impl Config {
    pub fn new(domain: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            api_token: api_token.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Reject values that are present but blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain.trim().is_empty() {
            return Err(ConfigError::Blank("AHA_DOMAIN"));
        }
        if self.api_token.trim().is_empty() {
            return Err(ConfigError::Blank("AHA_API_TOKEN"));
        }
        Ok(())
    }

    /// Account root without a trailing slash.
    pub fn account_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.aha.io", self.domain.trim()),
        }
    }

    pub fn rest_base(&self) -> String {
        format!("{}/api/v1", self.account_url())
    }

    pub fn graphql_url(&self) -> String {
        format!("{}/api/v2/graphql", self.account_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_urls_from_domain() {
        let config = Config::new("acme", "token");
        assert_eq!(config.rest_base(), "https://acme.aha.io/api/v1");
        assert_eq!(config.graphql_url(), "https://acme.aha.io/api/v2/graphql");
    }

    #[test]
    fn base_url_override_wins_and_drops_trailing_slash() {
        let config = Config::new("acme", "token").with_base_url("http://127.0.0.1:4000/");
        assert_eq!(config.rest_base(), "http://127.0.0.1:4000/api/v1");
        assert_eq!(config.graphql_url(), "http://127.0.0.1:4000/api/v2/graphql");
    }

    #[test]
    fn blank_values_are_rejected() {
        assert_eq!(
            Config::new("  ", "token").validate(),
            Err(ConfigError::Blank("AHA_DOMAIN"))
        );
        assert_eq!(
            Config::new("acme", "").validate(),
            Err(ConfigError::Blank("AHA_API_TOKEN"))
        );
        assert!(Config::new("acme", "token").validate().is_ok());
    }
}
