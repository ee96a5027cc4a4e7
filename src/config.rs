use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::task::Credentials;
use crate::twitter::client::DEFAULT_API_URL;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
    /// Twitter API endpoint (defaults to https://api.twitter.com).
    /// Overridable for tests and alternate deployments.
    pub api_base_url: String,
    /// Optional per-request timeout. Unset means the historical behavior:
    /// each call may block until the provider responds or errors.
    pub http_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Credential variables default to empty — `require_credentials`
    /// enforces their presence before any direct API use.
    pub fn load() -> Result<Self> {
        let http_timeout = match env::var("TWITTER_HTTP_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .parse()
                    .context("TWITTER_HTTP_TIMEOUT_SECS must be a whole number of seconds")?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Self {
            api_key: env::var("TWITTER_API_KEY").unwrap_or_default(),
            api_secret: env::var("TWITTER_API_SECRET").unwrap_or_default(),
            access_token: env::var("TWITTER_ACCESS_TOKEN").unwrap_or_default(),
            access_token_secret: env::var("TWITTER_ACCESS_TOKEN_SECRET").unwrap_or_default(),
            api_base_url: env::var("TWITTER_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            http_timeout,
        })
    }

    /// Assemble the four credential fields, or None when any is unset.
    pub fn credentials(&self) -> Option<Credentials> {
        if self.api_key.is_empty()
            || self.api_secret.is_empty()
            || self.access_token.is_empty()
            || self.access_token_secret.is_empty()
        {
            return None;
        }

        Some(Credentials {
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
            access_token: self.access_token.clone(),
            access_token_secret: self.access_token_secret.clone(),
        })
    }

    /// Check that all four OAuth credential variables are configured and
    /// assemble them. Call this before any operation that signs requests.
    pub fn require_credentials(&self) -> Result<Credentials> {
        self.credentials().ok_or_else(|| {
            anyhow::anyhow!(
                "Twitter credentials not fully configured. Set TWITTER_API_KEY,\n\
                 TWITTER_API_SECRET, TWITTER_ACCESS_TOKEN and TWITTER_ACCESS_TOKEN_SECRET\n\
                 in your .env file."
            )
        })
    }
}
