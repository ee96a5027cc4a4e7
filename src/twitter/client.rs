// Signed Twitter API client — OAuth 1.0a user context over HTTP.
//
// A thin reqwest wrapper with a generic GET helper. Every request is signed
// with the consumer key/secret and access token/secret pair; query
// parameters are attached through the signing builder so the signature
// covers them.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest_oauth1::{OAuthClientProvider, Secrets};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::task::Credentials;

/// Default endpoint for Twitter REST calls.
pub const DEFAULT_API_URL: &str = "https://api.twitter.com";

/// OAuth 1.0a signed HTTP client for the Twitter REST API.
pub struct TwitterClient {
    client: reqwest::Client,
    secrets: Secrets<'static>,
    base_url: String,
}

impl TwitterClient {
    /// Create a client signing with the given credentials, pointed at the
    /// default API endpoint, with no per-request timeout.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        Self::with_options(credentials, DEFAULT_API_URL, None)
    }

    /// Create a client with an explicit base URL and optional timeout.
    ///
    /// Without a timeout each call may block until the provider responds —
    /// the historical behavior of this fetch. Pass one to bound the wait.
    pub fn with_options(
        credentials: &Credentials,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        let secrets = Secrets::new_with_token(
            credentials.api_key.clone(),
            credentials.api_secret.clone(),
            credentials.access_token.clone(),
            credentials.access_token_secret.clone(),
        );

        Ok(Self {
            client,
            secrets,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Make a signed GET request to a REST path and deserialize the response.
    ///
    /// `params` are query string key-value pairs. No retry, no backoff —
    /// a non-2xx status becomes an error carrying the status and body.
    pub async fn api_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        debug!(path = path, "Twitter API GET request");

        let response = self
            .client
            .clone()
            .oauth1(self.secrets.clone())
            .request(reqwest::Method::GET, &url)
            .query(params)
            .send()
            .await
            .with_context(|| format!("Twitter API request failed: {path}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Twitter API {path} returned {status}: {body}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize {path} response"))
    }

    /// Fetch the authenticated account's profile.
    ///
    /// A cheap way to confirm the configured credentials sign valid
    /// requests before wiring the task into a schedule.
    pub async fn verify_credentials(&self) -> Result<ApiUser> {
        self.api_get(
            "/1.1/account/verify_credentials.json",
            &[("skip_status", "true")],
        )
        .await
    }
}

/// The authenticated user, as reported by account verification.
#[derive(Debug, Deserialize)]
pub struct ApiUser {
    pub id_str: String,
    pub screen_name: String,
}
