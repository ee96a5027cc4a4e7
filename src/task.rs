// The reply-fetch task — the unit of work an external scheduler invokes.
//
// Construction captures per-deployment defaults; each run merges call-time
// arguments over those defaults, resolves credentials, and performs one
// bounded fetch-and-filter pass. Runs are stateless and independent of one
// another.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::TaskError;
use crate::secrets::{EnvSecretStore, SecretStore};
use crate::twitter::client::{TwitterClient, DEFAULT_API_URL};
use crate::twitter::search::{self, Tweet, SEARCH_PAGE_LIMIT};

/// OAuth 1.0a user-context credentials for the Twitter API.
///
/// Four opaque strings, treated as secret material throughout. The manual
/// Debug impl keeps them out of logs and panic messages.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

/// Call-time arguments for a single run.
///
/// `None` means "not supplied" and falls back to the task's construction-time
/// default. An explicit `Some` always wins — including `Some(String::new())`
/// when a caller genuinely wants an empty override.
#[derive(Debug, Default, Clone)]
pub struct RunArgs {
    /// Handle whose mentions are searched.
    pub user: Option<String>,
    /// Tweet id whose direct replies to keep.
    pub tweet_id: Option<String>,
    /// Credentials passed directly — the preferred path.
    pub credentials: Option<Credentials>,
    /// Resolve credentials from this named secret instead (deprecated).
    pub credentials_secret: Option<String>,
}

impl RunArgs {
    /// Fill unset arguments from the task's construction-time defaults.
    ///
    /// Covers exactly the declared names `user`, `tweet_id` and
    /// `credentials_secret`; direct `credentials` have no construction-time
    /// counterpart and pass through untouched.
    pub fn or_defaults(self, task: &FetchReplies) -> RunArgs {
        RunArgs {
            user: self.user.or_else(|| task.user.clone()),
            tweet_id: self.tweet_id.or_else(|| task.tweet_id.clone()),
            credentials: self.credentials,
            credentials_secret: self
                .credentials_secret
                .or_else(|| task.credentials_secret.clone()),
        }
    }
}

/// A unit of work with one entry point, invoked by an external scheduler.
///
/// Implementations recover from nothing locally — retry, alerting and
/// task-state transitions belong to the scheduler.
#[async_trait]
pub trait Task: Send + Sync {
    type Output;

    /// Execute the task once with the given call-time arguments.
    async fn run(&self, args: RunArgs) -> Result<Self::Output, TaskError>;
}

/// Fetch the direct replies to a specific tweet.
///
/// Queries the 100 most recent mentions of a user, then filters for the
/// candidates whose reply-to id matches the given tweet id. All
/// construction-time settings can be overridden per run.
pub struct FetchReplies {
    user: Option<String>,
    tweet_id: Option<String>,
    /// Deprecated path: resolve credentials from a named secret at run time.
    credentials_secret: Option<String>,
    count: u32,
    base_url: Option<String>,
    timeout: Option<Duration>,
    store: Box<dyn SecretStore>,
}

impl Default for FetchReplies {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchReplies {
    pub fn new() -> Self {
        Self {
            user: None,
            tweet_id: None,
            credentials_secret: None,
            count: SEARCH_PAGE_LIMIT,
            base_url: None,
            timeout: None,
            store: Box::new(EnvSecretStore),
        }
    }

    /// Default handle whose mentions are searched.
    pub fn with_user(mut self, user: &str) -> Self {
        self.user = Some(user.to_string());
        self
    }

    /// Default tweet id whose replies to collect.
    pub fn with_tweet_id(mut self, tweet_id: &str) -> Self {
        self.tweet_id = Some(tweet_id.to_string());
        self
    }

    /// Default named secret for credential resolution (deprecated path).
    pub fn with_credentials_secret(mut self, name: &str) -> Self {
        self.credentials_secret = Some(name.to_string());
        self
    }

    /// Page size requested from the search endpoint, clamped to 100.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count.min(SEARCH_PAGE_LIMIT);
        self
    }

    /// Point the run at a different API endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.to_string());
        self
    }

    /// Bound each outbound request. Without this, a request may block until
    /// the provider responds or errors.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Substitute the secret store used by the deprecated credential path.
    pub fn with_secret_store(mut self, store: Box<dyn SecretStore>) -> Self {
        self.store = store;
        self
    }
}

/// Resolve the effective credentials for one run.
///
/// A supplied secret name always wins: the named secret replaces any
/// directly passed credentials. That precedence is a legacy contract some
/// callers still depend on, so it is preserved exactly. Emits one
/// deprecation warning per run on that path. Fails before any network
/// activity when no credentials remain.
pub fn resolve_credentials(
    direct: Option<Credentials>,
    secret_name: Option<&str>,
    store: &dyn SecretStore,
) -> Result<Credentials, TaskError> {
    let mut credentials = direct;

    if let Some(name) = secret_name {
        warn!(
            secret = name,
            "the credentials_secret path is deprecated; pass credentials directly at run time"
        );

        let value = store
            .get(name)
            .map_err(|e| TaskError::Config(format!("failed to resolve secret {name}: {e:#}")))?;
        credentials = Some(serde_json::from_value(value).map_err(|e| {
            TaskError::Config(format!(
                "secret {name} does not hold the four credential keys: {e}"
            ))
        })?);
    }

    credentials.ok_or_else(|| TaskError::Config("credentials not provided".to_string()))
}

#[async_trait]
impl Task for FetchReplies {
    type Output = Vec<Tweet>;

    async fn run(&self, args: RunArgs) -> Result<Vec<Tweet>, TaskError> {
        let args = args.or_defaults(self);

        let credentials = resolve_credentials(
            args.credentials,
            args.credentials_secret.as_deref(),
            self.store.as_ref(),
        )?;

        let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_API_URL);
        let client = TwitterClient::with_options(&credentials, base_url, self.timeout)?;

        // An unset handle is not pre-checked; the empty query is sent and
        // the remote rejection propagates.
        let user = args.user.unwrap_or_default();
        let candidates = search::search_mentions(&client, &user, self.count).await?;
        let replies = search::filter_replies(candidates, args.tweet_id.as_deref());

        info!(
            replies = replies.len(),
            tweet_id = args.tweet_id.as_deref().unwrap_or(""),
            "Filtered direct replies"
        );

        Ok(replies)
    }
}
