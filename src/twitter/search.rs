// Mention search and reply filtering.
//
// One bounded query against the standard search endpoint — the most recent
// tweets mentioning a user — then a client-side pass keeping only direct
// replies to a specific tweet. The standard API tier has no direct
// "replies to tweet X" query, so filtering the mention feed is how a
// thread's direct replies get reconstructed.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::client::TwitterClient;

/// Page cap enforced by the standard search endpoint; also the most
/// candidates a single fetch will ever consider.
pub const SEARCH_PAGE_LIMIT: u32 = 100;

/// Response from `/1.1/search/tweets.json`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub statuses: Vec<Tweet>,
}

/// A single candidate tweet from the search page.
///
/// Only `in_reply_to_status_id_str` is inspected here — everything else
/// passes through to the caller unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id_str: String,
    pub text: String,
    pub created_at: String,
    pub user: TweetAuthor,
    /// Id of the tweet this one replies to; absent for non-replies.
    pub in_reply_to_status_id_str: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetAuthor {
    pub screen_name: String,
}

/// Fetch the most recent tweets mentioning `user`, newest first.
///
/// Issues exactly one page request capped at `count` items (at most 100);
/// the search cursor is never advanced. An empty handle is not rejected
/// locally — the remote API refuses the query and that error propagates.
pub async fn search_mentions(
    client: &TwitterClient,
    user: &str,
    count: u32,
) -> Result<Vec<Tweet>> {
    let query = format!("to:{user}");
    let count = count.min(SEARCH_PAGE_LIMIT).to_string();

    let response: SearchResponse = client
        .api_get(
            "/1.1/search/tweets.json",
            &[("q", &query), ("result_type", "recent"), ("count", &count)],
        )
        .await
        .with_context(|| format!("Failed to search mentions of @{user}"))?;

    debug!(
        candidates = response.statuses.len(),
        user = user,
        "Fetched mention page"
    );

    Ok(response.statuses)
}

/// Keep only candidates that are direct replies to `tweet_id`.
///
/// A candidate is kept iff it carries a reply-to id string-equal to the
/// queried id. A candidate without a reply-to id never matches, even when
/// `tweet_id` is unset. Relative order is preserved.
pub fn filter_replies(candidates: Vec<Tweet>, tweet_id: Option<&str>) -> Vec<Tweet> {
    candidates
        .into_iter()
        .filter(
            |tweet| match (tweet.in_reply_to_status_id_str.as_deref(), tweet_id) {
                (Some(reply_to), Some(id)) => reply_to == id,
                _ => false,
            },
        )
        .collect()
}
