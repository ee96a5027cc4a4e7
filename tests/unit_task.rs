// Unit tests for the reply-fetch task surface.
//
// Covers call-time defaulting, credential resolution precedence, the
// pre-network configuration failure, and secret redaction — using an
// in-memory secret store instead of the environment.

use anyhow::Result;
use serde_json::{json, Value};

use backtalk::error::TaskError;
use backtalk::secrets::SecretStore;
use backtalk::task::{resolve_credentials, Credentials, FetchReplies, RunArgs, Task};

/// Store returning the same JSON value for every name.
struct FixedStore(Value);

impl SecretStore for FixedStore {
    fn get(&self, _name: &str) -> Result<Value> {
        Ok(self.0.clone())
    }
}

/// Store that fails every lookup.
struct FailStore;

impl SecretStore for FailStore {
    fn get(&self, name: &str) -> Result<Value> {
        anyhow::bail!("secret {name} not found in the environment")
    }
}

fn credentials(tag: &str) -> Credentials {
    Credentials {
        api_key: format!("{tag}-key"),
        api_secret: format!("{tag}-secret"),
        access_token: format!("{tag}-token"),
        access_token_secret: format!("{tag}-token-secret"),
    }
}

fn secret_json(tag: &str) -> Value {
    json!({
        "api_key": format!("{tag}-key"),
        "api_secret": format!("{tag}-secret"),
        "access_token": format!("{tag}-token"),
        "access_token_secret": format!("{tag}-token-secret"),
    })
}

// ============================================================
// Call-time defaulting
// ============================================================

#[test]
fn call_time_values_win_over_construction_defaults() {
    let task = FetchReplies::new()
        .with_user("alice")
        .with_tweet_id("42")
        .with_credentials_secret("OLD_SECRET");

    let args = RunArgs {
        user: Some("bob".to_string()),
        tweet_id: Some("77".to_string()),
        credentials: None,
        credentials_secret: Some("NEW_SECRET".to_string()),
    };

    let merged = args.or_defaults(&task);
    assert_eq!(merged.user.as_deref(), Some("bob"));
    assert_eq!(merged.tweet_id.as_deref(), Some("77"));
    assert_eq!(merged.credentials_secret.as_deref(), Some("NEW_SECRET"));
}

#[test]
fn explicit_empty_string_still_overrides_default() {
    // The sentinel is None, not "falsy" — an empty string is an override.
    let task = FetchReplies::new().with_user("alice");

    let args = RunArgs {
        user: Some(String::new()),
        ..RunArgs::default()
    };

    let merged = args.or_defaults(&task);
    assert_eq!(merged.user.as_deref(), Some(""));
}

#[test]
fn unset_args_fall_back_to_construction_defaults() {
    let task = FetchReplies::new()
        .with_user("alice")
        .with_tweet_id("42")
        .with_credentials_secret("TWITTER_API_CREDENTIALS");

    let merged = RunArgs::default().or_defaults(&task);
    assert_eq!(merged.user.as_deref(), Some("alice"));
    assert_eq!(merged.tweet_id.as_deref(), Some("42"));
    assert_eq!(
        merged.credentials_secret.as_deref(),
        Some("TWITTER_API_CREDENTIALS")
    );
}

#[test]
fn credentials_pass_through_the_merge_untouched() {
    // Direct credentials have no construction-time counterpart
    let task = FetchReplies::new().with_user("alice");

    let args = RunArgs {
        credentials: Some(credentials("direct")),
        ..RunArgs::default()
    };

    let merged = args.or_defaults(&task);
    assert_eq!(merged.credentials.unwrap().api_key, "direct-key");

    let merged_empty = RunArgs::default().or_defaults(&task);
    assert!(merged_empty.credentials.is_none());
}

// ============================================================
// Credential resolution
// ============================================================

#[test]
fn direct_credentials_used_when_no_secret_name() {
    let resolved = resolve_credentials(Some(credentials("direct")), None, &FailStore).unwrap();
    assert_eq!(resolved.api_key, "direct-key");
    assert_eq!(resolved.access_token_secret, "direct-token-secret");
}

#[test]
fn secret_lookup_overrides_direct_credentials() {
    // Legacy precedence: the named secret unconditionally replaces any
    // directly passed credentials.
    let store = FixedStore(secret_json("stored"));
    let resolved =
        resolve_credentials(Some(credentials("direct")), Some("CREDS"), &store).unwrap();
    assert_eq!(resolved.api_key, "stored-key");
    assert_eq!(resolved.api_secret, "stored-secret");
    assert_eq!(resolved.access_token, "stored-token");
    assert_eq!(resolved.access_token_secret, "stored-token-secret");
}

#[test]
fn missing_credentials_fail_with_config_error() {
    let err = resolve_credentials(None, None, &FailStore).unwrap_err();
    match err {
        TaskError::Config(msg) => assert_eq!(msg, "credentials not provided"),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
fn failed_secret_lookup_is_a_config_error() {
    let err = resolve_credentials(None, Some("MISSING"), &FailStore).unwrap_err();
    match err {
        TaskError::Config(msg) => assert!(msg.contains("MISSING"), "unexpected message: {msg}"),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
fn malformed_secret_value_is_a_config_error() {
    // Stored document missing three of the four credential keys
    let store = FixedStore(json!({"api_key": "only-this"}));
    let err = resolve_credentials(None, Some("PARTIAL"), &store).unwrap_err();
    assert!(matches!(err, TaskError::Config(_)));
}

// ============================================================
// The run entry point
// ============================================================

#[tokio::test]
async fn run_without_credentials_fails_before_any_request() {
    // The base URL points at a closed local port: if the task attempted a
    // network call the failure would surface as an Api error, not Config.
    let task = FetchReplies::new()
        .with_user("alice")
        .with_tweet_id("42")
        .with_base_url("http://127.0.0.1:9")
        .with_secret_store(Box::new(FailStore));

    let err = task.run(RunArgs::default()).await.unwrap_err();
    match err {
        TaskError::Config(msg) => assert_eq!(msg, "credentials not provided"),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_propagates_as_api_error() {
    let task = FetchReplies::new()
        .with_user("alice")
        .with_tweet_id("42")
        .with_base_url("http://127.0.0.1:9");

    let args = RunArgs {
        credentials: Some(credentials("direct")),
        ..RunArgs::default()
    };

    let err = task.run(args).await.unwrap_err();
    assert!(matches!(err, TaskError::Api(_)));
}

// ============================================================
// Secret material handling
// ============================================================

#[test]
fn debug_output_redacts_credential_fields() {
    let debugged = format!("{:?}", credentials("direct"));
    assert!(debugged.contains("<redacted>"));
    assert!(!debugged.contains("direct-key"));
    assert!(!debugged.contains("direct-secret"));
    assert!(!debugged.contains("direct-token"));
}
