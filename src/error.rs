// Task-level error taxonomy.
//
// Two failure classes cross the task boundary: configuration problems
// caught before any network activity, and remote API failures passed
// through from the HTTP client. Nothing is retried or reinterpreted here —
// the invoking scheduler owns retry, alerting, and task-state transitions.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    /// Credentials or other required settings were still missing after
    /// defaulting and secret resolution. Raised before any outbound request.
    #[error("{0}")]
    Config(String),

    /// Any failure from the remote API client — invalid credentials, rate
    /// limiting, transport errors, malformed responses. Propagated with its
    /// content intact.
    #[error(transparent)]
    Api(#[from] anyhow::Error),
}
