// Secret resolution — name-keyed lookup of structured secret values.
//
// The legacy credential path resolves a named secret at run time instead of
// receiving credentials directly. The default store reads the name as an
// environment variable holding a JSON document, which is how older
// deployments fed credentials to scheduled tasks.

use anyhow::{Context, Result};
use serde_json::Value;

/// Name-keyed store resolving a secret name to a structured JSON value.
///
/// Object-safe so tests can substitute an in-memory store.
pub trait SecretStore: Send + Sync {
    /// Look up a secret by name. The stored value must parse as JSON.
    fn get(&self, name: &str) -> Result<Value>;
}

/// Default store: the secret name is an environment variable whose value is
/// a JSON document. The .env file is loaded at startup via dotenvy, so
/// file-based deployments work through this path too.
pub struct EnvSecretStore;

impl SecretStore for EnvSecretStore {
    fn get(&self, name: &str) -> Result<Value> {
        let raw = std::env::var(name)
            .with_context(|| format!("secret {name} not found in the environment"))?;
        serde_json::from_str(&raw).with_context(|| format!("secret {name} is not valid JSON"))
    }
}
