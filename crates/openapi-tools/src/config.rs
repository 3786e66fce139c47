use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration shared by the static and dynamic tool bindings.
///
/// The API key policy is deliberately a single option consumed by the
/// dispatcher, so both binding styles attach (or omit) the key identically.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterConfig {
    /// OpenAPI document location (URL or file path). `None` selects the
    /// static binding. The dynamic binding takes its base URL from the
    /// document's `servers[0].url`.
    #[serde(default)]
    pub document: Option<String>,

    /// Static API key attached as `x-api-key` on every proxied call.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-call deadline in seconds. 0 disables the deadline.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            document: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AdapterConfig {
    /// The effective per-call deadline. 0 means explicit disable.
    #[must_use]
    pub fn call_timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
