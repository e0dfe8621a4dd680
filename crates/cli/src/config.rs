use std::time::Duration;

use facewatch_gateway::endpoints::DEFAULT_WEBHOOK_BASE;
use facewatch_session::training::DEFAULT_CONFIRMATION_DELAY;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Console configuration loaded from environment variables.
///
/// Every field has a default, so an empty environment talks to the
/// production webhook host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Base URL the six webhook paths are appended to.
    pub webhook_base: String,
    /// How long the training confirmation stays visible.
    pub train_confirmation: Duration,
}

impl ConsoleConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                                  |
    /// |--------------------------------|------------------------------------------|
    /// | `FACEWATCH_WEBHOOK_BASE`       | `https://n8n.sharedvisionai.org/webhook` |
    /// | `FACEWATCH_TRAIN_CONFIRM_SECS` | `3`                                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let webhook_base = lookup("FACEWATCH_WEBHOOK_BASE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_WEBHOOK_BASE.into());

        let train_confirmation = match lookup("FACEWATCH_TRAIN_CONFIRM_SECS") {
            None => DEFAULT_CONFIRMATION_DELAY,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    var: "FACEWATCH_TRAIN_CONFIRM_SECS",
                    value: raw,
                    expected: "a whole number of seconds",
                })?,
        };

        Ok(Self {
            webhook_base,
            train_confirmation,
        })
    }
}
