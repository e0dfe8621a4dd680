//! Input validation shared by every form that talks to the backend.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

/// A string that is guaranteed to be non-empty after trimming.
///
/// The stored value is already trimmed. Gateway operations take this type
/// for every free-text argument, so an empty URL or name can never reach
/// the network layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NonBlank(String);

impl NonBlank {
    /// Trim `raw` and reject it when nothing is left.
    ///
    /// `message` becomes the [`CoreError::Validation`] text, so each form can
    /// surface its own wording.
    pub fn parse(raw: &str, message: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation(message.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for NonBlank {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonBlank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns `true` when `value` has at least one non-whitespace character.
pub fn is_filled(value: &str) -> bool {
    !value.trim().is_empty()
}
