use facewatch_core::error::CoreError;
use facewatch_gateway::GatewayError;

/// Any failure a flow can surface next to its triggering control.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// Local validation or state error; no request was made.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl FlowError {
    /// Text to show inline, or `fallback` when the error has none.
    pub fn display_message(&self, fallback: &str) -> String {
        display_or(self, fallback)
    }

    /// The request was rejected before reaching the backend.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Core(CoreError::Validation(_)))
    }
}

pub(crate) fn display_or(error: &dyn std::fmt::Display, fallback: &str) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
