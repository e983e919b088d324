/// Error types for the fetch pipeline and the browser bridge
use thiserror::Error;

/// Why a refresh cycle stopped before listing anything.
///
/// The display text is what the status line shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("No active tab detected.")]
    NoActiveTab,
    #[error("No config found for this URL. Check Settings.")]
    NoRuleMatch,
    #[error("Error: Could not access page content.")]
    AccessFailure(String),
}

/// A failed call across the wasm/JS boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BridgeError(pub String);

impl From<BridgeError> for FetchError {
    fn from(err: BridgeError) -> Self {
        FetchError::AccessFailure(err.0)
    }
}
