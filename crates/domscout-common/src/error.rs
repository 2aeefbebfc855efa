use crate::protocol::LocatorKind;

#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("Navigation failed: {0}")]
    Navigation(String),
    #[error("Timed out after {0} s")]
    Timeout(u64),
    #[error("Not ready")]
    NotReady,
    #[error("Not supported: {0}")]
    NotSupported(String),
    #[error("Stale element reference: {0}")]
    StaleElement(String),
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Other: {0}")]
    Other(String),
}

/// Outcome of a lookup that did not produce an element.
///
/// A zero-match lookup and a driver fault are kept apart here so the
/// message can say which one happened, but callers that only care about
/// "was anything found" treat both the same way.
#[derive(thiserror::Error, Debug)]
pub enum LocateError {
    #[error("No element matches {kind} '{selector}'")]
    NoMatch {
        kind: LocatorKind,
        selector: String,
    },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl LocateError {
    pub fn no_match(kind: LocatorKind, selector: impl Into<String>) -> Self {
        Self::NoMatch {
            kind,
            selector: selector.into(),
        }
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch { .. })
    }
}
