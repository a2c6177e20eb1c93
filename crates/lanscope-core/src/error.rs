use thiserror::Error;

/// Error type for store operations.
///
/// Every variant means the same thing to the store: the operation did not
/// complete and held state was left untouched. The distinction exists so
/// the view layer can word its diagnostic.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The backend request failed (transport, status, or body).
    #[error(transparent)]
    Api(#[from] lanscope_api::Error),

    /// Configuration was unusable (bad URL, bad timeout).
    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl CoreError {
    /// Returns `true` if re-triggering the operation might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api(e) => e.is_transient(),
            Self::Config(_) => false,
        }
    }
}
