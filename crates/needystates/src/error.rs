//! Error types for the needystates crate

use thiserror::Error;

/// Errors that can occur while handling needs
#[derive(Error, Debug)]
pub enum Error {
    /// A handler's filters did not all match the need
    ///
    /// The processor treats this as "try the next handler" and never
    /// surfaces it.
    #[error("no handler filter matched")]
    NoMatch,

    /// A handler accepted a need but its action failed
    #[error("handler failed for need {need}: {source}")]
    HandlerFailed {
        need: String,
        #[source]
        source: anyhow::Error,
    },

    /// A need was marked satisfied without being pending
    #[error("need is not pending: {0}")]
    NotPending(String),
}

/// Result type for needystates operations
pub type Result<T> = std::result::Result<T, Error>;
