//! Errors raised by a [`RemoteHash`](crate::RemoteHash) handle.

use hashproxy_core::StoreError;

/// Result alias for handle operations.
pub type Result<T> = std::result::Result<T, HashError>;

/// Errors surfaced by the handle.
///
/// Construction problems have their own variants; everything the remote
/// store reports while executing an operation is passed through unchanged
/// as [`HashError::Remote`].
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// The hash name was missing or blank.
    #[error("invalid hash name {name:?}: a hash name must be a non-empty string")]
    InvalidName { name: String },

    /// The connection configuration could not be resolved to a strategy.
    #[error("invalid connection configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Error returned by the remote store.
    #[error(transparent)]
    Remote(#[from] StoreError),
}

impl HashError {
    /// The underlying store error, if this is a pass-through error.
    #[must_use]
    pub fn as_remote(&self) -> Option<&StoreError> {
        match self {
            Self::Remote(err) => Some(err),
            _ => None,
        }
    }
}
