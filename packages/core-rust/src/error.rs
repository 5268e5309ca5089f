//! Error types surfaced by remote hash primitives.

/// Result alias for primitive calls.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failure of a single remote primitive or of acquiring a connection for it.
///
/// Messages for the store-side variants mirror the replies a Redis server
/// sends, so callers see the same text regardless of backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key holds a value that is not a hash.
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,
    /// `HINCRBY` against a field whose value is not an integer.
    #[error("ERR hash value is not an integer")]
    NotAnInteger,
    /// `HINCRBYFLOAT` against a field whose value is not a float, or with a
    /// non-finite increment.
    #[error("ERR hash value is not a float")]
    NotAFloat,
    /// The increment would overflow or produce NaN/infinity.
    #[error("ERR increment or decrement would overflow")]
    Overflow,
    /// `EXPIRE` with a timeout the store cannot represent.
    #[error("ERR invalid expire time in 'expire' command")]
    InvalidExpireTime,
    /// A `MATCH` pattern could not be compiled.
    #[error("ERR invalid pattern: {0}")]
    InvalidPattern(String),
    /// A connection could not be opened.
    #[error("connection failed: {0}")]
    Connection(String),
    /// No pooled connection became available in time.
    #[error("timed out after {waited_ms}ms waiting for a pooled connection")]
    PoolTimeout { waited_ms: u64 },
    /// Error raised by a backend client library, passed through unchanged.
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}
