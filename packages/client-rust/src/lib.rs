//! `hashproxy`: a mapping-like handle over a single remote hash key.
//!
//! A [`RemoteHash`] forwards every operation to the store as one hash
//! primitive, using either its own connection or a [`ConnectionPool`].
//!
//! ```
//! use hashproxy::{MemoryHash, MemoryStore};
//!
//! let hash = MemoryHash::direct("cool", MemoryStore::new().connect())?;
//! hash.set([("x", 1), ("y", 2)])?;
//! assert_eq!(hash.get(["x"])?.get("x"), Some("1"));
//! # Ok::<(), hashproxy::HashError>(())
//! ```

pub mod config;
pub mod entries;
pub mod error;
pub mod fields;
pub mod hash;
pub mod pool;

pub use config::{AdapterTarget, ConnectionConfig, StoreAdapter};
pub use entries::HashEntries;
pub use error::{HashError, Result};
pub use fields::FieldValues;
pub use hash::{RemoteHash, DEFAULT_SCAN_COUNT};
pub use pool::{ConnectionPool, Pool, PoolConfig, PoolState, PooledConnection};

pub use hashproxy_core::{
    Connect, ConnectOptions, HashCommands, MemoryConnection, MemoryStore, ScanPage, StoreError,
    MATCH_ALL, SCAN_START,
};

/// Handle over the in-memory store, direct or pooled.
pub type MemoryHash = RemoteHash<Pool<MemoryConnection>>;

/// Handle over a Redis server.
#[cfg(feature = "redis")]
pub type RedisHash = RemoteHash<Pool<hashproxy_core::RedisConnection>>;
