//! [`RemoteHash`]: a mapping-like handle over one remote hash key.
//!
//! The handle holds no field data. Every operation translates to a single
//! hash primitive against the store, executed through one internal borrowing
//! point that either locks the handle's own connection (direct strategy) or
//! checks one out of a pool for the duration of the call (pooled strategy).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use hashproxy_core::{Connect, ConnectOptions, HashCommands, ScanPage, StoreResult};
use parking_lot::Mutex;

use crate::config::{AdapterTarget, ConnectionConfig};
use crate::entries::HashEntries;
use crate::error::{HashError, Result};
use crate::fields::FieldValues;
use crate::pool::ConnectionPool;

/// Fields examined per scan step when iterating with [`RemoteHash::entries`].
pub const DEFAULT_SCAN_COUNT: usize = 10;

enum Strategy<P: ConnectionPool> {
    Direct(Mutex<P::Connection>),
    Pooled(Arc<P>),
}

impl<P: ConnectionPool> Strategy<P> {
    fn with_connection<R>(
        &self,
        f: impl FnOnce(&mut P::Connection) -> StoreResult<R>,
    ) -> StoreResult<R> {
        match self {
            Self::Direct(conn) => f(&mut *conn.lock()),
            Self::Pooled(pool) => pool.with_connection(f),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Direct(_) => "direct",
            Self::Pooled(_) => "pooled",
        }
    }
}

/// Handle bound to a single remote hash key.
///
/// Safe to share between threads: with the direct strategy calls are
/// serialized on the handle's connection, with the pooled strategy each call
/// uses its own checked-out connection.
pub struct RemoteHash<P: ConnectionPool> {
    name: String,
    strategy: Strategy<P>,
}

impl<P: ConnectionPool> RemoteHash<P> {
    /// Build a handle for the hash `name`.
    ///
    /// Options and URLs open a new connection immediately. An adapter is
    /// consumed here: a wrapped pool gives the pooled strategy, a wrapped
    /// connection the direct one.
    ///
    /// # Errors
    ///
    /// - [`HashError::InvalidName`] if `name` is empty or blank.
    /// - [`HashError::InvalidConfig`] if the options or URL are malformed,
    ///   or the adapter wraps nothing.
    /// - [`HashError::Remote`] if opening the direct connection fails.
    pub fn new(name: impl Into<String>, config: ConnectionConfig<P>) -> Result<Self>
    where
        P::Connection: Connect,
    {
        let name = validate_name(name.into())?;
        let strategy = match config {
            ConnectionConfig::Connection(conn) => Strategy::Direct(Mutex::new(conn)),
            ConnectionConfig::Options(options) => Strategy::Direct(Mutex::new(open(&options)?)),
            ConnectionConfig::Url(url) => {
                let options = ConnectOptions::from_url(&url)
                    .map_err(|reason| HashError::InvalidConfig { reason })?;
                Strategy::Direct(Mutex::new(open(&options)?))
            }
            ConnectionConfig::Pool(pool) => Strategy::Pooled(pool),
            ConnectionConfig::Adapter(adapter) => match adapter.into_target() {
                Some(AdapterTarget::Pool(pool)) => Strategy::Pooled(pool),
                Some(AdapterTarget::Connection(conn)) => Strategy::Direct(Mutex::new(conn)),
                None => {
                    return Err(HashError::InvalidConfig {
                        reason: "store adapter wraps neither a pool nor a connection".to_string(),
                    })
                }
            },
        };
        Ok(Self::build(name, strategy))
    }

    /// Build a handle that uses `conn` for every operation.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidName`] if `name` is empty or blank.
    pub fn direct(name: impl Into<String>, conn: P::Connection) -> Result<Self> {
        let name = validate_name(name.into())?;
        Ok(Self::build(name, Strategy::Direct(Mutex::new(conn))))
    }

    /// Build a handle that checks a connection out of `pool` per operation.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidName`] if `name` is empty or blank.
    pub fn pooled(name: impl Into<String>, pool: Arc<P>) -> Result<Self> {
        let name = validate_name(name.into())?;
        Ok(Self::build(name, Strategy::Pooled(pool)))
    }

    fn build(name: String, strategy: Strategy<P>) -> Self {
        tracing::debug!(hash = %name, strategy = strategy.kind(), "remote hash handle created");
        Self { name, strategy }
    }

    /// The remote key this handle addresses.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` if operations check connections out of a pool.
    #[must_use]
    pub fn is_pooled(&self) -> bool {
        matches!(self.strategy, Strategy::Pooled(_))
    }

    fn with_connection<R>(
        &self,
        command: &'static str,
        f: impl FnOnce(&mut P::Connection, &str) -> StoreResult<R>,
    ) -> Result<R> {
        tracing::trace!(hash = %self.name, command, "hash command");
        Ok(self.strategy.with_connection(|conn| f(conn, &self.name))?)
    }

    /// Fetch the values of `fields`, in request order.
    ///
    /// Missing fields map to `None`. An empty request returns an empty
    /// result without contacting the store.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the store rejects the command.
    pub fn get<I, K>(&self, fields: I) -> Result<FieldValues>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let fields: Vec<String> = fields.into_iter().map(|f| f.as_ref().to_string()).collect();
        let values = match fields.as_slice() {
            [] => return Ok(FieldValues::default()),
            [field] => vec![self.with_connection("HGET", |conn, key| conn.hget(key, field))?],
            _ => {
                let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
                self.with_connection("HMGET", |conn, key| conn.hmget(key, &refs))?
            }
        };
        Ok(FieldValues::from_lookup(fields, values))
    }

    /// Store every `(field, value)` pair as one unit. Values are stored in
    /// their string form.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the store rejects the command.
    pub fn set<I, K, V>(&self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(field, value)| (field.as_ref().to_string(), value.to_string()))
            .collect();
        match pairs.as_slice() {
            [] => {}
            [(field, value)] => {
                self.with_connection("HSET", |conn, key| conn.hset(key, field, value))?;
            }
            _ => {
                let refs: Vec<(&str, &str)> = pairs
                    .iter()
                    .map(|(field, value)| (field.as_str(), value.as_str()))
                    .collect();
                self.with_connection("HSET", |conn, key| conn.hset_multiple(key, &refs))?;
            }
        }
        Ok(())
    }

    /// Set `field` only if it does not exist. Returns `true` if it was set.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the store rejects the command.
    pub fn set_if_does_not_exist(&self, field: impl AsRef<str>, value: impl ToString) -> Result<bool> {
        let value = value.to_string();
        self.with_connection("HSETNX", |conn, key| conn.hsetnx(key, field.as_ref(), &value))
    }

    /// Add `amount` to the integer stored at `field` (missing counts as 0)
    /// and return the new value.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the current value is not an integer
    /// or the result overflows.
    pub fn increment_integer_key(&self, field: impl AsRef<str>, amount: i64) -> Result<i64> {
        self.with_connection("HINCRBY", |conn, key| conn.hincrby(key, field.as_ref(), amount))
    }

    /// Add `amount` to the number stored at `field` (missing counts as 0)
    /// and return the store's string form of the new value.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the current value is not numeric or
    /// the result is not finite.
    pub fn increment_float_key(&self, field: impl AsRef<str>, amount: f64) -> Result<String> {
        self.with_connection("HINCRBYFLOAT", |conn, key| {
            conn.hincrbyfloat(key, field.as_ref(), amount)
        })
    }

    /// [`increment_integer_key`](Self::increment_integer_key) by 1.
    ///
    /// # Errors
    ///
    /// As for `increment_integer_key`.
    pub fn increment(&self, field: impl AsRef<str>) -> Result<i64> {
        self.increment_integer_key(field, 1)
    }

    /// [`increment_float_key`](Self::increment_float_key) by 1.
    ///
    /// # Errors
    ///
    /// As for `increment_float_key`.
    pub fn increment_float(&self, field: impl AsRef<str>) -> Result<String> {
        self.increment_float_key(field, 1.0)
    }

    /// Delete `fields`, returning how many existed. An empty request returns
    /// 0 without contacting the store.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the store rejects the command.
    pub fn remove<I, K>(&self, fields: I) -> Result<u64>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let fields: Vec<String> = fields.into_iter().map(|f| f.as_ref().to_string()).collect();
        if fields.is_empty() {
            return Ok(0);
        }
        let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        self.with_connection("HDEL", |conn, key| conn.hdel(key, &refs))
    }

    /// Every field and value.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the store rejects the command.
    pub fn all(&self) -> Result<HashMap<String, String>> {
        let pairs = self.with_connection("HGETALL", |conn, key| conn.hgetall(key))?;
        Ok(pairs.into_iter().collect())
    }

    /// All field names.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the store rejects the command.
    pub fn keys(&self) -> Result<Vec<String>> {
        self.with_connection("HKEYS", |conn, key| conn.hkeys(key))
    }

    /// All values.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the store rejects the command.
    pub fn values(&self) -> Result<Vec<String>> {
        self.with_connection("HVALS", |conn, key| conn.hvals(key))
    }

    /// Whether `field` exists.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the store rejects the command.
    pub fn contains_key(&self, field: impl AsRef<str>) -> Result<bool> {
        self.with_connection("HEXISTS", |conn, key| conn.hexists(key, field.as_ref()))
    }

    /// Number of fields.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the store rejects the command.
    pub fn size(&self) -> Result<u64> {
        self.with_connection("HLEN", |conn, key| conn.hlen(key))
    }

    /// Alias of [`size`](Self::size).
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the store rejects the command.
    pub fn count(&self) -> Result<u64> {
        self.size()
    }

    /// `true` if the hash has no fields (or does not exist).
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the store rejects the command.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.size()? == 0)
    }

    /// One step of a cursor-based scan. Start with cursor 0; iteration is
    /// complete when the returned cursor is 0. `amount` is a hint for how
    /// much work the store does per step (at least 1), and `pattern` a glob
    /// filter on field names.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the store rejects the command or the
    /// pattern.
    pub fn scan(&self, cursor: u64, amount: usize, pattern: &str) -> Result<ScanPage> {
        let count = amount.max(1);
        self.with_connection("HSCAN", |conn, key| conn.hscan(key, cursor, count, pattern))
    }

    /// Lazily iterate all entries, fetching `slice_size` fields per scan
    /// step. Entries added or removed during iteration may or may not be
    /// seen.
    #[must_use]
    pub fn enumerator(&self, slice_size: usize) -> HashEntries<'_, P> {
        HashEntries::new(self, slice_size)
    }

    /// [`enumerator`](Self::enumerator) with [`DEFAULT_SCAN_COUNT`].
    #[must_use]
    pub fn entries(&self) -> HashEntries<'_, P> {
        self.enumerator(DEFAULT_SCAN_COUNT)
    }

    /// Delete the whole hash. Always returns an empty map.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the store rejects the command.
    pub fn clear(&self) -> Result<HashMap<String, String>> {
        self.with_connection("DEL", |conn, key| conn.del(key))?;
        Ok(HashMap::new())
    }

    /// Alias of [`clear`](Self::clear).
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the store rejects the command.
    pub fn flush(&self) -> Result<HashMap<String, String>> {
        self.clear()
    }

    /// Expire the whole hash after `seconds`. Returns `true` if the timeout
    /// was set, `false` if the hash does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Remote`] if the store rejects the command.
    pub fn expire(&self, seconds: u64) -> Result<bool> {
        self.with_connection("EXPIRE", |conn, key| conn.expire(key, seconds))
    }
}

impl<P: ConnectionPool> fmt::Debug for RemoteHash<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteHash")
            .field("name", &self.name)
            .field("strategy", &self.strategy.kind())
            .finish()
    }
}

fn validate_name(name: String) -> Result<String> {
    if name.trim().is_empty() {
        return Err(HashError::InvalidName { name });
    }
    Ok(name)
}

fn open<C: Connect>(options: &ConnectOptions) -> Result<C> {
    options
        .validate()
        .map_err(|reason| HashError::InvalidConfig { reason })?;
    Ok(C::connect(options)?)
}
