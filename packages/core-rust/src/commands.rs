//! Remote hash primitives and cursor-based scan types.
//!
//! Defines [`HashCommands`], the full set of per-key hash operations a
//! backing store must provide, and [`Connect`], the factory used to open a
//! connection from [`ConnectOptions`]. Each method maps to exactly one store
//! command and is atomic as executed by the store.

use crate::error::StoreResult;
use crate::options::ConnectOptions;

/// Cursor value that both starts and ends a scan.
pub const SCAN_START: u64 = 0;

/// One step of a cursor-based hash scan.
///
/// A cursor of [`SCAN_START`] means iteration has completed. A page may hold
/// fewer entries than requested (even none) while more remain, so callers
/// must only rely on the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// Cursor to pass to the next call.
    pub cursor: u64,
    /// Field/value pairs returned by this step.
    pub entries: Vec<(String, String)>,
}

impl ScanPage {
    /// Returns `true` if this was the final page of the scan.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.cursor == SCAN_START
    }
}

/// Hash-per-key primitives issued against a single live connection.
///
/// Takes `&mut self` throughout: one connection carries one request at a
/// time. Implementations: [`MemoryConnection`](crate::memory::MemoryConnection),
/// `redis::Connection` (feature `redis`).
pub trait HashCommands {
    /// `HGET key field`.
    fn hget(&mut self, key: &str, field: &str) -> StoreResult<Option<String>>;

    /// `HMGET key field...`. Values come back in the order of `fields`.
    fn hmget(&mut self, key: &str, fields: &[&str]) -> StoreResult<Vec<Option<String>>>;

    /// `HSET key field value`. Returns `true` if the field was created.
    fn hset(&mut self, key: &str, field: &str, value: &str) -> StoreResult<bool>;

    /// `HSET key field value [field value ...]`, applied as one unit.
    /// Returns the number of fields created.
    fn hset_multiple(&mut self, key: &str, pairs: &[(&str, &str)]) -> StoreResult<u64>;

    /// `HSETNX key field value`. Returns `true` if the field was set.
    fn hsetnx(&mut self, key: &str, field: &str, value: &str) -> StoreResult<bool>;

    /// `HINCRBY key field amount`. Returns the new value.
    fn hincrby(&mut self, key: &str, field: &str, amount: i64) -> StoreResult<i64>;

    /// `HINCRBYFLOAT key field amount`. Returns the store's string form of
    /// the new value.
    fn hincrbyfloat(&mut self, key: &str, field: &str, amount: f64) -> StoreResult<String>;

    /// `HDEL key field...`. Returns the number of fields removed.
    fn hdel(&mut self, key: &str, fields: &[&str]) -> StoreResult<u64>;

    /// `HGETALL key`.
    fn hgetall(&mut self, key: &str) -> StoreResult<Vec<(String, String)>>;

    /// `HKEYS key`.
    fn hkeys(&mut self, key: &str) -> StoreResult<Vec<String>>;

    /// `HVALS key`.
    fn hvals(&mut self, key: &str) -> StoreResult<Vec<String>>;

    /// `HEXISTS key field`.
    fn hexists(&mut self, key: &str, field: &str) -> StoreResult<bool>;

    /// `HLEN key`.
    fn hlen(&mut self, key: &str) -> StoreResult<u64>;

    /// `HSCAN key cursor MATCH pattern COUNT count`.
    fn hscan(
        &mut self,
        key: &str,
        cursor: u64,
        count: usize,
        pattern: &str,
    ) -> StoreResult<ScanPage>;

    /// `DEL key`. Returns `true` if the key existed.
    fn del(&mut self, key: &str) -> StoreResult<bool>;

    /// `EXPIRE key seconds`. Returns `true` if a timeout was set.
    fn expire(&mut self, key: &str, seconds: u64) -> StoreResult<bool>;

    /// Whether the connection can still carry requests. Pools discard
    /// connections that report `false` instead of returning them.
    fn is_open(&self) -> bool {
        true
    }
}

/// Opens a new connection from a configuration record.
pub trait Connect: HashCommands + Sized {
    /// Open a connection described by `options`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`](crate::StoreError::Connection) or a
    /// backend error if the store cannot be reached.
    fn connect(options: &ConnectOptions) -> StoreResult<Self>;
}
