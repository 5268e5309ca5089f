//! In-process [`HashCommands`] implementation backed by [`DashMap`].
//!
//! [`MemoryStore`] follows Redis semantics for every hash primitive: fields
//! are plain strings, deleting the last field deletes the key, keys carry an
//! optional TTL that is enforced lazily on access, and type errors use the
//! same replies. Useful for tests and for embedding without a server.

use std::collections::BTreeMap;
use std::num::FpCategory;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::commands::{Connect, HashCommands, ScanPage, SCAN_START};
use crate::error::{StoreError, StoreResult};
use crate::options::ConnectOptions;
use crate::pattern::Pattern;

/// Significant digits kept when formatting `HINCRBYFLOAT` results.
const FLOAT_SIGNIFICANT_DIGITS: f64 = 15.0;

/// Largest `EXPIRE` timeout whose millisecond form fits in an `i64`.
const MAX_EXPIRE_SECONDS: u64 = i64::MAX.unsigned_abs() / 1000;

#[derive(Debug, Clone)]
enum SlotValue {
    Hash(BTreeMap<String, String>),
    String(String),
}

#[derive(Debug, Clone)]
struct Slot {
    value: SlotValue,
    expires_at: Option<Instant>,
}

impl Slot {
    fn empty_hash() -> Self {
        Self {
            value: SlotValue::Hash(BTreeMap::new()),
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    fn is_empty_hash(&self) -> bool {
        matches!(&self.value, SlotValue::Hash(fields) if fields.is_empty())
    }
}

/// Shared in-memory keyspace.
///
/// Cloning is cheap and yields a handle to the same keyspace, so every
/// [`MemoryConnection`] opened from clones observes the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    keyspace: Arc<DashMap<String, Slot>>,
}

fn registry() -> &'static DashMap<String, MemoryStore> {
    static STORES: OnceLock<DashMap<String, MemoryStore>> = OnceLock::new();
    STORES.get_or_init(DashMap::new)
}

impl MemoryStore {
    /// Creates a new, empty keyspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide store registered under `address`, creating
    /// it on first use.
    #[must_use]
    pub fn named(address: &str) -> Self {
        registry()
            .entry(address.to_string())
            .or_default()
            .value()
            .clone()
    }

    /// Opens a new connection to this keyspace.
    #[must_use]
    pub fn connect(&self) -> MemoryConnection {
        MemoryConnection {
            store: self.clone(),
            open: true,
        }
    }

    /// Number of live keys.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.keyspace
            .iter()
            .filter(|slot| !slot.value().is_expired(now))
            .count()
    }

    /// Returns `true` if no live key exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every key (`FLUSHALL`).
    pub fn flush_all(&self) {
        self.keyspace.clear();
    }

    /// Stores a plain string under `key` (`SET`), replacing any hash.
    pub fn set_string(&self, key: &str, value: &str) {
        self.keyspace.insert(
            key.to_string(),
            Slot {
                value: SlotValue::String(value.to_string()),
                expires_at: None,
            },
        );
    }

    /// Reads a plain string stored under `key` (`GET`).
    #[must_use]
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.purge_if_expired(key);
        match &self.keyspace.get(key)?.value {
            SlotValue::String(value) => Some(value.clone()),
            SlotValue::Hash(_) => None,
        }
    }

    /// Remaining time to live of `key`, or `None` if the key is missing or
    /// has no expiry.
    #[must_use]
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.purge_if_expired(key);
        let slot = self.keyspace.get(key)?;
        slot.expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    fn purge_if_expired(&self, key: &str) {
        let now = Instant::now();
        if self
            .keyspace
            .remove_if(key, |_, slot| slot.is_expired(now))
            .is_some()
        {
            tracing::trace!(key, "expired key purged");
        }
    }

    fn read<R>(
        &self,
        key: &str,
        f: impl FnOnce(Option<&BTreeMap<String, String>>) -> R,
    ) -> StoreResult<R> {
        self.purge_if_expired(key);
        match self.keyspace.get(key) {
            None => Ok(f(None)),
            Some(slot) => match &slot.value {
                SlotValue::Hash(fields) => Ok(f(Some(fields))),
                SlotValue::String(_) => Err(StoreError::WrongType),
            },
        }
    }

    fn write<R>(
        &self,
        key: &str,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> StoreResult<R>,
    ) -> StoreResult<R> {
        self.purge_if_expired(key);
        let (result, now_empty) = {
            let mut slot = self
                .keyspace
                .entry(key.to_string())
                .or_insert_with(Slot::empty_hash);
            let result = match &mut slot.value {
                SlotValue::Hash(fields) => f(fields),
                SlotValue::String(_) => Err(StoreError::WrongType),
            };
            (result, slot.is_empty_hash())
        };
        if now_empty {
            self.keyspace.remove_if(key, |_, slot| slot.is_empty_hash());
        }
        result
    }
}

/// A connection to a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryConnection {
    store: MemoryStore,
    open: bool,
}

impl MemoryConnection {
    /// The keyspace this connection talks to.
    #[must_use]
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Marks the connection closed. Subsequent commands fail with
    /// [`StoreError::Connection`].
    pub fn close(&mut self) {
        self.open = false;
    }

    fn ensure_open(&self) -> StoreResult<&MemoryStore> {
        if self.open {
            Ok(&self.store)
        } else {
            Err(StoreError::Connection("connection is closed".to_string()))
        }
    }
}

impl Connect for MemoryConnection {
    fn connect(options: &ConnectOptions) -> StoreResult<Self> {
        options.validate().map_err(StoreError::Connection)?;
        Ok(MemoryStore::named(&options.address()).connect())
    }
}

impl HashCommands for MemoryConnection {
    fn hget(&mut self, key: &str, field: &str) -> StoreResult<Option<String>> {
        self.ensure_open()?
            .read(key, |fields| fields.and_then(|f| f.get(field).cloned()))
    }

    fn hmget(&mut self, key: &str, fields: &[&str]) -> StoreResult<Vec<Option<String>>> {
        self.ensure_open()?.read(key, |hash| {
            fields
                .iter()
                .map(|field| hash.and_then(|h| h.get(*field).cloned()))
                .collect()
        })
    }

    fn hset(&mut self, key: &str, field: &str, value: &str) -> StoreResult<bool> {
        self.ensure_open()?.write(key, |fields| {
            Ok(fields
                .insert(field.to_string(), value.to_string())
                .is_none())
        })
    }

    fn hset_multiple(&mut self, key: &str, pairs: &[(&str, &str)]) -> StoreResult<u64> {
        self.ensure_open()?.write(key, |fields| {
            let mut created = 0;
            for (field, value) in pairs {
                if fields
                    .insert((*field).to_string(), (*value).to_string())
                    .is_none()
                {
                    created += 1;
                }
            }
            Ok(created)
        })
    }

    fn hsetnx(&mut self, key: &str, field: &str, value: &str) -> StoreResult<bool> {
        self.ensure_open()?.write(key, |fields| {
            if fields.contains_key(field) {
                Ok(false)
            } else {
                fields.insert(field.to_string(), value.to_string());
                Ok(true)
            }
        })
    }

    fn hincrby(&mut self, key: &str, field: &str, amount: i64) -> StoreResult<i64> {
        self.ensure_open()?.write(key, |fields| {
            let current = match fields.get(field) {
                Some(raw) => parse_integer(raw).ok_or(StoreError::NotAnInteger)?,
                None => 0,
            };
            let next = current.checked_add(amount).ok_or(StoreError::Overflow)?;
            fields.insert(field.to_string(), next.to_string());
            Ok(next)
        })
    }

    fn hincrbyfloat(&mut self, key: &str, field: &str, amount: f64) -> StoreResult<String> {
        if !amount.is_finite() {
            return Err(StoreError::NotAFloat);
        }
        self.ensure_open()?.write(key, |fields| {
            let current = match fields.get(field) {
                Some(raw) => parse_float(raw).ok_or(StoreError::NotAFloat)?,
                None => 0.0,
            };
            let next = current + amount;
            if !next.is_finite() {
                return Err(StoreError::Overflow);
            }
            let formatted = format_float(next);
            fields.insert(field.to_string(), formatted.clone());
            Ok(formatted)
        })
    }

    fn hdel(&mut self, key: &str, fields: &[&str]) -> StoreResult<u64> {
        self.ensure_open()?.write(key, |hash| {
            Ok(fields
                .iter()
                .filter(|field| hash.remove(**field).is_some())
                .count() as u64)
        })
    }

    fn hgetall(&mut self, key: &str) -> StoreResult<Vec<(String, String)>> {
        self.ensure_open()?.read(key, |fields| {
            fields
                .map(|f| f.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default()
        })
    }

    fn hkeys(&mut self, key: &str) -> StoreResult<Vec<String>> {
        self.ensure_open()?.read(key, |fields| {
            fields
                .map(|f| f.keys().cloned().collect())
                .unwrap_or_default()
        })
    }

    fn hvals(&mut self, key: &str) -> StoreResult<Vec<String>> {
        self.ensure_open()?.read(key, |fields| {
            fields
                .map(|f| f.values().cloned().collect())
                .unwrap_or_default()
        })
    }

    fn hexists(&mut self, key: &str, field: &str) -> StoreResult<bool> {
        self.ensure_open()?
            .read(key, |fields| fields.is_some_and(|f| f.contains_key(field)))
    }

    fn hlen(&mut self, key: &str) -> StoreResult<u64> {
        self.ensure_open()?
            .read(key, |fields| fields.map_or(0, |f| f.len() as u64))
    }

    fn hscan(
        &mut self,
        key: &str,
        cursor: u64,
        count: usize,
        pattern: &str,
    ) -> StoreResult<ScanPage> {
        let pattern = Pattern::new(pattern)?;
        self.ensure_open()?.read(key, |fields| {
            let Some(fields) = fields else {
                return ScanPage::default();
            };
            // The cursor is the position of the next field in sort order;
            // `count` bounds how many fields one step examines.
            let start = usize::try_from(cursor).unwrap_or(usize::MAX);
            let step = count.max(1);
            let entries = fields
                .iter()
                .skip(start)
                .take(step)
                .filter(|(field, _)| pattern.matches(field))
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect();
            let next = start.saturating_add(step);
            ScanPage {
                cursor: if next >= fields.len() {
                    SCAN_START
                } else {
                    next as u64
                },
                entries,
            }
        })
    }

    fn del(&mut self, key: &str) -> StoreResult<bool> {
        let store = self.ensure_open()?;
        store.purge_if_expired(key);
        Ok(store.keyspace.remove(key).is_some())
    }

    fn expire(&mut self, key: &str, seconds: u64) -> StoreResult<bool> {
        let store = self.ensure_open()?;
        // Redis keeps deadlines as signed milliseconds.
        if seconds > MAX_EXPIRE_SECONDS {
            return Err(StoreError::InvalidExpireTime);
        }
        let deadline = Instant::now()
            .checked_add(Duration::from_secs(seconds))
            .ok_or(StoreError::InvalidExpireTime)?;
        store.purge_if_expired(key);
        if seconds == 0 {
            return Ok(store.keyspace.remove(key).is_some());
        }
        Ok(match store.keyspace.get_mut(key) {
            Some(mut slot) => {
                slot.expires_at = Some(deadline);
                true
            }
            None => false,
        })
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// Parses a stored value the way `HINCRBY` does: an optional minus sign and
/// digits, no leading zeros, no surrounding whitespace.
fn parse_integer(raw: &str) -> Option<i64> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    let malformed = digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
        || (digits.len() > 1 && digits.starts_with('0'))
        || raw == "-0";
    if malformed {
        return None;
    }
    raw.parse().ok()
}

fn parse_float(raw: &str) -> Option<f64> {
    if raw.is_empty() || raw.trim() != raw {
        return None;
    }
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Formats a float with 15 significant digits and no trailing zeros, so that
/// decimal inputs survive binary rounding (`2.2 + 1` is `"3.2"`).
fn format_float(value: f64) -> String {
    if value.classify() == FpCategory::Zero {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor();
    // Bounded by the clamp, so the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let decimals = (FLOAT_SIGNIFICANT_DIGITS - 1.0 - magnitude).clamp(0.0, 340.0) as usize;
    let formatted = format!("{value:.decimals$}");
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryConnection {
        let mut conn = MemoryStore::new().connect();
        conn.hset_multiple("h", &[("a", "1"), ("b", "2"), ("c", "3")])
            .unwrap();
        conn
    }

    #[test]
    fn hset_reports_creation() {
        let mut conn = MemoryStore::new().connect();
        assert!(conn.hset("h", "a", "1").unwrap());
        assert!(!conn.hset("h", "a", "2").unwrap());
        assert_eq!(conn.hget("h", "a").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn hmget_preserves_request_order_and_gaps() {
        let mut conn = seeded();
        let values = conn.hmget("h", &["c", "missing", "a"]).unwrap();
        assert_eq!(
            values,
            vec![Some("3".to_string()), None, Some("1".to_string())]
        );
        assert_eq!(conn.hmget("nope", &["a"]).unwrap(), vec![None]);
    }

    #[test]
    fn hset_multiple_counts_new_fields() {
        let mut conn = seeded();
        assert_eq!(conn.hset_multiple("h", &[("a", "9"), ("d", "4")]).unwrap(), 1);
        assert_eq!(conn.hlen("h").unwrap(), 4);
    }

    #[test]
    fn hsetnx_only_sets_absent_fields() {
        let mut conn = seeded();
        assert!(!conn.hsetnx("h", "b", "x").unwrap());
        assert_eq!(conn.hget("h", "b").unwrap().as_deref(), Some("2"));
        assert!(conn.hsetnx("h", "d", "x").unwrap());
        assert_eq!(conn.hget("h", "d").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn hincrby_treats_absent_as_zero() {
        let mut conn = MemoryStore::new().connect();
        assert_eq!(conn.hincrby("h", "n", 5).unwrap(), 5);
        assert_eq!(conn.hincrby("h", "n", -7).unwrap(), -2);
        assert_eq!(conn.hget("h", "n").unwrap().as_deref(), Some("-2"));
    }

    #[test]
    fn hincrby_rejects_non_integers_and_overflow() {
        let mut conn = MemoryStore::new().connect();
        conn.hset("h", "f", "1.5").unwrap();
        conn.hset("h", "z", "007").unwrap();
        conn.hset("h", "max", &i64::MAX.to_string()).unwrap();

        assert!(matches!(conn.hincrby("h", "f", 1), Err(StoreError::NotAnInteger)));
        assert!(matches!(conn.hincrby("h", "z", 1), Err(StoreError::NotAnInteger)));
        assert!(matches!(conn.hincrby("h", "max", 1), Err(StoreError::Overflow)));
        // failed increments leave the value untouched
        assert_eq!(conn.hget("h", "f").unwrap().as_deref(), Some("1.5"));
    }

    #[test]
    fn hincrbyfloat_formats_like_the_store() {
        let mut conn = MemoryStore::new().connect();
        conn.hset_multiple("h", &[("a", "1.1"), ("b", "2.2")]).unwrap();

        assert_eq!(conn.hincrbyfloat("h", "b", 1.0).unwrap(), "3.2");
        assert_eq!(conn.hincrbyfloat("h", "a", 5.0).unwrap(), "6.1");
        assert_eq!(conn.hincrbyfloat("h", "new", 0.1).unwrap(), "0.1");
        assert_eq!(conn.hincrbyfloat("h", "new", 0.2).unwrap(), "0.3");
        assert_eq!(conn.hincrbyfloat("h", "whole", 3.0).unwrap(), "3");
    }

    #[test]
    fn hincrbyfloat_rejects_bad_input() {
        let mut conn = MemoryStore::new().connect();
        conn.hset("h", "word", "abc").unwrap();
        conn.hset("h", "big", "1e308").unwrap();

        assert!(matches!(conn.hincrbyfloat("h", "word", 1.0), Err(StoreError::NotAFloat)));
        assert!(matches!(conn.hincrbyfloat("h", "x", f64::NAN), Err(StoreError::NotAFloat)));
        assert!(matches!(conn.hincrbyfloat("h", "big", 1e308), Err(StoreError::Overflow)));
    }

    #[test]
    fn hdel_ignores_missing_and_drops_empty_key() {
        let mut conn = seeded();
        assert_eq!(conn.hdel("h", &["a", "zzz"]).unwrap(), 1);
        assert_eq!(conn.hdel("h", &["b", "c"]).unwrap(), 2);
        assert_eq!(conn.hlen("h").unwrap(), 0);
        assert!(conn.store().is_empty());
    }

    #[test]
    fn listing_commands_on_missing_key_are_empty() {
        let mut conn = MemoryStore::new().connect();
        assert!(conn.hgetall("nope").unwrap().is_empty());
        assert!(conn.hkeys("nope").unwrap().is_empty());
        assert!(conn.hvals("nope").unwrap().is_empty());
        assert!(!conn.hexists("nope", "a").unwrap());
        assert_eq!(conn.hlen("nope").unwrap(), 0);
    }

    #[test]
    fn keys_and_values_line_up() {
        let mut conn = seeded();
        assert_eq!(conn.hkeys("h").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(conn.hvals("h").unwrap(), vec!["1", "2", "3"]);
    }

    #[test]
    fn hscan_pages_until_cursor_returns_to_start() {
        let mut conn = MemoryStore::new().connect();
        for i in 0..25 {
            conn.hset("h", &format!("f{i:02}"), &i.to_string()).unwrap();
        }

        let mut cursor = SCAN_START;
        let mut seen = Vec::new();
        let mut steps = 0;
        loop {
            let page = conn.hscan("h", cursor, 10, "*").unwrap();
            seen.extend(page.entries.into_iter().map(|(f, _)| f));
            cursor = page.cursor;
            steps += 1;
            if cursor == SCAN_START {
                break;
            }
        }

        assert_eq!(steps, 3);
        assert_eq!(seen.len(), 25);
        seen.dedup();
        assert_eq!(seen.len(), 25);
    }

    #[test]
    fn hscan_filters_without_shrinking_the_step() {
        let mut conn = MemoryStore::new().connect();
        for field in ["apple", "avocado", "banana", "blueberry", "cherry"] {
            conn.hset("h", field, "1").unwrap();
        }

        let page = conn.hscan("h", SCAN_START, 3, "b*").unwrap();
        assert_eq!(page.entries, vec![("banana".to_string(), "1".to_string())]);
        assert_eq!(page.cursor, 3);

        let page = conn.hscan("h", page.cursor, 3, "b*").unwrap();
        assert_eq!(page.entries, vec![("blueberry".to_string(), "1".to_string())]);
        assert!(page.is_last());
    }

    #[test]
    fn hscan_missing_key_and_bad_pattern() {
        let mut conn = MemoryStore::new().connect();
        assert_eq!(conn.hscan("nope", 0, 10, "*").unwrap(), ScanPage::default());
        assert!(matches!(
            conn.hscan("nope", 0, 10, "[z-a]"),
            Err(StoreError::InvalidPattern(_))
        ));
    }

    #[test]
    fn del_removes_whole_key() {
        let mut conn = seeded();
        assert!(conn.del("h").unwrap());
        assert!(!conn.del("h").unwrap());
        assert_eq!(conn.hlen("h").unwrap(), 0);
    }

    #[test]
    fn expire_sets_ttl_only_on_existing_keys() {
        let mut conn = seeded();
        assert!(!conn.expire("nope", 10).unwrap());
        assert!(conn.expire("h", 10).unwrap());

        let ttl = conn.store().ttl("h").unwrap();
        assert!(ttl <= Duration::from_secs(10));
        assert!(ttl > Duration::from_secs(8));
    }

    #[test]
    fn oversized_expire_is_rejected_and_keeps_existing_ttl() {
        let mut conn = seeded();
        assert!(conn.expire("h", 10).unwrap());

        assert!(matches!(
            conn.expire("h", u64::MAX),
            Err(StoreError::InvalidExpireTime)
        ));
        assert!(matches!(
            conn.expire("h", MAX_EXPIRE_SECONDS + 1),
            Err(StoreError::InvalidExpireTime)
        ));
        assert!(conn.store().ttl("h").unwrap() <= Duration::from_secs(10));
        assert!(matches!(
            conn.expire("missing", u64::MAX),
            Err(StoreError::InvalidExpireTime)
        ));
    }

    #[test]
    fn expire_zero_deletes_immediately() {
        let mut conn = seeded();
        assert!(conn.expire("h", 0).unwrap());
        assert_eq!(conn.hlen("h").unwrap(), 0);
    }

    #[test]
    fn expired_keys_disappear() {
        let mut conn = seeded();
        conn.expire("h", 1).unwrap();
        std::thread::sleep(Duration::from_millis(1100));
        assert_eq!(conn.hget("h", "a").unwrap(), None);
        assert!(conn.store().is_empty());
    }

    #[test]
    fn hash_commands_on_string_key_are_wrong_type() {
        let store = MemoryStore::new();
        store.set_string("s", "plain");
        let mut conn = store.connect();

        assert!(matches!(conn.hget("s", "a"), Err(StoreError::WrongType)));
        assert!(matches!(conn.hset("s", "a", "1"), Err(StoreError::WrongType)));
        // the string survives the failed write
        assert_eq!(store.get_string("s").as_deref(), Some("plain"));
        assert!(conn.del("s").unwrap());
    }

    #[test]
    fn closed_connection_refuses_commands() {
        let mut conn = MemoryStore::new().connect();
        assert!(conn.is_open());
        conn.close();
        assert!(!conn.is_open());
        assert!(matches!(conn.hlen("h"), Err(StoreError::Connection(_))));
    }

    #[test]
    fn named_stores_share_a_keyspace() {
        let options = ConnectOptions::default().host("memory-named-test");
        let mut first = MemoryConnection::connect(&options).unwrap();
        let mut second = MemoryConnection::connect(&options).unwrap();

        first.hset("shared", "a", "1").unwrap();
        assert_eq!(second.hget("shared", "a").unwrap().as_deref(), Some("1"));

        let other = ConnectOptions::default().host("memory-named-test").db(1);
        let mut third = MemoryConnection::connect(&other).unwrap();
        assert_eq!(third.hget("shared", "a").unwrap(), None);
    }

    #[test]
    fn connect_rejects_invalid_options() {
        let options = ConnectOptions::default().port(0);
        assert!(matches!(
            MemoryConnection::connect(&options),
            Err(StoreError::Connection(_))
        ));
    }

    #[test]
    fn integer_parsing_is_strict() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("-42"), Some(-42));
        assert_eq!(parse_integer("0"), Some(0));
        assert_eq!(parse_integer("+1"), None);
        assert_eq!(parse_integer(" 1"), None);
        assert_eq!(parse_integer("01"), None);
        assert_eq!(parse_integer("-0"), None);
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("99999999999999999999"), None);
    }

    #[test]
    fn float_formatting() {
        assert_eq!(format_float(0.0), "0");
        assert_eq!(format_float(-0.0), "0");
        assert_eq!(format_float(10.5), "10.5");
        assert_eq!(format_float(-2.25), "-2.25");
        assert_eq!(format_float(1e20), "100000000000000000000");
        assert_eq!(format_float(0.1 + 0.2), "0.3");
    }
}
