//! [`HashCommands`] over a blocking `redis::Connection`.
//!
//! Every primitive is a single `redis::cmd` round trip. Replies are decoded
//! with the crate's `FromRedisValue` conversions and errors pass through as
//! [`StoreError::Backend`] without translation.

use redis::ConnectionLike;

/// Blocking Redis connection.
pub use redis::Connection as RedisConnection;

use crate::commands::{Connect, HashCommands, ScanPage};
use crate::error::{StoreError, StoreResult};
use crate::options::ConnectOptions;

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        Self::Backend(Box::new(err))
    }
}

impl Connect for redis::Connection {
    fn connect(options: &ConnectOptions) -> StoreResult<Self> {
        options.validate().map_err(StoreError::Connection)?;
        let client = redis::Client::open(options.url())?;
        let connection = client.get_connection_with_timeout(options.connect_timeout)?;
        tracing::debug!(address = %options.address(), "redis connection opened");
        Ok(connection)
    }
}

impl HashCommands for redis::Connection {
    fn hget(&mut self, key: &str, field: &str) -> StoreResult<Option<String>> {
        Ok(redis::cmd("HGET").arg(key).arg(field).query(self)?)
    }

    fn hmget(&mut self, key: &str, fields: &[&str]) -> StoreResult<Vec<Option<String>>> {
        Ok(redis::cmd("HMGET").arg(key).arg(fields).query(self)?)
    }

    fn hset(&mut self, key: &str, field: &str, value: &str) -> StoreResult<bool> {
        let created: u64 = redis::cmd("HSET").arg(key).arg(field).arg(value).query(self)?;
        Ok(created > 0)
    }

    fn hset_multiple(&mut self, key: &str, pairs: &[(&str, &str)]) -> StoreResult<u64> {
        let mut cmd = redis::cmd("HSET");
        cmd.arg(key);
        for (field, value) in pairs {
            cmd.arg(*field).arg(*value);
        }
        Ok(cmd.query(self)?)
    }

    fn hsetnx(&mut self, key: &str, field: &str, value: &str) -> StoreResult<bool> {
        Ok(redis::cmd("HSETNX").arg(key).arg(field).arg(value).query(self)?)
    }

    fn hincrby(&mut self, key: &str, field: &str, amount: i64) -> StoreResult<i64> {
        Ok(redis::cmd("HINCRBY").arg(key).arg(field).arg(amount).query(self)?)
    }

    fn hincrbyfloat(&mut self, key: &str, field: &str, amount: f64) -> StoreResult<String> {
        Ok(redis::cmd("HINCRBYFLOAT").arg(key).arg(field).arg(amount).query(self)?)
    }

    fn hdel(&mut self, key: &str, fields: &[&str]) -> StoreResult<u64> {
        Ok(redis::cmd("HDEL").arg(key).arg(fields).query(self)?)
    }

    fn hgetall(&mut self, key: &str) -> StoreResult<Vec<(String, String)>> {
        Ok(redis::cmd("HGETALL").arg(key).query(self)?)
    }

    fn hkeys(&mut self, key: &str) -> StoreResult<Vec<String>> {
        Ok(redis::cmd("HKEYS").arg(key).query(self)?)
    }

    fn hvals(&mut self, key: &str) -> StoreResult<Vec<String>> {
        Ok(redis::cmd("HVALS").arg(key).query(self)?)
    }

    fn hexists(&mut self, key: &str, field: &str) -> StoreResult<bool> {
        Ok(redis::cmd("HEXISTS").arg(key).arg(field).query(self)?)
    }

    fn hlen(&mut self, key: &str) -> StoreResult<u64> {
        Ok(redis::cmd("HLEN").arg(key).query(self)?)
    }

    fn hscan(
        &mut self,
        key: &str,
        cursor: u64,
        count: usize,
        pattern: &str,
    ) -> StoreResult<ScanPage> {
        let (cursor, entries): (u64, Vec<(String, String)>) = redis::cmd("HSCAN")
            .arg(key)
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(count.max(1))
            .query(self)?;
        Ok(ScanPage { cursor, entries })
    }

    fn del(&mut self, key: &str) -> StoreResult<bool> {
        let removed: u64 = redis::cmd("DEL").arg(key).query(self)?;
        Ok(removed > 0)
    }

    fn expire(&mut self, key: &str, seconds: u64) -> StoreResult<bool> {
        Ok(redis::cmd("EXPIRE").arg(key).arg(seconds).query(self)?)
    }

    fn is_open(&self) -> bool {
        ConnectionLike::is_open(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulk(text: &str) -> redis::Value {
        redis::Value::BulkString(text.as_bytes().to_vec())
    }

    #[test]
    fn flat_hgetall_reply_decodes_into_pairs() {
        let reply = redis::Value::Array(vec![bulk("a"), bulk("1"), bulk("b"), bulk("2")]);
        let pairs: Vec<(String, String)> = redis::from_redis_value(&reply).unwrap();
        assert_eq!(
            pairs,
            vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn hscan_reply_decodes_cursor_and_pairs() {
        let reply = redis::Value::Array(vec![
            bulk("17"),
            redis::Value::Array(vec![bulk("f"), bulk("v")]),
        ]);
        let (cursor, entries): (u64, Vec<(String, String)>) =
            redis::from_redis_value(&reply).unwrap();
        assert_eq!(cursor, 17);
        assert_eq!(entries, vec![("f".to_string(), "v".to_string())]);
    }

    #[test]
    fn redis_errors_pass_through() {
        let err: StoreError =
            redis::RedisError::from((redis::ErrorKind::TypeError, "bad reply")).into();
        assert!(matches!(err, StoreError::Backend(_)));
        assert!(err.to_string().contains("bad reply"));
    }
}
