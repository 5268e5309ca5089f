//! Connection pooling with scoped checkout.
//!
//! [`ConnectionPool`] is the seam a [`RemoteHash`](crate::RemoteHash) uses for
//! its pooled strategy: a checkout yields a guard that hands the connection
//! back when dropped, so release happens on every exit path. [`Pool`] is the
//! bundled implementation: a bounded set of lazily opened connections with a
//! checkout timeout.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use hashproxy_core::{Connect, ConnectOptions, HashCommands, StoreError, StoreResult};
use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};

use crate::error::{HashError, Result};

/// A source of connections with scoped checkout/release.
pub trait ConnectionPool: Send + Sync {
    /// Connection type handed out by the pool.
    type Connection: HashCommands;

    /// Guard returning the connection to the pool when dropped.
    type Guard<'a>: DerefMut<Target = Self::Connection>
    where
        Self: 'a;

    /// Check a connection out of the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection can be obtained.
    fn checkout(&self) -> StoreResult<Self::Guard<'_>>;

    /// Run `f` with a checked-out connection, releasing it afterwards
    /// whether `f` succeeds or fails.
    ///
    /// # Errors
    ///
    /// Propagates checkout failures and whatever `f` returns.
    fn with_connection<R, F>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut Self::Connection) -> StoreResult<R>,
    {
        let mut conn = self.checkout()?;
        f(&mut *conn)
    }
}

/// Sizing and timeout settings for a [`Pool`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum number of open connections.
    pub max_size: usize,
    /// Connections opened eagerly when the pool is built.
    pub min_idle: usize,
    /// Maximum time a checkout waits for a connection to be released.
    #[serde(with = "duration_millis")]
    pub checkout_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: 10,
            min_idle: 0,
            checkout_timeout: Duration::from_secs(30),
        }
    }
}

impl PoolConfig {
    /// Set the maximum pool size.
    #[must_use]
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the number of eagerly opened connections.
    #[must_use]
    pub fn min_idle(mut self, min_idle: usize) -> Self {
        self.min_idle = min_idle;
        self
    }

    /// Set the checkout timeout.
    #[must_use]
    pub fn checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_size == 0 {
            return Err("max_size must be > 0".to_string());
        }
        if self.min_idle > self.max_size {
            return Err("min_idle cannot exceed max_size".to_string());
        }
        Ok(())
    }
}

/// Point-in-time pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    /// Open connections, checked out or idle.
    pub connections: usize,
    /// Connections waiting in the pool.
    pub idle: usize,
}

type Factory<C> = Box<dyn Fn() -> StoreResult<C> + Send + Sync>;

struct Slots<C> {
    idle: Vec<C>,
    total: usize,
}

/// Bounded pool of lazily opened connections.
pub struct Pool<C> {
    config: PoolConfig,
    factory: Factory<C>,
    slots: Mutex<Slots<C>>,
    released: Condvar,
}

impl<C: HashCommands + Send> Pool<C> {
    /// Builds a pool whose connections are opened with `C::connect(options)`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidConfig`] for invalid options or pool
    /// settings, and [`HashError::Remote`] if an eager connection fails.
    pub fn new(options: ConnectOptions, config: PoolConfig) -> Result<Self>
    where
        C: Connect,
    {
        options
            .validate()
            .map_err(|reason| HashError::InvalidConfig { reason })?;
        Self::with_factory(config, move || C::connect(&options))
    }

    /// Builds a pool whose connections are produced by `factory`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidConfig`] for invalid pool settings and
    /// [`HashError::Remote`] if an eager connection fails.
    pub fn with_factory<F>(config: PoolConfig, factory: F) -> Result<Self>
    where
        F: Fn() -> StoreResult<C> + Send + Sync + 'static,
    {
        config
            .validate()
            .map_err(|reason| HashError::InvalidConfig { reason })?;

        let pool = Self {
            slots: Mutex::new(Slots {
                idle: Vec::with_capacity(config.max_size),
                total: 0,
            }),
            config,
            factory: Box::new(factory),
            released: Condvar::new(),
        };
        pool.fill_min_idle()?;
        Ok(pool)
    }

    /// The pool's configuration.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Current occupancy.
    #[must_use]
    pub fn state(&self) -> PoolState {
        let slots = self.slots.lock();
        PoolState {
            connections: slots.total,
            idle: slots.idle.len(),
        }
    }

    /// Check a connection out, opening one if the pool is below its limit
    /// and waiting up to `checkout_timeout` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PoolTimeout`] if no connection is released in
    /// time, or the factory's error if opening a connection fails.
    pub fn get(&self) -> StoreResult<PooledConnection<'_, C>> {
        let started = Instant::now();
        let deadline = started.checked_add(self.config.checkout_timeout);
        let mut slots = self.slots.lock();

        loop {
            if let Some(conn) = slots.idle.pop() {
                return Ok(PooledConnection::new(self, conn));
            }

            if slots.total < self.config.max_size {
                slots.total += 1;
                drop(slots);
                return match (self.factory)() {
                    Ok(conn) => {
                        tracing::debug!(max_size = self.config.max_size, "pool connection opened");
                        Ok(PooledConnection::new(self, conn))
                    }
                    Err(err) => {
                        self.slots.lock().total -= 1;
                        self.released.notify_one();
                        Err(err)
                    }
                };
            }

            let timed_out = match deadline {
                Some(deadline) => self.released.wait_until(&mut slots, deadline).timed_out(),
                None => {
                    self.released.wait(&mut slots);
                    false
                }
            };
            if timed_out && slots.idle.is_empty() && slots.total >= self.config.max_size {
                let waited_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(
                    waited_ms,
                    max_size = self.config.max_size,
                    "timed out waiting for a pooled connection"
                );
                return Err(StoreError::PoolTimeout { waited_ms });
            }
        }
    }

    fn fill_min_idle(&self) -> Result<()> {
        for _ in 0..self.config.min_idle {
            let conn = (self.factory)()?;
            let mut slots = self.slots.lock();
            slots.total += 1;
            slots.idle.push(conn);
        }
        Ok(())
    }

    fn release(&self, conn: C) {
        let mut slots = self.slots.lock();
        if conn.is_open() {
            slots.idle.push(conn);
        } else {
            slots.total -= 1;
            tracing::debug!("discarded closed pool connection");
        }
        drop(slots);
        self.released.notify_one();
    }
}

impl<C: HashCommands + Send> ConnectionPool for Pool<C> {
    type Connection = C;
    type Guard<'a>
        = PooledConnection<'a, C>
    where
        Self: 'a;

    fn checkout(&self) -> StoreResult<Self::Guard<'_>> {
        self.get()
    }
}

impl<C> fmt::Debug for Pool<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.lock();
        f.debug_struct("Pool")
            .field("config", &self.config)
            .field("connections", &slots.total)
            .field("idle", &slots.idle.len())
            .finish_non_exhaustive()
    }
}

/// A connection checked out of a [`Pool`]; returned to it on drop.
pub struct PooledConnection<'a, C: HashCommands + Send> {
    pool: &'a Pool<C>,
    conn: Option<C>,
}

impl<'a, C: HashCommands + Send> PooledConnection<'a, C> {
    fn new(pool: &'a Pool<C>, conn: C) -> Self {
        Self {
            pool,
            conn: Some(conn),
        }
    }
}

impl<C: HashCommands + Send> Deref for PooledConnection<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.conn.as_ref().expect("connection is present until drop")
    }
}

impl<C: HashCommands + Send> DerefMut for PooledConnection<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.conn.as_mut().expect("connection is present until drop")
    }
}

impl<C: HashCommands + Send> Drop for PooledConnection<'_, C> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.release(conn);
        }
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
