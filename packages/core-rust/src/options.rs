//! Connection configuration for a remote hash store.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default port of a Redis-compatible store.
pub const DEFAULT_PORT: u16 = 6379;

const URL_SCHEME: &str = "redis://";

/// Everything needed to open a direct connection to the store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    /// Host name or IP address.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Logical database index.
    pub db: i64,
    /// Optional ACL user name.
    pub username: Option<String>,
    /// Optional password.
    pub password: Option<String>,
    /// Maximum time to wait while opening the connection.
    #[serde(with = "duration_millis")]
    pub connect_timeout: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            db: 0,
            username: None,
            password: None,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl ConnectOptions {
    /// Set the host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the logical database.
    #[must_use]
    pub fn db(mut self, db: i64) -> Self {
        self.db = db;
        self
    }

    /// Set the credentials.
    #[must_use]
    pub fn credentials(mut self, username: Option<String>, password: impl Into<String>) -> Self {
        self.username = username;
        self.password = Some(password.into());
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Parse `redis://[user[:password]@]host[:port][/db]`.
    ///
    /// # Errors
    ///
    /// Returns a description of the first malformed component.
    pub fn from_url(url: &str) -> Result<Self, String> {
        let rest = url
            .strip_prefix(URL_SCHEME)
            .ok_or_else(|| format!("URL must start with '{URL_SCHEME}'"))?;

        let mut options = Self::default();

        let (auth, location) = match rest.rsplit_once('@') {
            Some((auth, location)) => (Some(auth), location),
            None => (None, rest),
        };

        if let Some(auth) = auth {
            match auth.split_once(':') {
                Some((user, password)) => {
                    options.username = (!user.is_empty()).then(|| user.to_string());
                    options.password = Some(password.to_string());
                }
                None => options.username = (!auth.is_empty()).then(|| auth.to_string()),
            }
        }

        let (host_port, db) = match location.split_once('/') {
            Some((host_port, db)) => (host_port, Some(db)),
            None => (location, None),
        };

        if let Some(db) = db.filter(|db| !db.is_empty()) {
            options.db = db.parse().map_err(|_| format!("invalid database index '{db}'"))?;
        }

        match host_port.rsplit_once(':') {
            Some((host, port)) => {
                options.host = host.to_string();
                options.port = port.parse().map_err(|_| format!("invalid port '{port}'"))?;
            }
            None => options.host = host_port.to_string(),
        }

        options.validate()?;
        Ok(options)
    }

    /// Render as a `redis://` URL, including credentials.
    #[must_use]
    pub fn url(&self) -> String {
        let auth = match (&self.username, &self.password) {
            (Some(user), Some(password)) => format!("{user}:{password}@"),
            (None, Some(password)) => format!(":{password}@"),
            (Some(user), None) => format!("{user}@"),
            (None, None) => String::new(),
        };
        format!("{URL_SCHEME}{auth}{}:{}/{}", self.host, self.port, self.db)
    }

    /// `host:port/db`, identifying the target store without credentials.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.db)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host cannot be empty".to_string());
        }
        if self.port == 0 {
            return Err("port must be > 0".to_string());
        }
        if self.db < 0 {
            return Err("database index cannot be negative".to_string());
        }
        Ok(())
    }
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db", &self.db)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("connect_timeout", &self.connect_timeout)
            .finish()
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
