//! config.rs
//! Client configuration: named-constant defaults with environment overrides.
//!
//! Unparsable overrides fall back to the default and log a warning; the client
//! never refuses to start over a bad env value.

use std::{env, str::FromStr, time::Duration};
use log::warn;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5555;
const DEFAULT_QUEUE_CAPACITY: usize = 1024;      // Pending requests before callers block on submit
const DEFAULT_MAX_FRAME_LEN: usize = 16 << 20;   // Largest reply frame accepted (16 MiB)

pub const ENV_HOST: &str = "RIEMANN_HOST";
pub const ENV_PORT: &str = "RIEMANN_PORT";
pub const ENV_QUEUE_CAPACITY: &str = "RIEMANN_QUEUE_CAPACITY";
pub const ENV_IO_TIMEOUT_MS: &str = "RIEMANN_IO_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Request channel capacity of the connection actor.
    pub queue_capacity: usize,
    /// Socket read/write timeout. `None` blocks indefinitely.
    pub io_timeout: Option<Duration>,
    pub max_frame_len: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            io_timeout: None,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Defaults overridden by `RIEMANN_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(host) = lookup(ENV_HOST).filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }
        config.port = parse_or(&lookup, ENV_PORT, config.port);
        config.queue_capacity = parse_or(&lookup, ENV_QUEUE_CAPACITY, config.queue_capacity).max(1);
        let timeout_ms: u64 = parse_or(&lookup, ENV_IO_TIMEOUT_MS, 0);
        config.io_timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));
        config
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = Some(timeout);
        self
    }

    pub fn with_max_frame_len(mut self, max: usize) -> Self {
        self.max_frame_len = max;
        self
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Debug,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("[Config] invalid {}={:?}, using default {:?}", key, raw, default);
            default
        }),
    }
}
