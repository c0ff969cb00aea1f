//! Provider configuration loaded from environment variables.

use crate::error::ControllerError;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_ERROR_REQUEUE_SECS: u64 = 30;
const DEFAULT_RECONCILE_CONCURRENCY: u16 = 3;
const DEFAULT_METRICS_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Logged only; every managed kind is cluster scoped
    pub namespace: Option<String>,
    /// Requeue delay after a successful reconcile
    pub poll_interval: Duration,
    /// Requeue delay after a failed reconcile
    pub error_requeue: Duration,
    /// Concurrent reconciles per kind
    pub concurrency: u16,
    pub metrics_addr: SocketAddr,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            error_requeue: Duration::from_secs(DEFAULT_ERROR_REQUEUE_SECS),
            concurrency: DEFAULT_RECONCILE_CONCURRENCY,
            metrics_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let poll_secs: u64 = parse_var(&lookup, "POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        let error_secs: u64 = parse_var(&lookup, "ERROR_REQUEUE_SECS", DEFAULT_ERROR_REQUEUE_SECS)?;
        let concurrency: u16 =
            parse_var(&lookup, "RECONCILE_CONCURRENCY", DEFAULT_RECONCILE_CONCURRENCY)?;
        let metrics_addr: SocketAddr = match lookup("METRICS_ADDR") {
            Some(value) => value.parse().map_err(|e| {
                ControllerError::InvalidConfig(format!("METRICS_ADDR '{}': {}", value, e))
            })?,
            None => DEFAULT_METRICS_ADDR.parse().map_err(|e| {
                ControllerError::InvalidConfig(format!("METRICS_ADDR default: {}", e))
            })?,
        };

        if poll_secs == 0 {
            return Err(ControllerError::InvalidConfig(
                "POLL_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }
        if concurrency == 0 {
            return Err(ControllerError::InvalidConfig(
                "RECONCILE_CONCURRENCY must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            namespace: lookup("WATCH_NAMESPACE").filter(|ns| !ns.is_empty()),
            poll_interval: Duration::from_secs(poll_secs),
            error_requeue: Duration::from_secs(error_secs),
            concurrency,
            metrics_addr,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ControllerError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| {
            ControllerError::InvalidConfig(format!("{} '{}': {}", key, value, e))
        }),
        None => Ok(default),
    }
}
