use std::str::FromStr;
use std::time::Duration;

use netops_dispatch::DispatchConfig;
use netops_events::journal::DEFAULT_JOURNAL_CAPACITY;

/// A configuration variable held a value that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("{var} must be a valid {expected}, got '{value}'")]
pub struct ConfigError {
    pub var: &'static str,
    pub expected: &'static str,
    pub value: String,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable `fmt` output.
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// The encryption key is not part of this struct; the binary loads it once
/// and hands it straight to the cipher.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Grace period for background tasks after the listener closes (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// Default deadline for a call to a tenant's agent (default: `20`).
    pub dispatch_timeout_secs: u64,
    /// Interval between status polls of a running playbook (default: `5`).
    pub status_poll_interval_secs: u64,
    /// Consecutive failed polls before a run is marked failed (default: `5`).
    pub status_poll_max_failures: u32,
    /// Audit events retained in memory (default: `1000`).
    pub audit_journal_capacity: usize,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `10`                    |
    /// | `DISPATCH_TIMEOUT_SECS`     | `20`                    |
    /// | `STATUS_POLL_INTERVAL_SECS` | `5`                     |
    /// | `STATUS_POLL_MAX_FAILURES`  | `5`                     |
    /// | `AUDIT_JOURNAL_CAPACITY`    | `1000`                  |
    /// | `LOG_FORMAT`                | `pretty`                |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse().map_err(|()| ConfigError {
                var: "LOG_FORMAT",
                expected: "log format (pretty or json)",
                value: raw,
            })?,
            None => LogFormat::Pretty,
        };

        Ok(Self {
            host,
            port: parse(&lookup, "PORT", 3000, "u16")?,
            cors_origins,
            request_timeout_secs: parse(&lookup, "REQUEST_TIMEOUT_SECS", 30, "u64")?,
            shutdown_timeout_secs: parse(&lookup, "SHUTDOWN_TIMEOUT_SECS", 10, "u64")?,
            dispatch_timeout_secs: positive(&lookup, "DISPATCH_TIMEOUT_SECS", 20)?,
            status_poll_interval_secs: positive(&lookup, "STATUS_POLL_INTERVAL_SECS", 5)?,
            status_poll_max_failures: parse(&lookup, "STATUS_POLL_MAX_FAILURES", 5, "u32")?,
            audit_journal_capacity: parse(
                &lookup,
                "AUDIT_JOURNAL_CAPACITY",
                DEFAULT_JOURNAL_CAPACITY,
                "usize",
            )?,
            log_format,
        })
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            default_timeout: Duration::from_secs(self.dispatch_timeout_secs),
            poll_interval: Duration::from_secs(self.status_poll_interval_secs),
            max_poll_failures: self.status_poll_max_failures.max(1),
        }
    }
}

fn parse<T, F>(lookup: &F, var: &'static str, default: T, expected: &'static str) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError {
            var,
            expected,
            value: raw,
        }),
        None => Ok(default),
    }
}

/// Like [`parse`] for durations, where zero is meaningless.
fn positive<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse(lookup, var, default, "positive integer")?;
    if value == 0 {
        return Err(ConfigError {
            var,
            expected: "positive integer",
            value: "0".into(),
        });
    }
    Ok(value)
}
