//! Environment-driven configuration
//!
//! All settings come from environment variables (`.env` supported via
//! dotenvy) with defaults that match a local deployment.

use std::env;
use std::time::Duration as StdDuration;

use chrono::Duration;

use crate::store::StoreConfig;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// Domain written into the short URLs handed back to clients
    pub public_domain: String,
    /// Scheme written into the short URLs handed back to clients
    pub public_proto: String,
    /// Path prefix in front of tokens; stripped again during resolution
    pub route_prefix: String,
    pub token_length: usize,
    /// `None` means new entries never expire
    pub default_ttl: Option<Duration>,
    pub cleanup_interval: StdDuration,
    pub snapshot_file: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "SERVER_PORT must be a port number".to_string())?;

        let token_length: usize = env::var("TOKEN_LENGTH")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| "TOKEN_LENGTH must be a positive integer".to_string())?;
        if token_length == 0 {
            return Err("TOKEN_LENGTH must be at least 1".to_string());
        }

        let default_ttl =
            parse_ttl(&env::var("DEFAULT_TTL").unwrap_or_else(|_| "240h".to_string()))?;

        let cleanup_interval =
            parse_duration(&env::var("CLEANUP_INTERVAL").unwrap_or_else(|_| "1h".to_string()))?;
        if cleanup_interval.is_zero() {
            return Err("CLEANUP_INTERVAL must be non-zero".to_string());
        }

        let mut route_prefix = env::var("ROUTE_PREFIX").unwrap_or_default();
        if !route_prefix.is_empty() && !route_prefix.ends_with('/') {
            route_prefix.push('/');
        }

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port,
            public_domain: env::var("PUBLIC_DOMAIN").unwrap_or_else(|_| "localhost".to_string()),
            public_proto: env::var("PUBLIC_PROTO").unwrap_or_else(|_| "https".to_string()),
            route_prefix,
            token_length,
            default_ttl,
            cleanup_interval: StdDuration::from_secs(cleanup_interval.num_seconds().max(0) as u64),
            snapshot_file: env::var("SNAPSHOT_FILE").unwrap_or_else(|_| "urls.json".to_string()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Base of the short URLs handed back to clients. The port is omitted
    /// when it is the default for the configured scheme.
    pub fn base_url(&self) -> String {
        let default_port = match self.public_proto.as_str() {
            "https" => 443,
            _ => 80,
        };
        if self.server_port == default_port {
            format!(
                "{}://{}/{}",
                self.public_proto, self.public_domain, self.route_prefix
            )
        } else {
            format!(
                "{}://{}:{}/{}",
                self.public_proto, self.public_domain, self.server_port, self.route_prefix
            )
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            default_ttl: self.default_ttl,
            cleanup_interval: self.cleanup_interval,
        }
    }
}

/// Parse a TTL value: `0` disables expiration, anything else is a duration.
pub fn parse_ttl(input: &str) -> Result<Option<Duration>, String> {
    if input.trim() == "0" {
        return Ok(None);
    }
    parse_duration(input).map(Some)
}

/// Parse a `<number><unit>` duration, with `s`, `m`, `h` and `d` units.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("Missing time unit in '{}'", input))?;

    let (num_str, unit) = input.split_at(split);
    let num: i64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number in '{}'", input))?;

    match unit {
        "s" => Ok(Duration::seconds(num)),
        "m" => Ok(Duration::minutes(num)),
        "h" => Ok(Duration::hours(num)),
        "d" => Ok(Duration::days(num)),
        _ => Err(format!("Unsupported time unit: '{}'", unit)),
    }
}
