// Runtime configuration, loaded from the environment at startup

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

const DEFAULT_RESERVATION_TIMEOUT_MINUTES: i64 = 10;
const DEFAULT_CACHE_TTL_ITEMS_MS: i64 = 30_000;
const DEFAULT_RATE_LIMIT_WINDOW_MS: i64 = 10_000;
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 20;
const DEFAULT_EXPIRATION_INTERVAL_SECONDS: u64 = 30;
const DEFAULT_IDEMPOTENCY_TTL_MS: i64 = 24 * 60 * 60 * 1_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_prefix: String,
    /// How long a fresh hold stays reservable, in milliseconds.
    pub reservation_ttl_ms: i64,
    pub cache_ttl_items_ms: i64,
    pub rate_limit_window_ms: i64,
    pub rate_limit_max_requests: u32,
    pub expiration_interval: Duration,
    /// Stored idempotency responses older than this are not replayed.
    pub idempotency_ttl_ms: i64,
    pub cors_origin: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL must be set (PostgreSQL URL)")?;

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            database_url,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
            reservation_ttl_ms: env_or(
                "RESERVATION_TIMEOUT_MINUTES",
                DEFAULT_RESERVATION_TIMEOUT_MINUTES,
            ) * 60_000,
            cache_ttl_items_ms: env_or("CACHE_TTL_ITEMS", DEFAULT_CACHE_TTL_ITEMS_MS),
            rate_limit_window_ms: env_or("RATE_LIMIT_WINDOW_MS", DEFAULT_RATE_LIMIT_WINDOW_MS),
            rate_limit_max_requests: env_or(
                "RATE_LIMIT_MAX_REQUESTS",
                DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            ),
            expiration_interval: Duration::from_secs(env_or(
                "EXPIRATION_INTERVAL_SECONDS",
                DEFAULT_EXPIRATION_INTERVAL_SECONDS,
            )),
            idempotency_ttl_ms: DEFAULT_IDEMPOTENCY_TTL_MS,
            cors_origin: env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads `key`, falling back to `default` when unset or unparseable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
