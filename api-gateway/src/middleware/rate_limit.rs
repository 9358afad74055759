// Token-bucket rate limiting
//
// Two tiers share one limiter: a strict bucket on mutation routes and a
// lenient one on reads, both keyed by caller address. Tokens accrue
// continuously at capacity/window per millisecond, capped at capacity.
// Before the strict bucket rejects outright, a slow-down gate stretches
// bursts by adding a bounded delay per request beyond a threshold.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use reservations::Clock;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::Config;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;
use crate::state::AppState;

const SLOWDOWN_THRESHOLD: u32 = 10;
const SLOWDOWN_STEP_MS: u64 = 500;
const SLOWDOWN_CAP_MS: u64 = 2_000;
/// Read routes tolerate a burst several times the mutation budget.
const LENIENT_MULTIPLIER: u32 = 5;

#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    pub strict_capacity: u32,
    pub lenient_capacity: u32,
    pub window_ms: i64,
    pub slowdown_threshold: u32,
    pub slowdown_step_ms: u64,
    pub slowdown_cap_ms: u64,
}

impl From<&Config> for RateLimitSettings {
    fn from(config: &Config) -> Self {
        Self {
            strict_capacity: config.rate_limit_max_requests,
            lenient_capacity: config.rate_limit_max_requests * LENIENT_MULTIPLIER,
            window_ms: config.rate_limit_window_ms,
            slowdown_threshold: SLOWDOWN_THRESHOLD,
            slowdown_step_ms: SLOWDOWN_STEP_MS,
            slowdown_cap_ms: SLOWDOWN_CAP_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Strict,
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Allowed {
        limit: u32,
        remaining: u32,
        /// Seconds until the bucket is full again.
        reset_secs: u64,
        /// Slow-down delay to apply before handling, 0 when under the
        /// threshold.
        delay_ms: u64,
    },
    Limited {
        limit: u32,
        /// Seconds until at least one token is back.
        retry_after_secs: u64,
        reset_secs: u64,
    },
}

struct Bucket {
    tokens: f64,
    refilled_at: i64,
    window_start: i64,
    window_count: u32,
    touched_at: i64,
}

pub struct RateLimiter {
    clock: Arc<dyn Clock>,
    settings: RateLimitSettings,
    strict: Mutex<HashMap<String, Bucket>>,
    lenient: Mutex<HashMap<String, Bucket>>,
}

impl RateLimiter {
    pub fn new(clock: Arc<dyn Clock>, settings: RateLimitSettings) -> Self {
        Self {
            clock,
            settings,
            strict: Mutex::new(HashMap::new()),
            lenient: Mutex::new(HashMap::new()),
        }
    }

    fn capacity(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Strict => self.settings.strict_capacity,
            Tier::Lenient => self.settings.lenient_capacity,
        }
    }

    /// Consumes one token for `key`, or reports how long to wait.
    pub fn check(&self, tier: Tier, key: &str) -> Decision {
        let now_ms = self.clock.now_ms();
        let capacity = self.capacity(tier);
        let window_ms = self.settings.window_ms;
        let refill_per_ms = capacity as f64 / window_ms as f64;

        let mut buckets = match tier {
            Tier::Strict => self.strict.lock().unwrap(),
            Tier::Lenient => self.lenient.lock().unwrap(),
        };
        let bucket = buckets.entry(key.to_string()).or_insert(Bucket {
            tokens: capacity as f64,
            refilled_at: now_ms,
            window_start: now_ms,
            window_count: 0,
            touched_at: now_ms,
        });

        let elapsed_ms = (now_ms - bucket.refilled_at).max(0);
        bucket.tokens = (bucket.tokens + elapsed_ms as f64 * refill_per_ms).min(capacity as f64);
        bucket.refilled_at = now_ms;
        bucket.touched_at = now_ms;

        if bucket.tokens < 1.0 {
            let deficit_ms = ((1.0 - bucket.tokens) / refill_per_ms).ceil() as u64;
            let full_ms = ((capacity as f64 - bucket.tokens) / refill_per_ms).ceil() as u64;
            return Decision::Limited {
                limit: capacity,
                retry_after_secs: deficit_ms.div_ceil(1_000).max(1),
                reset_secs: full_ms.div_ceil(1_000),
            };
        }

        bucket.tokens -= 1.0;

        if now_ms - bucket.window_start >= window_ms {
            bucket.window_start = now_ms;
            bucket.window_count = 0;
        }
        bucket.window_count += 1;

        // The slow-down gate only stretches mutation bursts.
        let delay_ms = if tier == Tier::Strict {
            let over = bucket
                .window_count
                .saturating_sub(self.settings.slowdown_threshold) as u64;
            (over * self.settings.slowdown_step_ms).min(self.settings.slowdown_cap_ms)
        } else {
            0
        };

        let full_ms = ((capacity as f64 - bucket.tokens) / refill_per_ms).ceil() as u64;
        Decision::Allowed {
            limit: capacity,
            remaining: bucket.tokens.floor() as u32,
            reset_secs: full_ms.div_ceil(1_000),
            delay_ms,
        }
    }

    /// Drops buckets idle for more than two windows. Returns the count
    /// removed.
    pub fn sweep_idle(&self) -> usize {
        let cutoff = self.clock.now_ms() - self.settings.window_ms * 2;
        let mut removed = 0;
        for buckets in [&self.strict, &self.lenient] {
            let mut buckets = buckets.lock().unwrap();
            let before = buckets.len();
            buckets.retain(|_, bucket| bucket.touched_at >= cutoff);
            removed += before - buckets.len();
        }
        removed
    }
}

/// Strict tier, for mutation routes.
pub async fn strict_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    limit_request(state, Tier::Strict, req, next).await
}

/// Lenient tier, for read routes.
pub async fn lenient_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    limit_request(state, Tier::Lenient, req, next).await
}

async fn limit_request(state: AppState, tier: Tier, req: Request, next: Next) -> Response {
    let key = client_key(&req);
    match state.limiter().check(tier, &key) {
        Decision::Allowed {
            limit,
            remaining,
            reset_secs,
            delay_ms,
        } => {
            if delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            let mut response = next.run(req).await;
            set_rate_headers(&mut response, limit, remaining, reset_secs);
            response
        }
        Decision::Limited {
            limit,
            retry_after_secs,
            reset_secs,
        } => {
            let request_id = req.extensions().get::<RequestId>().cloned();
            let mut error = AppError::rate_limited(retry_after_secs);
            if let Some(request_id) = request_id {
                error = error.with_request_id(&request_id);
            }
            let mut response = error.into_response();
            set_rate_headers(&mut response, limit, 0, reset_secs);
            set_header(&mut response, "retry-after", retry_after_secs);
            response
        }
    }
}

/// Buckets are keyed by the first X-Forwarded-For hop when present, else
/// the peer socket address.
fn client_key(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return forwarded.to_string();
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn set_rate_headers(response: &mut Response, limit: u32, remaining: u32, reset_secs: u64) {
    set_header(response, "x-ratelimit-limit", limit as u64);
    set_header(response, "x-ratelimit-remaining", remaining as u64);
    set_header(response, "x-ratelimit-reset", reset_secs);
}

fn set_header(response: &mut Response, name: &'static str, value: u64) {
    if let Ok(value) = HeaderValue::from_str(&value.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(name), value);
    }
}

/// Spawns the periodic sweep of idle buckets.
pub fn spawn_bucket_janitor(limiter: Arc<RateLimiter>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = limiter.sweep_idle();
            if removed > 0 {
                debug!(removed, "swept idle rate-limit buckets");
            }
        }
    })
}
