// Application state for sharing dependencies across handlers
//
// The engine sees its collaborators through trait objects, so production
// wires PostgreSQL stores and the system clock while the test suites wire
// the in-memory store and a manual clock through the same constructor.

use std::sync::Arc;

use reservations::{
    Clock, IdempotencyStore, ItemCache, PgIdempotencyStore, PgReservationStore, ReservationStore,
    SystemClock,
};
use sqlx::PgPool;

use crate::config::Config;
use crate::middleware::rate_limit::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ReservationStore>,
    idempotency: Arc<dyn IdempotencyStore>,
    cache: Arc<ItemCache>,
    clock: Arc<dyn Clock>,
    limiter: Arc<RateLimiter>,
    config: Arc<Config>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        idempotency: Arc<dyn IdempotencyStore>,
        cache: Arc<ItemCache>,
        clock: Arc<dyn Clock>,
        limiter: Arc<RateLimiter>,
        config: Config,
    ) -> Self {
        Self {
            store,
            idempotency,
            cache,
            clock,
            limiter,
            config: Arc::new(config),
        }
    }

    /// Production wiring over a PostgreSQL pool.
    pub fn from_pool(pool: PgPool, config: Config) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let cache = Arc::new(ItemCache::new(clock.clone(), config.cache_ttl_items_ms));
        let limiter = Arc::new(RateLimiter::new(clock.clone(), (&config).into()));
        Self::new(
            Arc::new(PgReservationStore::new(pool.clone())),
            Arc::new(PgIdempotencyStore::new(pool)),
            cache,
            clock,
            limiter,
            config,
        )
    }

    pub fn store(&self) -> Arc<dyn ReservationStore> {
        self.store.clone()
    }

    pub fn idempotency(&self) -> Arc<dyn IdempotencyStore> {
        self.idempotency.clone()
    }

    pub fn cache(&self) -> Arc<ItemCache> {
        self.cache.clone()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub fn limiter(&self) -> Arc<RateLimiter> {
        self.limiter.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
