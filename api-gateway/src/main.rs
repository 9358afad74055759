use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use api_gateway::{app_router, AppState, Config};
use reservations::{
    spawn_expiration_worker, spawn_idempotency_janitor, ExpireReservationsUseCase, MIGRATOR,
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api_gateway::middleware::rate_limit::spawn_bucket_janitor;

const IDEMPOTENCY_SWEEP_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);
const BUCKET_SWEEP_PERIOD: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("connecting to PostgreSQL")?;
    MIGRATOR.run(&pool).await.context("running migrations")?;

    let addr = format!("{}:{}", config.host, config.port);
    let expiration_interval = config.expiration_interval;
    let idempotency_ttl_ms = config.idempotency_ttl_ms;
    let state = AppState::from_pool(pool, config);

    // Recover stock from holds that lapsed while the process was down.
    let expire = ExpireReservationsUseCase::new(state.store(), state.cache(), state.clock());
    match expire.execute().await {
        Ok(result) if result.expired_count > 0 => {
            info!(expired = result.expired_count, "recovered stock from lapsed holds");
        }
        Ok(_) => {}
        Err(error) => warn!(%error, "startup expiry pass failed; the worker will retry"),
    }

    spawn_expiration_worker(expire, expiration_interval);
    spawn_idempotency_janitor(
        state.idempotency(),
        state.clock(),
        IDEMPOTENCY_SWEEP_PERIOD,
        idempotency_ttl_ms,
    );
    spawn_bucket_janitor(state.limiter(), BUCKET_SWEEP_PERIOD);

    let app = app_router(state);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("serving")?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("shutdown signal received; finishing in-flight requests");
}
