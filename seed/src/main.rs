use anyhow::Result;
use chrono::Utc;
use reservations::MIGRATOR;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Demonstration catalog: (id, name, available_qty).
const ITEMS: &[(&str, &str, i64)] = &[
    ("item_1", "Espresso Machine", 12),
    ("item_2", "Burr Grinder", 25),
    ("item_3", "Pour-Over Kettle", 40),
    ("item_4", "Milk Frother", 8),
    ("item_5", "Digital Scale", 1),
];

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    info!("Running migrations...");
    MIGRATOR.run(&pool).await?;

    info!("Seeding items...");
    let now_ms = Utc::now().timestamp_millis();
    let mut tx = pool.begin().await?;
    for (id, name, available_qty) in ITEMS {
        // Re-running the seed refreshes names but never clobbers live
        // stock counts.
        sqlx::query(
            r#"
            INSERT INTO items (id, name, available_qty, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(available_qty)
        .bind(now_ms)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    info!(count = ITEMS.len(), "Seed completed");
    Ok(())
}
