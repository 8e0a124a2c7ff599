use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Opens the application database.
///
/// In-memory databases live only as long as their connection, so they get a
/// single connection that is never closed for idleness or age.
pub async fn create_pool(url: &str) -> Result<SqlitePool, sqlx::Error> {
    log::info!("Connecting to database: {}", url);

    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options =
        SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS));
    let pool_options = if is_in_memory(url) {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(MAX_CONNECTIONS)
    };

    let pool = pool_options.connect_with(options).await?;

    match ping(&pool).await {
        Ok(()) => log::info!("Database connection verified"),
        Err(e) => log::warn!("Connected to database but ping failed: {}", e),
    }

    Ok(pool)
}

pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
