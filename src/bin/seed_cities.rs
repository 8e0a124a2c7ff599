use env_logger::Env;

use tripcraft_api::config::AppConfig;
use tripcraft_api::db::{schema, sqlite};
use tripcraft_api::services::city_service::{seed_cities, INDIAN_CITIES};

#[tokio::main]
async fn main() -> Result<(), sqlx::Error> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();
    let pool = sqlite::create_pool(&config.database_url).await?;
    schema::init_schema(&pool).await?;

    let added = seed_cities(&pool, INDIAN_CITIES, "India").await?;
    log::info!(
        "Seeded {} new cities ({} already present) into {}",
        added,
        INDIAN_CITIES.len() - added,
        config.database_url
    );
    Ok(())
}
