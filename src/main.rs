use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use tripcraft_api::config::AppConfig;
use tripcraft_api::db::{schema, sqlite};
use tripcraft_api::routes;
use tripcraft_api::services::planner_service::ItineraryPlanner;

fn cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }
    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();
    log::info!("Opening database {}", config.database_url);

    let pool = sqlite::create_pool(&config.database_url)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    schema::init_schema(&pool)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let planner = web::Data::new(ItineraryPlanner::from_config(&config.ai));
    let pool = web::Data::new(pool);
    let bind = (config.host.clone(), config.port);
    let config = web::Data::new(config);

    log::info!("Starting HTTP server on {}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors(&config.cors_origins))
            .app_data(pool.clone())
            .app_data(config.clone())
            .app_data(planner.clone())
            .configure(routes::configure)
    })
    .bind(bind)?
    .run()
    .await
}
