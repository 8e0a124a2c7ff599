#![allow(dead_code)]

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{web, App};
use sqlx::SqlitePool;
use std::sync::Arc;

use tripcraft_api::config::AppConfig;
use tripcraft_api::db::{schema::init_schema, sqlite::create_pool};
use tripcraft_api::models::user::{User, UserCreate, UserRole};
use tripcraft_api::routes;
use tripcraft_api::services::auth_service::create_access_token;
use tripcraft_api::services::city_service::seed_cities;
use tripcraft_api::services::gemini_service::PlanModel;
use tripcraft_api::services::planner_service::ItineraryPlanner;
use tripcraft_api::services::user_service::create_user;

pub const TEST_PASSWORD: &str = "secret123";

/// Application state over a fresh in-memory database.
pub struct TestApp {
    pub pool: SqlitePool,
    pub config: AppConfig,
    pub planner: ItineraryPlanner,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_planner(ItineraryPlanner::new(None)).await
    }

    pub async fn with_model(model: Arc<dyn PlanModel>) -> Self {
        Self::with_planner(ItineraryPlanner::new(Some(model))).await
    }

    async fn with_planner(planner: ItineraryPlanner) -> Self {
        let config = AppConfig::for_testing();
        let pool = create_pool(&config.database_url)
            .await
            .expect("in-memory pool");
        init_schema(&pool).await.expect("schema");

        Self {
            pool,
            config,
            planner,
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.pool.clone()))
            .app_data(web::Data::new(self.config.clone()))
            .app_data(web::Data::new(self.planner.clone()))
            .configure(routes::configure)
    }

    pub async fn seed(&self, cities: &[&str]) {
        seed_cities(&self.pool, cities, "India")
            .await
            .expect("seed cities");
    }

    /// Registers a user directly and returns it with a bearer header value.
    pub async fn user_with_token(&self, email: &str, role: UserRole) -> (User, String) {
        let user = create_user(
            &self.pool,
            UserCreate {
                name: "Test User".to_string(),
                email: email.to_string(),
                password: TEST_PASSWORD.to_string(),
                role: Some(role),
            },
        )
        .await
        .expect("create user");

        let token = create_access_token(&user, &self.config).expect("token");
        (user, format!("Bearer {}", token))
    }
}

/// Status of a response, including errors raised by middleware.
pub fn status_of<B>(result: Result<ServiceResponse<B>, actix_web::Error>) -> StatusCode {
    match result {
        Ok(resp) => resp.status(),
        Err(err) => err.error_response().status(),
    }
}
