use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::db::sqlite::ping;
use crate::services::planner_service::ItineraryPlanner;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(
    pool: web::Data<SqlitePool>,
    planner: web::Data<ItineraryPlanner>,
) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let database = check_database(&pool).await;
    if database.status != "ok" {
        health.status = "degraded".to_string();
    }
    health.services.insert("database".to_string(), database);

    // The planner works without a model, so a missing key is not degraded.
    let ai_planner = if planner.has_model() {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some("AI itineraries enabled".to_string()),
        }
    } else {
        ServiceStatus {
            status: "disabled".to_string(),
            details: Some("GEMINI_API_KEY not configured, using template itineraries".to_string()),
        }
    };
    health.services.insert("ai_planner".to_string(), ai_planner);

    HttpResponse::Ok().json(health)
}

async fn check_database(pool: &SqlitePool) -> ServiceStatus {
    match ping(pool).await {
        Ok(()) => ServiceStatus {
            status: "ok".to_string(),
            details: None,
        },
        Err(e) => {
            log::error!("Database health check failed: {}", e);
            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to query database: {}", e)),
            }
        }
    }
}
