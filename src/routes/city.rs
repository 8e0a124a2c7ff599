use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::models::city::{CityCreate, CityQuery};
use crate::services::city_service;

/*
    GET /api/cities?q=
*/
pub async fn list(
    pool: web::Data<SqlitePool>,
    query: web::Query<CityQuery>,
) -> Result<HttpResponse, ApiError> {
    let cities = city_service::get_cities(&pool, query.q.as_deref()).await?;
    Ok(HttpResponse::Ok().json(cities))
}

/*
    POST /api/cities
*/
pub async fn create(
    pool: web::Data<SqlitePool>,
    input: web::Json<CityCreate>,
) -> Result<HttpResponse, ApiError> {
    let city = city_service::create_city(&pool, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(city))
}

/*
    GET /api/cities/{id}
*/
pub async fn get_by_id(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    match city_service::get_city(&pool, path.into_inner()).await? {
        Some(city) => Ok(HttpResponse::Ok().json(city)),
        None => Err(ApiError::not_found("City not found")),
    }
}
