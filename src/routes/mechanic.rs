use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::mechanic::MechanicProfileCreate;
use crate::services::mechanic_service;

/*
    POST /api/mechanics/profile
*/
pub async fn create_profile(
    pool: web::Data<SqlitePool>,
    auth: AuthenticatedUser,
    input: web::Json<MechanicProfileCreate>,
) -> Result<HttpResponse, ApiError> {
    let profile = mechanic_service::create_profile(&pool, auth.user_id, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(profile))
}

/*
    GET /api/mechanics/profile
*/
pub async fn get_profile(
    pool: web::Data<SqlitePool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    match mechanic_service::find_by_user(&pool, auth.user_id).await? {
        Some(profile) => Ok(HttpResponse::Ok().json(profile)),
        None => Err(ApiError::not_found("Mechanic profile not found")),
    }
}
