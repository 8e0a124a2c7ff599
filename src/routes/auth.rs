use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::user::{LoginRequest, TokenResponse, UserCreate, UserOut};
use crate::services::user_service;

/*
    POST /api/auth/signup
*/
pub async fn signup(
    pool: web::Data<SqlitePool>,
    input: web::Json<UserCreate>,
) -> Result<HttpResponse, ApiError> {
    let user = user_service::create_user(&pool, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(UserOut::from(user)))
}

/*
    POST /api/auth/login
*/
pub async fn login(
    pool: web::Data<SqlitePool>,
    config: web::Data<AppConfig>,
    input: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    match user_service::login_user(&pool, &config, &input.email, &input.password).await? {
        Some(token) => Ok(HttpResponse::Ok().json(TokenResponse::bearer(token))),
        None => Err(ApiError::unauthorized("Invalid email or password")),
    }
}

/*
    GET /api/auth/me
*/
pub async fn me(
    pool: web::Data<SqlitePool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user = user_service::current_user(&pool, auth.user_id).await?;
    Ok(HttpResponse::Ok().json(UserOut::from(user)))
}
