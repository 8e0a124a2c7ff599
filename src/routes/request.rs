use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::mechanic::MechanicProfile;
use crate::models::service_request::{
    MyRequestsQuery, RequestStatus, ServiceRequestCreate, StatusUpdateQuery,
};
use crate::models::user::UserRole;
use crate::services::{mechanic_service, request_service};

async fn mechanic_profile(
    pool: &SqlitePool,
    auth: &AuthenticatedUser,
    missing: &str,
) -> Result<MechanicProfile, ApiError> {
    mechanic_service::find_by_user(pool, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::bad_request(missing))
}

/*
    POST /api/requests
*/
pub async fn create(
    pool: web::Data<SqlitePool>,
    auth: AuthenticatedUser,
    input: web::Json<ServiceRequestCreate>,
) -> Result<HttpResponse, ApiError> {
    auth.require_role(UserRole::User, "Only users can create service requests")?;
    let request = request_service::create_request(&pool, auth.user_id, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(request))
}

/*
    GET /api/requests/my-requests?status_filter=&limit=&offset=
*/
pub async fn my_requests(
    pool: web::Data<SqlitePool>,
    auth: AuthenticatedUser,
    query: web::Query<MyRequestsQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let status = match query.status_filter.as_deref().map(str::trim) {
        Some(filter) if !filter.is_empty() => {
            Some(filter.parse::<RequestStatus>().map_err(ApiError::bad_request)?)
        }
        _ => None,
    };

    let requests = request_service::list_for_user(
        &pool,
        auth.user_id,
        status,
        query.limit,
        query.offset,
    )
    .await?;
    Ok(HttpResponse::Ok().json(requests))
}

/*
    GET /api/requests/active
*/
pub async fn active(
    pool: web::Data<SqlitePool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let request = request_service::find_active_for_user(&pool, auth.user_id).await?;
    Ok(HttpResponse::Ok().json(request))
}

/*
    GET /api/requests/stats
*/
pub async fn stats(
    pool: web::Data<SqlitePool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let stats = request_service::stats_for_user(&pool, auth.user_id).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/*
    GET /api/requests/{id}
*/
pub async fn get_by_id(
    pool: web::Data<SqlitePool>,
    auth: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let request = request_service::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Request not found"))?;

    let allowed = match auth.role {
        UserRole::User => request.user_id == auth.user_id,
        UserRole::Mechanic => {
            let profile = mechanic_service::find_by_user(&pool, auth.user_id).await?;
            request.status == RequestStatus::Pending
                || matches!((profile, request.mechanic_id), (Some(p), Some(m)) if p.id == m)
        }
    };

    if !allowed {
        return Err(ApiError::forbidden("Not authorized to view this request"));
    }
    Ok(HttpResponse::Ok().json(request))
}

/*
    PATCH /api/requests/{id}/cancel
*/
pub async fn cancel(
    pool: web::Data<SqlitePool>,
    auth: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let request = request_service::cancel_request(&pool, auth.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(request))
}

/*
    GET /api/requests/nearby/pending
*/
pub async fn nearby_pending(
    pool: web::Data<SqlitePool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    auth.require_role(UserRole::Mechanic, "Only mechanics can view pending requests")?;
    mechanic_profile(&pool, &auth, "Please complete your mechanic profile first").await?;

    let requests = request_service::list_pending(&pool).await?;
    Ok(HttpResponse::Ok().json(requests))
}

/*
    PATCH /api/requests/{id}/accept
*/
pub async fn accept(
    pool: web::Data<SqlitePool>,
    auth: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_role(UserRole::Mechanic, "Only mechanics can accept requests")?;
    let profile =
        mechanic_profile(&pool, &auth, "Please complete your mechanic profile first").await?;

    let request = request_service::accept_request(&pool, &profile, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(request))
}

/*
    PATCH /api/requests/{id}/status?new_status=
*/
pub async fn update_status(
    pool: web::Data<SqlitePool>,
    auth: AuthenticatedUser,
    path: web::Path<i64>,
    query: web::Query<StatusUpdateQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_role(UserRole::Mechanic, "Only mechanics can update request status")?;
    let profile = mechanic_profile(&pool, &auth, "Mechanic profile not found").await?;

    let request = request_service::update_status(
        &pool,
        &profile,
        path.into_inner(),
        &query.new_status,
    )
    .await?;
    Ok(HttpResponse::Ok().json(request))
}
