use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::itinerary::{ItineraryOut, ItineraryRequest};
use crate::services::planner_service::ItineraryPlanner;
use crate::services::{city_service, itinerary_service, user_service};

async fn owned_itinerary(
    pool: &SqlitePool,
    id: i64,
    auth: &AuthenticatedUser,
) -> Result<ItineraryOut, ApiError> {
    let itinerary = itinerary_service::get_itinerary(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Itinerary not found"))?;

    if itinerary.user_id != Some(auth.user_id) {
        return Err(ApiError::forbidden("Not authorized to view this itinerary"));
    }
    Ok(itinerary)
}

/*
    POST /api/itineraries
*/
pub async fn create(
    pool: web::Data<SqlitePool>,
    planner: web::Data<ItineraryPlanner>,
    auth: AuthenticatedUser,
    input: web::Json<ItineraryRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut request = input.into_inner();
    itinerary_service::validate_request(&request)?;

    let user = user_service::current_user(&pool, auth.user_id).await?;
    let city = city_service::get_city_by_name(&pool, request.city.trim())
        .await?
        .ok_or_else(|| {
            ApiError::not_found("City not found in database. Please seed cities first.")
        })?;

    // Plan against the stored spelling of the city.
    request.city = city.name.clone();

    let planned = planner.plan(&request).await;
    let itinerary =
        itinerary_service::create_itinerary(&pool, user.id, &city.name, &request, &planned).await?;

    Ok(HttpResponse::Created().json(itinerary))
}

/*
    GET /api/itineraries
*/
pub async fn list(
    pool: web::Data<SqlitePool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let itineraries = itinerary_service::list_itineraries(&pool, auth.user_id).await?;
    Ok(HttpResponse::Ok().json(itineraries))
}

/*
    GET /api/itineraries/{id}
*/
pub async fn get_by_id(
    pool: web::Data<SqlitePool>,
    auth: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let itinerary = owned_itinerary(&pool, path.into_inner(), &auth).await?;
    Ok(HttpResponse::Ok().json(itinerary))
}

/*
    DELETE /api/itineraries/{id}
*/
pub async fn delete(
    pool: web::Data<SqlitePool>,
    auth: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let itinerary = owned_itinerary(&pool, path.into_inner(), &auth).await?;

    if !itinerary_service::delete_itinerary(&pool, itinerary.id).await? {
        return Err(ApiError::not_found("Itinerary not found"));
    }

    log::info!("Itinerary {} deleted by user {}", itinerary.id, auth.user_id);
    Ok(HttpResponse::NoContent().finish())
}
