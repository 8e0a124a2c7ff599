use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::models::mechanic::{MechanicProfile, MechanicProfileCreate};

pub async fn find_by_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<MechanicProfile>, sqlx::Error> {
    sqlx::query_as::<_, MechanicProfile>("SELECT * FROM mechanic_profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn create_profile(
    pool: &SqlitePool,
    user_id: i64,
    input: MechanicProfileCreate,
) -> Result<MechanicProfile, ApiError> {
    let business_name = input.business_name.trim();
    if business_name.is_empty() {
        return Err(ApiError::bad_request("Business name is required"));
    }
    if find_by_user(pool, user_id).await?.is_some() {
        return Err(ApiError::bad_request("Mechanic profile already exists"));
    }

    let profile = sqlx::query_as::<_, MechanicProfile>(
        r#"INSERT INTO mechanic_profiles (user_id, business_name, phone, latitude, longitude, total_jobs, created_at)
           VALUES (?, ?, ?, ?, ?, 0, ?)
           RETURNING *"#,
    )
    .bind(user_id)
    .bind(business_name)
    .bind(input.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()))
    .bind(input.latitude)
    .bind(input.longitude)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| ApiError::unique_violation_or(e, "Mechanic profile already exists"))?;

    log::info!("Mechanic profile {} created for user {}", profile.id, user_id);
    Ok(profile)
}
