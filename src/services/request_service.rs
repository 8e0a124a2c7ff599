use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::models::mechanic::MechanicProfile;
use crate::models::service_request::{
    RequestStats, RequestStatus, ServiceRequest, ServiceRequestCreate,
};

/// SQL condition matching `RequestStatus::ACTIVE`.
fn active_filter() -> String {
    let statuses: Vec<String> = RequestStatus::ACTIVE
        .iter()
        .map(|status| format!("'{}'", status.as_str()))
        .collect();
    format!("status IN ({})", statuses.join(", "))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<ServiceRequest>, sqlx::Error> {
    sqlx::query_as::<_, ServiceRequest>("SELECT * FROM service_requests WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_active_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<ServiceRequest>, sqlx::Error> {
    sqlx::query_as::<_, ServiceRequest>(&format!(
        "SELECT * FROM service_requests WHERE user_id = ? AND {} ORDER BY id DESC LIMIT 1",
        active_filter()
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Opens a new request. A user may have only one active request.
pub async fn create_request(
    pool: &SqlitePool,
    user_id: i64,
    input: ServiceRequestCreate,
) -> Result<ServiceRequest, ApiError> {
    if input.vehicle_type.trim().is_empty() || input.problem_description.trim().is_empty() {
        return Err(ApiError::bad_request(
            "Vehicle type and problem description are required",
        ));
    }
    if find_active_for_user(pool, user_id).await?.is_some() {
        return Err(ApiError::bad_request(
            "You already have an active request. Please wait for it to complete or cancel it.",
        ));
    }

    let request = sqlx::query_as::<_, ServiceRequest>(
        r#"INSERT INTO service_requests
            (user_id, vehicle_type, problem_description, latitude, longitude, address, status, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?)
           RETURNING *"#,
    )
    .bind(user_id)
    .bind(input.vehicle_type.trim())
    .bind(input.problem_description.trim())
    .bind(input.latitude)
    .bind(input.longitude)
    .bind(input.address.as_deref().map(str::trim).filter(|a| !a.is_empty()))
    .bind(RequestStatus::Pending)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    log::info!("Service request {} opened by user {}", request.id, user_id);
    Ok(request)
}

/// The user's requests, newest first.
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
    status: Option<RequestStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<ServiceRequest>, sqlx::Error> {
    let limit = limit.clamp(0, 200);
    let offset = offset.max(0);

    match status {
        Some(status) => {
            sqlx::query_as::<_, ServiceRequest>(
                "SELECT * FROM service_requests WHERE user_id = ? AND status = ? ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            )
            .bind(user_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, ServiceRequest>(
                "SELECT * FROM service_requests WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            )
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn stats_for_user(pool: &SqlitePool, user_id: i64) -> Result<RequestStats, sqlx::Error> {
    let counts: Vec<(RequestStatus, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*) FROM service_requests WHERE user_id = ? GROUP BY status",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut stats = RequestStats::default();
    for (status, count) in counts {
        stats.total += count;
        match status {
            RequestStatus::Pending => stats.pending += count,
            RequestStatus::Accepted | RequestStatus::InProgress => stats.in_progress += count,
            RequestStatus::Completed => stats.completed += count,
            RequestStatus::Cancelled => stats.cancelled += count,
        }
    }
    Ok(stats)
}

pub async fn list_pending(pool: &SqlitePool) -> Result<Vec<ServiceRequest>, sqlx::Error> {
    sqlx::query_as::<_, ServiceRequest>(
        "SELECT * FROM service_requests WHERE status = 'pending' ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}

/// Cancels the user's own pending or accepted request.
pub async fn cancel_request(
    pool: &SqlitePool,
    user_id: i64,
    request_id: i64,
) -> Result<ServiceRequest, ApiError> {
    let request = find_by_id(pool, request_id)
        .await?
        .filter(|r| r.user_id == user_id)
        .ok_or_else(|| ApiError::not_found("Request not found"))?;

    if !request.status.can_cancel() {
        return Err(ApiError::bad_request(format!(
            "Cannot cancel request with status: {}",
            request.status
        )));
    }

    let updated = sqlx::query_as::<_, ServiceRequest>(
        "UPDATE service_requests SET status = ? WHERE id = ? RETURNING *",
    )
    .bind(RequestStatus::Cancelled)
    .bind(request.id)
    .fetch_one(pool)
    .await?;
    Ok(updated)
}

/// Assigns a pending request to the mechanic.
pub async fn accept_request(
    pool: &SqlitePool,
    mechanic: &MechanicProfile,
    request_id: i64,
) -> Result<ServiceRequest, ApiError> {
    let request = find_by_id(pool, request_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Request not found"))?;

    if request.status != RequestStatus::Pending {
        return Err(ApiError::bad_request("This request is no longer available"));
    }

    // Only a still-pending row is updated; a concurrent accept matches nothing.
    let updated = sqlx::query_as::<_, ServiceRequest>(
        r#"UPDATE service_requests
           SET mechanic_id = ?, status = ?, accepted_at = ?
           WHERE id = ? AND status = 'pending'
           RETURNING *"#,
    )
    .bind(mechanic.id)
    .bind(RequestStatus::Accepted)
    .bind(Utc::now())
    .bind(request.id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::bad_request("This request is no longer available"))?;

    log::info!("Request {} accepted by mechanic {}", updated.id, mechanic.id);
    Ok(updated)
}

/// Moves an assigned request along accepted -> in_progress -> completed.
pub async fn update_status(
    pool: &SqlitePool,
    mechanic: &MechanicProfile,
    request_id: i64,
    new_status: &str,
) -> Result<ServiceRequest, ApiError> {
    let request = find_by_id(pool, request_id)
        .await?
        .filter(|r| r.mechanic_id == Some(mechanic.id))
        .ok_or_else(|| ApiError::not_found("Request not found or not assigned to you"))?;

    let target: RequestStatus = new_status.parse().map_err(ApiError::bad_request)?;

    let allowed = request.status.next_allowed();
    if allowed.is_empty() {
        return Err(ApiError::bad_request(format!(
            "Cannot update status from: {}",
            request.status
        )));
    }
    if !allowed.contains(&target) {
        return Err(ApiError::bad_request(format!(
            "Invalid transition from {} to {}",
            request.status, new_status
        )));
    }

    let mut tx = pool.begin().await?;

    let updated = if target == RequestStatus::Completed {
        sqlx::query("UPDATE mechanic_profiles SET total_jobs = total_jobs + 1 WHERE id = ?")
            .bind(mechanic.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query_as::<_, ServiceRequest>(
            "UPDATE service_requests SET status = ?, completed_at = ? WHERE id = ? RETURNING *",
        )
        .bind(target)
        .bind(Utc::now())
        .bind(request.id)
        .fetch_one(&mut *tx)
        .await?
    } else {
        sqlx::query_as::<_, ServiceRequest>(
            "UPDATE service_requests SET status = ? WHERE id = ? RETURNING *",
        )
        .bind(target)
        .bind(request.id)
        .fetch_one(&mut *tx)
        .await?
    };

    tx.commit().await?;

    log::info!("Request {} moved to {}", updated.id, updated.status);
    Ok(updated)
}
