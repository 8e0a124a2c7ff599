use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::error::ApiError;
use crate::models::itinerary::{
    ItineraryDay, ItineraryOut, ItineraryRecord, ItineraryRequest, PlanDay,
};
use crate::services::budget_service::{allocate, TravelStyle};
use crate::services::planner_service::PlannedItinerary;

pub const MAX_TRIP_DAYS: i64 = 30;
pub const MAX_BUDGET: i64 = 1_000_000_000;

pub fn validate_request(request: &ItineraryRequest) -> Result<(), ApiError> {
    if request.city.trim().is_empty() {
        return Err(ApiError::bad_request("City is required"));
    }
    if request.days < 1 || request.days > MAX_TRIP_DAYS {
        return Err(ApiError::bad_request(format!(
            "Days must be between 1 and {}",
            MAX_TRIP_DAYS
        )));
    }
    if request.budget <= 0 {
        return Err(ApiError::bad_request("Budget must be greater than zero"));
    }
    if request.budget > MAX_BUDGET {
        return Err(ApiError::bad_request(format!(
            "Budget must not exceed {}",
            MAX_BUDGET
        )));
    }
    Ok(())
}

fn optional(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Stores the itinerary and one day row per plan day, atomically.
pub async fn create_itinerary(
    pool: &SqlitePool,
    user_id: i64,
    city: &str,
    request: &ItineraryRequest,
    planned: &PlannedItinerary,
) -> Result<ItineraryOut, ApiError> {
    let interests = serde_json::to_string(&request.interests)?;
    let plan = serde_json::to_string(&planned.plan)?;

    let mut tx = pool.begin().await?;

    let record = sqlx::query_as::<_, ItineraryRecord>(
        r#"INSERT INTO itineraries
            (user_id, city, days, budget, travel_style, accommodation, pace, transport_mode,
             interests, plan, source, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
           RETURNING *"#,
    )
    .bind(user_id)
    .bind(city)
    .bind(request.days)
    .bind(request.budget)
    .bind(optional(&request.travel_style))
    .bind(optional(&request.accommodation))
    .bind(optional(&request.pace))
    .bind(optional(&request.transport_mode))
    .bind(interests)
    .bind(plan)
    .bind(planned.source)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    let mut day_plans = Vec::with_capacity(planned.plan.len());
    for day in &planned.plan {
        let row = sqlx::query_as::<_, ItineraryDay>(
            r#"INSERT INTO itinerary_days (itinerary_id, day_number, morning, afternoon, evening)
               VALUES (?, ?, ?, ?, ?)
               RETURNING *"#,
        )
        .bind(record.id)
        .bind(day.day as i64)
        .bind(&day.morning)
        .bind(&day.afternoon)
        .bind(&day.evening)
        .fetch_one(&mut *tx)
        .await?;
        day_plans.push(row);
    }

    tx.commit().await?;

    log::info!(
        "Created itinerary {} for user {}: {} days in {} ({})",
        record.id,
        user_id,
        record.days,
        record.city,
        record.source
    );

    to_output(record, day_plans)
}

pub async fn get_itinerary(pool: &SqlitePool, id: i64) -> Result<Option<ItineraryOut>, ApiError> {
    let record = sqlx::query_as::<_, ItineraryRecord>("SELECT * FROM itineraries WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let Some(record) = record else {
        return Ok(None);
    };

    let days = sqlx::query_as::<_, ItineraryDay>(
        "SELECT * FROM itinerary_days WHERE itinerary_id = ? ORDER BY day_number",
    )
    .bind(record.id)
    .fetch_all(pool)
    .await?;

    to_output(record, days).map(Some)
}

/// The user's itineraries, newest first.
pub async fn list_itineraries(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<ItineraryOut>, ApiError> {
    let records = sqlx::query_as::<_, ItineraryRecord>(
        "SELECT * FROM itineraries WHERE user_id = ? ORDER BY id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let days = sqlx::query_as::<_, ItineraryDay>(
        r#"SELECT d.* FROM itinerary_days d
           JOIN itineraries i ON i.id = d.itinerary_id
           WHERE i.user_id = ?
           ORDER BY d.itinerary_id, d.day_number"#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut by_itinerary: HashMap<i64, Vec<ItineraryDay>> = HashMap::new();
    for day in days {
        by_itinerary.entry(day.itinerary_id).or_default().push(day);
    }

    records
        .into_iter()
        .map(|record| {
            let days = by_itinerary.remove(&record.id).unwrap_or_default();
            to_output(record, days)
        })
        .collect()
}

/// Deletes the itinerary and its days. Returns false when nothing matched.
pub async fn delete_itinerary(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM itineraries WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn to_output(
    record: ItineraryRecord,
    day_plans: Vec<ItineraryDay>,
) -> Result<ItineraryOut, ApiError> {
    let interests: Vec<String> = match record.interests.as_deref() {
        Some(raw) if !raw.is_empty() => serde_json::from_str(raw)?,
        _ => Vec::new(),
    };
    let plan: Vec<PlanDay> = serde_json::from_str(&record.plan)?;

    let style = TravelStyle::from_label(record.travel_style.as_deref().unwrap_or_default());
    let budget_breakdown = allocate(record.budget, record.days, style);

    Ok(ItineraryOut {
        id: record.id,
        user_id: record.user_id,
        city: record.city,
        days: record.days,
        budget: record.budget,
        daily_budget: budget_breakdown.daily_budget,
        travel_style: record.travel_style,
        accommodation: record.accommodation,
        pace: record.pace,
        transport_mode: record.transport_mode,
        interests,
        budget_breakdown,
        source: record.source,
        plan,
        day_plans,
        created_at: record.created_at,
    })
}
