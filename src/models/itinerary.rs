use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::services::budget_service::BudgetBreakdown;

/// Body of `POST /api/itineraries`, as sent by the planner form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryRequest {
    pub city: String,
    #[serde(deserialize_with = "deserialize_lenient_i64")]
    pub days: i64,
    #[serde(deserialize_with = "deserialize_lenient_i64")]
    pub budget: i64,
    #[serde(default)]
    pub travel_style: String,
    #[serde(default)]
    pub accommodation: String,
    #[serde(default)]
    pub pace: String,
    #[serde(default)]
    pub transport_mode: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

// Form inputs arrive as strings ("3"), so numbers are accepted in either form.
// Fractional values are truncated.
fn deserialize_lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: serde_json::Value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64() {
                Ok(f.trunc() as i64)
            } else {
                Err(serde::de::Error::custom("number out of range"))
            }
        }
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .or_else(|_| trimmed.parse::<f64>().map(|f| f.trunc() as i64))
                .map_err(|_| serde::de::Error::custom(format!("expected a number, got {:?}", s)))
        }
        other => Err(serde::de::Error::custom(format!(
            "expected a number, got {}",
            other
        ))),
    }
}

/// One day of a generated plan. Also the shape the AI is asked to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDay {
    #[serde(default)]
    pub day: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub morning: String,
    #[serde(default)]
    pub afternoon: String,
    #[serde(default)]
    pub evening: String,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_cost")]
    pub approx_cost: Option<i64>,
}

// Model answers write costs as 4000, 4000.0 or "₹4,000". Anything without a
// number becomes None and is filled in later.
fn deserialize_lenient_cost<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: serde_json::Value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        serde_json::Value::String(s) => {
            let digits: String = s
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
                .filter(|c| *c != ',')
                .collect();
            digits.parse::<f64>().ok().map(|f| f.round() as i64)
        }
        _ => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PlanSource {
    Ai,
    Fallback,
}

impl fmt::Display for PlanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanSource::Ai => f.write_str("ai"),
            PlanSource::Fallback => f.write_str("fallback"),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItineraryRecord {
    pub id: i64,
    pub user_id: Option<i64>,
    pub city: String,
    pub days: i64,
    pub budget: i64,
    pub travel_style: Option<String>,
    pub accommodation: Option<String>,
    pub pace: Option<String>,
    pub transport_mode: Option<String>,
    pub interests: Option<String>, // JSON array
    pub plan: String,              // JSON array of PlanDay
    pub source: PlanSource,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ItineraryDay {
    pub id: i64,
    pub itinerary_id: i64,
    pub day_number: i64,
    pub morning: Option<String>,
    pub afternoon: Option<String>,
    pub evening: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItineraryOut {
    pub id: i64,
    pub user_id: Option<i64>,
    pub city: String,
    pub days: i64,
    pub budget: i64,
    pub daily_budget: i64,
    pub travel_style: Option<String>,
    pub accommodation: Option<String>,
    pub pace: Option<String>,
    pub transport_mode: Option<String>,
    pub interests: Vec<String>,
    pub budget_breakdown: BudgetBreakdown,
    pub source: PlanSource,
    pub plan: Vec<PlanDay>,
    pub day_plans: Vec<ItineraryDay>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_accepts_form_strings() {
        let request: ItineraryRequest = serde_json::from_value(json!({
            "name": "Asha",
            "email": "asha@example.com",
            "city": "Jaipur",
            "days": "3",
            "budget": "15000",
            "travelStyle": "Food & Culture",
            "transportMode": "Walking",
            "interests": ["Museums"]
        }))
        .unwrap();

        assert_eq!(request.days, 3);
        assert_eq!(request.budget, 15000);
        assert_eq!(request.travel_style, "Food & Culture");
        assert_eq!(request.transport_mode, "Walking");
        assert_eq!(request.pace, "");
    }

    #[test]
    fn test_request_truncates_fractional_numbers() {
        let request: ItineraryRequest = serde_json::from_value(json!({
            "city": "Goa",
            "days": 2.0,
            "budget": "9999.9"
        }))
        .unwrap();

        assert_eq!(request.days, 2);
        assert_eq!(request.budget, 9999);
        assert!(request.interests.is_empty());
    }

    #[test]
    fn test_request_rejects_non_numeric_days() {
        let result: Result<ItineraryRequest, _> = serde_json::from_value(json!({
            "city": "Goa",
            "days": "three",
            "budget": 1000
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_plan_day_fills_missing_fields() {
        let day: PlanDay = serde_json::from_value(json!({
            "day": 1,
            "title": "Arrival"
        }))
        .unwrap();

        assert!(day.activities.is_empty());
        assert_eq!(day.approx_cost, None);
        assert_eq!(day.morning, "");
    }

    #[test]
    fn test_plan_day_accepts_loose_costs() {
        let cost = |value: serde_json::Value| {
            serde_json::from_value::<PlanDay>(json!({ "day": 1, "approx_cost": value }))
                .unwrap()
                .approx_cost
        };

        assert_eq!(cost(json!(4000)), Some(4000));
        assert_eq!(cost(json!(4000.4)), Some(4000));
        assert_eq!(cost(json!("₹4,000")), Some(4000));
        assert_eq!(cost(json!("about 2500.6 rupees")), Some(2501));
        assert_eq!(cost(json!("free")), None);
        assert_eq!(cost(json!(null)), None);
    }
}
