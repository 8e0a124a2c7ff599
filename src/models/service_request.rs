use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub const ACTIVE: [RequestStatus; 3] = [
        RequestStatus::Pending,
        RequestStatus::Accepted,
        RequestStatus::InProgress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_cancel(&self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Accepted)
    }

    /// Transitions a mechanic may make on an assigned request.
    pub fn next_allowed(&self) -> &'static [RequestStatus] {
        match self {
            RequestStatus::Accepted => &[RequestStatus::InProgress, RequestStatus::Cancelled],
            RequestStatus::InProgress => &[RequestStatus::Completed],
            _ => &[],
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "accepted" => Ok(RequestStatus::Accepted),
            "in_progress" => Ok(RequestStatus::InProgress),
            "completed" => Ok(RequestStatus::Completed),
            "cancelled" => Ok(RequestStatus::Cancelled),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ServiceRequest {
    pub id: i64,
    pub user_id: i64,
    pub mechanic_id: Option<i64>,
    pub vehicle_type: String,
    pub problem_description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceRequestCreate {
    pub vehicle_type: String,
    pub problem_description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MyRequestsQuery {
    pub status_filter: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateQuery {
    pub new_status: String,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestStats {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub cancelled: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("IN_PROGRESS".parse::<RequestStatus>(), Ok(RequestStatus::InProgress));
        assert_eq!("Pending".parse::<RequestStatus>(), Ok(RequestStatus::Pending));
        assert_eq!(
            "done".parse::<RequestStatus>(),
            Err("Invalid status: done".to_string())
        );
    }

    #[test]
    fn test_transitions() {
        assert_eq!(
            RequestStatus::Accepted.next_allowed(),
            &[RequestStatus::InProgress, RequestStatus::Cancelled]
        );
        assert_eq!(RequestStatus::InProgress.next_allowed(), &[RequestStatus::Completed]);
        assert!(RequestStatus::Pending.next_allowed().is_empty());
        assert!(RequestStatus::Completed.next_allowed().is_empty());
    }

    #[test]
    fn test_active_and_cancellable() {
        assert!(RequestStatus::ACTIVE.contains(&RequestStatus::InProgress));
        assert!(!RequestStatus::ACTIVE.contains(&RequestStatus::Completed));
        assert!(RequestStatus::Accepted.can_cancel());
        assert!(!RequestStatus::InProgress.can_cancel());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let value = serde_json::to_value(RequestStatus::InProgress).unwrap();
        assert_eq!(value, "in_progress");
    }
}
