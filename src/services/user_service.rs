use chrono::Utc;
use regex::Regex;
use sqlx::SqlitePool;
use std::sync::OnceLock;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::user::{User, UserCreate};
use crate::services::auth_service::{create_access_token, hash_password, verify_password};

const MIN_PASSWORD_LEN: usize = 6;

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(
                r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)+$",
            )
            .expect("email pattern is valid")
        })
        .is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await
}

/// The user a validated token refers to. A deleted user is an auth failure.
pub async fn current_user(pool: &SqlitePool, user_id: i64) -> Result<User, ApiError> {
    find_by_id(pool, user_id)
        .await?
        .ok_or_else(ApiError::invalid_credentials)
}

pub async fn create_user(pool: &SqlitePool, input: UserCreate) -> Result<User, ApiError> {
    let name = input.name.trim();
    let email = normalize_email(&input.email);

    if name.is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if !is_valid_email(&email) {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if find_by_email(pool, &email).await?.is_some() {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let hashed = hash_password(&input.password)?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password, role, created_at) VALUES (?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(name)
    .bind(&email)
    .bind(hashed)
    .bind(input.role.unwrap_or_default())
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| ApiError::unique_violation_or(e, "Email already registered"))?;

    log::info!("Registered user {} ({})", user.id, user.role);
    Ok(user)
}

/// Returns the user only when the password matches.
pub async fn authenticate_user(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<Option<User>, ApiError> {
    let user = find_by_email(pool, email).await?;
    Ok(user.filter(|u| verify_password(password, &u.password)))
}

/// Access token for valid credentials, `None` otherwise.
pub async fn login_user(
    pool: &SqlitePool,
    config: &AppConfig,
    email: &str,
    password: &str,
) -> Result<Option<String>, ApiError> {
    match authenticate_user(pool, email, password).await? {
        Some(user) => Ok(Some(create_access_token(&user, config)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("asha@example.com"));
        assert!(is_valid_email("first.last+trip@mail.co.in"));
        assert!(!is_valid_email("asha@"));
        assert!(!is_valid_email("asha@localhost"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Asha@Example.COM "), "asha@example.com");
    }
}
