use std::env;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8000;
const DATABASE_URL: &str = "sqlite://tripcraft.db";
const DEFAULT_JWT_SECRET: &str = "change-me-in-production";
const ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 60 * 24;
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODELS: &str =
    "gemini-2.5-flash,gemini-2.0-flash-lite,gemini-2.5-flash-lite,gemini-flash-lite-latest";
const AI_TIMEOUT_SECS: u64 = 30;
const CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
    pub ai: AiConfig,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    /// No key means the planner always uses the fallback generator.
    pub api_key: Option<String>,
    pub base_url: String,
    pub models: Vec<String>,
    pub timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                log::warn!("JWT_SECRET not set, using the built-in development secret");
                DEFAULT_JWT_SECRET.to_string()
            }
        };

        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Self {
            host: env::var("HOST").unwrap_or_else(|_| HOST.to_string()),
            port: parse_or("PORT", PORT),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| DATABASE_URL.to_string()),
            jwt_secret,
            access_token_expire_minutes: parse_or(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                ACCESS_TOKEN_EXPIRE_MINUTES,
            ),
            ai: AiConfig {
                api_key,
                base_url: env::var("GEMINI_BASE_URL")
                    .unwrap_or_else(|_| GEMINI_BASE_URL.to_string()),
                models: split_list(
                    &env::var("GEMINI_MODELS").unwrap_or_else(|_| GEMINI_MODELS.to_string()),
                ),
                timeout_secs: parse_or("AI_TIMEOUT_SECS", AI_TIMEOUT_SECS),
            },
            cors_origins: split_list(
                &env::var("CORS_ORIGINS").unwrap_or_else(|_| CORS_ORIGINS.to_string()),
            ),
        }
    }

    /// Config for tests and tooling: in-memory database, no AI key.
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            access_token_expire_minutes: ACCESS_TOKEN_EXPIRE_MINUTES,
            ai: AiConfig {
                api_key: None,
                base_url: GEMINI_BASE_URL.to_string(),
                models: split_list(GEMINI_MODELS),
                timeout_secs: AI_TIMEOUT_SECS,
            },
            cors_origins: split_list(CORS_ORIGINS),
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 6] = [
        "PORT",
        "JWT_SECRET",
        "GEMINI_API_KEY",
        "GEMINI_MODELS",
        "ACCESS_TOKEN_EXPIRE_MINUTES",
        "CORS_ORIGINS",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_when_env_is_empty() {
        clear_env();
        let config = AppConfig::from_env();

        assert_eq!(config.port, 8000);
        assert_eq!(config.jwt_secret, DEFAULT_JWT_SECRET);
        assert_eq!(config.access_token_expire_minutes, 1440);
        assert!(config.ai.api_key.is_none());
        assert_eq!(config.ai.models.len(), 4);
        assert_eq!(config.ai.models[0], "gemini-2.5-flash");
        assert_eq!(config.cors_origins.len(), 2);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("PORT", "9090");
        env::set_var("JWT_SECRET", "s3cret");
        env::set_var("GEMINI_API_KEY", "  abc  ");
        env::set_var("GEMINI_MODELS", "model-a, model-b,");

        let config = AppConfig::from_env();
        assert_eq!(config.port, 9090);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.ai.api_key.as_deref(), Some("abc"));
        assert_eq!(config.ai.models, vec!["model-a", "model-b"]);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_unparseable_numbers_fall_back() {
        clear_env();
        env::set_var("PORT", "not-a-port");
        env::set_var("ACCESS_TOKEN_EXPIRE_MINUTES", "soon");

        let config = AppConfig::from_env();
        assert_eq!(config.port, PORT);
        assert_eq!(config.access_token_expire_minutes, ACCESS_TOKEN_EXPIRE_MINUTES);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_api_key_disables_ai() {
        clear_env();
        env::set_var("GEMINI_API_KEY", "   ");
        assert!(AppConfig::from_env().ai.api_key.is_none());
        clear_env();
    }
}
