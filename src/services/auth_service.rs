use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::AppConfig;
use crate::middleware::auth::Claims;
use crate::models::user::User;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    bcrypt::verify(password, hashed).unwrap_or(false)
}

pub fn create_access_token(
    user: &User,
    config: &AppConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::minutes(config.access_token_expire_minutes)).timestamp() as usize,
    };

    let header = Header::new(Algorithm::HS256);
    encode(&header, &claims, &EncodingKey::from_secret(config.jwt_secret.as_ref()))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "iat", "sub"]);

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    fn user() -> User {
        User {
            id: 42,
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password: String::new(),
            role: UserRole::Mechanic,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_round_trip() {
        let hashed = hash_password("hunter22").unwrap();
        assert_ne!(hashed, "hunter22");
        assert!(verify_password("hunter22", &hashed));
        assert!(!verify_password("hunter23", &hashed));
        assert!(!verify_password("hunter22", "not-a-hash"));
    }

    #[test]
    fn test_token_carries_user_claims() {
        let config = AppConfig::for_testing();
        let token = create_access_token(&user(), &config).unwrap();
        let claims = decode_token(&token, &config.jwt_secret).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "asha@example.com");
        assert_eq!(claims.role, "mechanic");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let config = AppConfig::for_testing();
        let token = create_access_token(&user(), &config).unwrap();
        assert!(decode_token(&token, "some-other-secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut config = AppConfig::for_testing();
        config.access_token_expire_minutes = -10;
        let token = create_access_token(&user(), &config).unwrap();
        assert!(decode_token(&token, &config.jwt_secret).is_err());
    }
}
