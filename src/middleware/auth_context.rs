use std::future::{ready, Ready};

use actix_web::{dev::Payload, Error, FromRequest, HttpMessage, HttpRequest};

use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::models::user::UserRole;

/// Caller identity taken from the claims `AuthMiddleware` validated.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn require_role(&self, role: UserRole, message: &str) -> Result<(), ApiError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ApiError::forbidden(message))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<Claims>().and_then(|claims| {
            let user_id = claims.sub.parse::<i64>().ok()?;
            Some(AuthenticatedUser {
                user_id,
                role: UserRole::from_claim(&claims.role),
            })
        });

        match user {
            Some(user) => ready(Ok(user)),
            None => ready(Err(ApiError::invalid_credentials().into())),
        }
    }
}
