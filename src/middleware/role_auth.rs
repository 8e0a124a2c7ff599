use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::models::user::UserRole;

/// Admits only callers whose token carries `required_role`.
/// Must be wrapped inside `AuthMiddleware` so the claims are present.
pub struct RequireRole {
    required_role: UserRole,
}

impl RequireRole {
    pub fn new(role: UserRole) -> Self {
        RequireRole {
            required_role: role,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequireRoleService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleService {
            service,
            required_role: self.required_role,
        }))
    }
}

pub struct RequireRoleService<S> {
    service: S,
    required_role: UserRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let role = req
            .extensions()
            .get::<Claims>()
            .map(|claims| UserRole::from_claim(&claims.role));

        match role {
            Some(role) if role == self.required_role => Box::pin(self.service.call(req)),
            Some(role) => {
                log::debug!(
                    "Role check failed: required {}, token has {}",
                    self.required_role,
                    role
                );
                Box::pin(ready(Err(ApiError::forbidden(format!(
                    "Only {}s can access this endpoint",
                    self.required_role
                ))
                .into())))
            }
            None => Box::pin(ready(Err(ApiError::unauthorized("Not authenticated").into()))),
        }
    }
}
