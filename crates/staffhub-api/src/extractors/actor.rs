//! `Actor` extractor: reads the caller identity forwarded by the gateway.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use staffhub_core::error::AppError;
use staffhub_core::types::UserId;
use staffhub_entity::user::UserRole;
use staffhub_service::RequestContext;

use crate::error::ApiError;

/// Header carrying the caller's user ID.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The identified caller, available in handlers.
#[derive(Debug, Clone)]
pub struct Actor(pub RequestContext);

impl std::ops::Deref for Actor {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let user_id: UserId = header(USER_ID_HEADER)
            .ok_or_else(|| AppError::authentication("Missing x-user-id header"))?
            .parse()
            .map_err(|_| AppError::authentication("Invalid x-user-id header"))?;

        let role: UserRole = header(USER_ROLE_HEADER)
            .ok_or_else(|| AppError::authentication("Missing x-user-role header"))?
            .parse()
            .map_err(|_| AppError::authentication("Invalid x-user-role header"))?;

        Ok(Actor(RequestContext::new(user_id, role)))
    }
}
