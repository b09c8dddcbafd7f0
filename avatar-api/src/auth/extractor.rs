use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{domain::models::UserId, routes::ApiError};

/// Extracts the authenticated [`UserId`] placed on the request by
/// [`resolve_identity`](super::resolve_identity). Returns 401 Unauthorized if
/// there is none.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: UserId,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserId>()
            .copied()
            .map(|id| AuthUser { id })
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
    }
}
