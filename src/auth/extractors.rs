use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::{jwt::JwtKeys, policy::Role},
    error::ApiError,
    state::AppState,
};

/// The authenticated identity for one request: subject id plus the
/// role claimed by the verified token. Handlers that need profile data
/// rehydrate the full `User` record from the store themselves.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthenticated("Missing token"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthenticated("Missing token"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::Unauthenticated("Invalid token")
        })?;

        // A token for a deleted account is no longer valid.
        if state.users.find_by_id(claims.sub).await?.is_none() {
            warn!(user_id = %claims.sub, "token subject no longer exists");
            return Err(ApiError::Unauthenticated("Invalid token"));
        }

        Ok(Principal {
            id: claims.sub,
            role: claims.role,
        })
    }
}
