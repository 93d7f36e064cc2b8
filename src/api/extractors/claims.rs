use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::{AuthorizationError, ClaimSet};

/// Handler で、検証済みの ClaimSet を受け取るための extractor
/// `RequirePermissionLayer` が ClaimSet を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（layer が掛かっていない）
pub struct Claims(pub ClaimSet);

impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ClaimSet>()
            .cloned()
            .map(Claims)
            .ok_or(AppError::Auth(AuthorizationError::Unauthorized))
    }
}
