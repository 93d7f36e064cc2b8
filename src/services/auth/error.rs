/*
 * Responsibility
 * - 認可パイプラインの失敗を 1 つの型で表す (AuthorizationError)
 * - 各 variant は安定した code / description / HTTP status (400/401/403) を持つ
 * - HTTP へのレンダリングは crate::error::AppError 側で行う
 */
use axum::http::StatusCode;
use thiserror::Error;

use crate::services::auth::jwks::KeySetError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("authorization header missing")]
    AuthorizationHeaderMissing,
    #[error("authorization header does not use the bearer scheme")]
    InvalidHeaderScheme,
    #[error("bearer token missing")]
    TokenMissing,
    #[error("malformed authorization: {0}")]
    MalformedHeader(&'static str),
    #[error("signing key directory unavailable")]
    KeyDirectoryUnavailable,
    #[error("no signing key matches the token key id")]
    SigningKeyNotFound,
    #[error("token expired")]
    TokenExpired,
    #[error("audience or issuer claim mismatch")]
    InvalidClaims,
    #[error("token could not be decoded or verified")]
    TokenUnparseable,
    #[error("permissions claim missing")]
    PermissionsClaimMissing,
    #[error("permission `{required}` not granted")]
    PermissionDenied { required: String },
    /// Collapsed outcome for any verification-stage failure.
    #[error("unauthorized")]
    Unauthorized,
}

impl AuthorizationError {
    /// Stable machine-readable name rendered as the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthorizationHeaderMissing => "authorization_header_missing",
            Self::InvalidHeaderScheme => "invalid_header_scheme",
            Self::TokenMissing => "token_missing",
            Self::MalformedHeader(_) => "malformed_header",
            Self::KeyDirectoryUnavailable => "key_directory_unavailable",
            Self::SigningKeyNotFound => "signing_key_not_found",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims => "invalid_claims",
            Self::TokenUnparseable => "token_unparseable",
            Self::PermissionsClaimMissing => "permissions_claim_missing",
            Self::PermissionDenied { .. } => "permission_denied",
            Self::Unauthorized => "unauthorized",
        }
    }

    /// Human-readable text rendered as the `description` field.
    pub fn description(&self) -> &'static str {
        match self {
            Self::AuthorizationHeaderMissing => "Authorization header is expected.",
            Self::InvalidHeaderScheme => "Authorization header must start with \"Bearer\".",
            Self::TokenMissing => "Token not found.",
            Self::MalformedHeader(detail) => detail,
            Self::KeyDirectoryUnavailable => "Unable to fetch the signing key directory.",
            Self::SigningKeyNotFound => "Unable to find the appropriate key.",
            Self::TokenExpired => "Token expired.",
            Self::InvalidClaims => "Incorrect claims. Please, check the audience and issuer.",
            Self::TokenUnparseable => "Unable to parse authentication token.",
            Self::PermissionsClaimMissing => "Permissions not included in JWT.",
            Self::PermissionDenied { .. } => "Permission not found.",
            Self::Unauthorized => "Unable to verify the bearer token.",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::KeyDirectoryUnavailable
            | Self::SigningKeyNotFound
            | Self::TokenUnparseable => StatusCode::BAD_REQUEST,
            Self::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            Self::AuthorizationHeaderMissing
            | Self::InvalidHeaderScheme
            | Self::TokenMissing
            | Self::MalformedHeader(_)
            | Self::TokenExpired
            | Self::InvalidClaims
            | Self::PermissionsClaimMissing
            | Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<KeySetError> for AuthorizationError {
    fn from(_: KeySetError) -> Self {
        Self::KeyDirectoryUnavailable
    }
}
