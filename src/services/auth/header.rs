/*
 * Responsibility
 * - Authorization ヘッダから Bearer トークンを取り出す
 * - scheme は大文字小文字を区別しない / トークン本体はそのまま返す
 */
use axum::http::{HeaderMap, header};

use crate::services::auth::AuthorizationError;

/// Read the raw `Authorization` value.
///
/// Absent → `Ok(None)`. A value that is not visible ASCII cannot carry a
/// bearer token, so it is rejected as malformed rather than treated as absent.
pub fn authorization_value(headers: &HeaderMap) -> Result<Option<&str>, AuthorizationError> {
    headers
        .get(header::AUTHORIZATION)
        .map(|v| {
            v.to_str()
                .map_err(|_| AuthorizationError::MalformedHeader("Authorization header is not valid text."))
        })
        .transpose()
}

/// Split `Bearer <token>` and return `<token>` verbatim.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthorizationError> {
    let header = header
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or(AuthorizationError::AuthorizationHeaderMissing)?;

    let mut parts = header.split_whitespace();

    let Some(scheme) = parts.next() else {
        return Err(AuthorizationError::AuthorizationHeaderMissing);
    };
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthorizationError::InvalidHeaderScheme);
    }

    let token = parts.next().ok_or(AuthorizationError::TokenMissing)?;

    if parts.next().is_some() {
        return Err(AuthorizationError::MalformedHeader(
            "Authorization header must be bearer token.",
        ));
    }

    Ok(token)
}
