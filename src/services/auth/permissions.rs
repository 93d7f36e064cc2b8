use crate::services::auth::{AuthorizationError, ClaimSet};

/// Assert that `claims` grants `required` (exact, case-sensitive).
///
/// A missing `permissions` claim is reported separately from an insufficient one:
/// the former is an under-scoped token (401), the latter a denial (403).
pub fn check_permission(required: &str, claims: &ClaimSet) -> Result<(), AuthorizationError> {
    let granted = claims
        .permissions()
        .ok_or(AuthorizationError::PermissionsClaimMissing)?;

    if !granted.contains(&required) {
        return Err(AuthorizationError::PermissionDenied {
            required: required.to_string(),
        });
    }

    Ok(())
}
