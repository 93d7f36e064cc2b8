use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};

use crate::services::auth::{AuthorizationError, ClaimSet, KeySetFetcher};

/// Upper bound on the `exp` clock-skew allowance.
pub const MAX_LEEWAY_SECONDS: u64 = 300;

/// RS256 access-token verifier backed by the issuer's key directory.
///
/// `jsonwebtoken::Validation` checks:
/// - signature with the key named by the token's `kid`
/// - `exp` (with the configured leeway)
/// - `iss` equals the configured issuer, `aud` contains the configured audience
pub struct TokenVerifier {
    keys: KeySetFetcher,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("keys", &self.keys)
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(keys: KeySetFetcher, issuer: &str, audience: &str, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = leeway_seconds.min(MAX_LEEWAY_SECONDS);

        Self { keys, validation }
    }

    pub async fn verify(&self, token: &str) -> Result<ClaimSet, AuthorizationError> {
        let header = jsonwebtoken::decode_header(token).map_err(|err| {
            tracing::debug!(error = %err, "token header is not decodable");
            AuthorizationError::TokenUnparseable
        })?;

        let key_id = header
            .kid
            .ok_or(AuthorizationError::MalformedHeader("Authorization malformed."))?;

        let key = match self.keys.find(&key_id).await {
            Ok(Some(key)) => key,
            Ok(None) => return Err(AuthorizationError::SigningKeyNotFound),
            // An unreachable directory resolves no key either.
            Err(err) => {
                let cause = AuthorizationError::from(err);
                tracing::warn!(
                    key_id = %key_id,
                    cause = cause.code(),
                    "signing key could not be resolved"
                );
                return Err(AuthorizationError::SigningKeyNotFound);
            }
        };

        let decoding_key = DecodingKey::from_rsa_components(&key.modulus, &key.exponent)
            .map_err(|err| {
                tracing::warn!(key_id = %key.key_id, error = %err, "unusable signing key");
                AuthorizationError::TokenUnparseable
            })?;

        let data = jsonwebtoken::decode::<ClaimSet>(token, &decoding_key, &self.validation)
            .map_err(|err| classify(&err))?;

        Ok(data.claims)
    }
}

fn classify(err: &jsonwebtoken::errors::Error) -> AuthorizationError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthorizationError::TokenExpired,
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthorizationError::InvalidClaims,
        ErrorKind::MissingRequiredClaim(claim) if claim == "aud" || claim == "iss" => {
            AuthorizationError::InvalidClaims
        }
        _ => AuthorizationError::TokenUnparseable,
    }
}
