//! Per-request authorization pipeline.
//!
//! `ExtractingToken → Verifying → CheckingPermission → Authorized`, any stage may
//! end in a rejection. Extraction and permission errors surface as-is; verification
//! errors are collapsed to `Unauthorized` unless `expose_verification_errors` is set.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::config::AuthSettings;
use crate::services::auth::{
    AuthorizationError, ClaimSet, HttpKeySetSource, KeySetError, KeySetFetcher, KeySetSource,
    TokenVerifier, header, permissions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    ExtractingToken,
    Verifying,
    CheckingPermission,
    Authorized,
}

#[derive(Debug)]
pub struct Authorizer {
    verifier: TokenVerifier,
    expose_verification_errors: bool,
}

impl Authorizer {
    /// Production wiring: fetch keys from `settings.jwks_url`.
    pub fn new(settings: &AuthSettings) -> Result<Self, KeySetError> {
        let source = HttpKeySetSource::new(settings.jwks_url.clone(), settings.jwks_fetch_timeout)?;
        Ok(Self::with_source(settings, Arc::new(source)))
    }

    pub fn with_source(settings: &AuthSettings, source: Arc<dyn KeySetSource>) -> Self {
        let keys = KeySetFetcher::new(source, settings.jwks_cache_ttl);
        let verifier = TokenVerifier::new(
            keys,
            &settings.issuer,
            &settings.audience,
            settings.leeway_seconds,
        );

        Self {
            verifier,
            expose_verification_errors: settings.expose_verification_errors,
        }
    }

    /// Run the pipeline against request headers.
    pub async fn authorize_headers(
        &self,
        headers: &HeaderMap,
        required: &str,
    ) -> Result<ClaimSet, AuthorizationError> {
        match header::authorization_value(headers) {
            Ok(value) => self.authorize(value, required).await,
            Err(err) => Err(reject(AuthStage::ExtractingToken, required, err)),
        }
    }

    /// Run the pipeline for a raw `Authorization` value.
    ///
    /// An empty `required` permission means "authenticated only": the permission
    /// stage is skipped.
    pub async fn authorize(
        &self,
        authorization: Option<&str>,
        required: &str,
    ) -> Result<ClaimSet, AuthorizationError> {
        let token = header::bearer_token(authorization)
            .map_err(|err| reject(AuthStage::ExtractingToken, required, err))?;

        let claims = match self.verifier.verify(token).await {
            Ok(claims) => claims,
            Err(err) if self.expose_verification_errors => {
                return Err(reject(AuthStage::Verifying, required, err));
            }
            Err(err) => {
                // The fine-grained cause stays in the log only.
                tracing::warn!(
                    stage = ?AuthStage::Verifying,
                    permission = required,
                    cause = err.code(),
                    "request rejected: token verification failed"
                );
                return Err(AuthorizationError::Unauthorized);
            }
        };

        if !required.is_empty() {
            permissions::check_permission(required, &claims)
                .map_err(|err| reject(AuthStage::CheckingPermission, required, err))?;
        }

        tracing::debug!(
            stage = ?AuthStage::Authorized,
            subject = claims.subject().unwrap_or_default(),
            permission = required,
            "request authorized"
        );

        Ok(claims)
    }
}

fn reject(stage: AuthStage, required: &str, err: AuthorizationError) -> AuthorizationError {
    tracing::warn!(
        ?stage,
        permission = required,
        code = err.code(),
        status = err.status().as_u16(),
        error = %err,
        "request rejected"
    );
    err
}
