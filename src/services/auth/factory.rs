//! Factory: build `Authorizer` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{Authorizer, KeySetError};

pub fn build_authorizer(config: &Config) -> Result<Arc<Authorizer>, KeySetError> {
    let settings = config.auth_settings();

    tracing::info!(
        issuer = %settings.issuer,
        audience = %settings.audience,
        jwks_url = %settings.jwks_url,
        cache_ttl = ?settings.jwks_cache_ttl,
        "configuring token authorization"
    );

    Ok(Arc::new(Authorizer::new(&settings)?))
}
