/*
 * Responsibility
 * - 環境変数 (.env 含む) の読み込み: AUTH0_DOMAIN, API_AUDIENCE, DATABASE_URL など
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 認可パイプライン向けの AuthSettings を一度だけ組み立てる
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::services::auth::MAX_LEEWAY_SECONDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Everything the authorization pipeline needs, derived from `Config`.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Expected `iss`, exactly `https://{domain}/`.
    pub issuer: String,
    pub audience: String,
    pub jwks_url: Url,
    pub jwks_fetch_timeout: Duration,
    /// `None` fetches the key directory on every verification.
    pub jwks_cache_ttl: Option<Duration>,
    pub leeway_seconds: u64,
    pub expose_verification_errors: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub request_timeout: Duration,

    pub auth0_domain: String,
    pub api_audience: String,
    pub jwks_url: Url,
    pub jwks_fetch_timeout_seconds: u64,
    pub jwks_cache_ttl_seconds: u64,
    pub token_leeway_seconds: u64,
    pub expose_verification_errors: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            let value = lookup(key).ok_or(ConfigError::Missing(key))?;
            let value = value.trim();
            if value.is_empty() {
                return Err(ConfigError::Invalid(key));
            }
            Ok(value.to_string())
        };

        let number = |key: &'static str, default: u64| -> Result<u64, ConfigError> {
            match lookup(key) {
                Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
                None => Ok(default),
            }
        };

        let port: u16 = lookup("PORT")
            .map(|s| s.trim().parse().map_err(|_| ConfigError::Invalid("PORT")))
            .transpose()?
            .unwrap_or(8080);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = required("DATABASE_URL")?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_timeout = Duration::from_secs(number("REQUEST_TIMEOUT_SECONDS", 30)?);

        let auth0_domain = required("AUTH0_DOMAIN")?
            .trim_end_matches('/')
            .to_string();
        if auth0_domain.contains("://") || auth0_domain.contains('/') {
            return Err(ConfigError::Invalid("AUTH0_DOMAIN"));
        }

        let jwks_url = Url::parse(&format!("https://{}/.well-known/jwks.json", auth0_domain))
            .map_err(|_| ConfigError::Invalid("AUTH0_DOMAIN"))?;

        let api_audience = required("API_AUDIENCE")?;

        let jwks_fetch_timeout_seconds = number("JWKS_FETCH_TIMEOUT_SECONDS", 5)?;
        if jwks_fetch_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("JWKS_FETCH_TIMEOUT_SECONDS"));
        }
        let jwks_cache_ttl_seconds = number("JWKS_CACHE_TTL_SECONDS", 0)?;
        let token_leeway_seconds = number("TOKEN_LEEWAY_SECONDS", 0)?;
        if token_leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(ConfigError::Invalid("TOKEN_LEEWAY_SECONDS"));
        }

        let expose_verification_errors = match lookup("EXPOSE_VERIFICATION_ERRORS")
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("") | Some("false") | Some("0") => false,
            Some("true") | Some("1") => true,
            Some(_) => return Err(ConfigError::Invalid("EXPOSE_VERIFICATION_ERRORS")),
        };

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            request_timeout,
            auth0_domain,
            api_audience,
            jwks_url,
            jwks_fetch_timeout_seconds,
            jwks_cache_ttl_seconds,
            token_leeway_seconds,
            expose_verification_errors,
        })
    }

    pub fn issuer(&self) -> String {
        format!("https://{}/", self.auth0_domain)
    }

    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            issuer: self.issuer(),
            audience: self.api_audience.clone(),
            jwks_url: self.jwks_url.clone(),
            jwks_fetch_timeout: Duration::from_secs(self.jwks_fetch_timeout_seconds),
            jwks_cache_ttl: (self.jwks_cache_ttl_seconds > 0)
                .then(|| Duration::from_secs(self.jwks_cache_ttl_seconds)),
            leeway_seconds: self.token_leeway_seconds,
            expose_verification_errors: self.expose_verification_errors,
        }
    }
}
