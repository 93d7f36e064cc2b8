#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use casting_agency::config::AuthSettings;
use casting_agency::services::auth::Authorizer;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const AUDIENCE: &str = "casting-agency";
pub const ISSUER: &str = "https://casting-agency.test/";
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

/// RSA key pair from `tests/fixtures`, with its public half as a JWK.
pub struct TestKey {
    pub kid: String,
    pub jwk: Value,
    encoding: EncodingKey,
}

impl TestKey {
    fn load(pem: &str, jwk: &str) -> Self {
        let jwk: Value = serde_json::from_str(jwk).expect("fixture jwk");
        Self {
            kid: jwk["kid"].as_str().expect("fixture kid").to_string(),
            encoding: EncodingKey::from_rsa_pem(pem.as_bytes()).expect("fixture pem"),
            jwk,
        }
    }

    pub fn primary() -> Self {
        Self::load(
            include_str!("../fixtures/primary_rsa.pem"),
            include_str!("../fixtures/primary_jwk.json"),
        )
    }

    /// A key the test issuer never publishes.
    pub fn rogue() -> Self {
        Self::load(
            include_str!("../fixtures/rogue_rsa.pem"),
            include_str!("../fixtures/rogue_jwk.json"),
        )
    }

    pub fn sign(&self, claims: &Value) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.kid.clone());
        self.sign_with_header(&header, claims)
    }

    pub fn sign_with_header(&self, header: &Header, claims: &Value) -> String {
        jsonwebtoken::encode(header, claims, &self.encoding).expect("sign token")
    }
}

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_secs()
}

/// Valid, unexpired claims for the test audience and issuer.
pub fn claims_with(permissions: &[&str]) -> Value {
    let now = now();
    json!({
        "iss": ISSUER,
        "sub": "auth0|casting-director",
        "aud": [AUDIENCE, "https://casting-agency.test/userinfo"],
        "iat": now,
        "exp": now + 3600,
        "permissions": permissions,
    })
}

/// Mock identity provider publishing the primary key's JWKS.
pub struct TestIssuer {
    pub server: MockServer,
    pub key: TestKey,
}

impl TestIssuer {
    pub async fn start() -> Self {
        let key = TestKey::primary();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "keys": [key.jwk] })))
            .mount(&server)
            .await;

        Self { server, key }
    }

    pub fn jwks_url(&self) -> Url {
        jwks_url(&self.server)
    }

    pub fn settings(&self) -> AuthSettings {
        settings_for(self.jwks_url())
    }

    pub fn authorizer(&self) -> Arc<Authorizer> {
        self.authorizer_with(|_| {})
    }

    pub fn authorizer_with(&self, tweak: impl FnOnce(&mut AuthSettings)) -> Arc<Authorizer> {
        let mut settings = self.settings();
        tweak(&mut settings);
        Arc::new(Authorizer::new(&settings).expect("authorizer"))
    }

    pub fn token(&self, permissions: &[&str]) -> String {
        self.key.sign(&claims_with(permissions))
    }
}

pub fn jwks_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}{}", server.uri(), JWKS_PATH)).expect("jwks url")
}

pub fn settings_for(jwks_url: Url) -> AuthSettings {
    AuthSettings {
        issuer: ISSUER.to_string(),
        audience: AUDIENCE.to_string(),
        jwks_url,
        jwks_fetch_timeout: Duration::from_secs(2),
        jwks_cache_ttl: None,
        leeway_seconds: 0,
        expose_verification_errors: false,
    }
}
