pub mod authorizer;
pub mod claims;
pub mod error;
pub mod factory;
pub mod header;
pub mod jwks;
pub mod permissions;
pub mod verifier;

pub use authorizer::{AuthStage, Authorizer};
pub use claims::ClaimSet;
pub use error::AuthorizationError;
pub use factory::build_authorizer;
pub use jwks::{HttpKeySetSource, KeySet, KeySetError, KeySetFetcher, KeySetSource, SigningKey};
pub use verifier::{MAX_LEEWAY_SECONDS, TokenVerifier};
