//! Signing-key directory (JWKS) retrieval.
//!
//! - `KeySetSource` fetches the current key set (HTTP in production, in-memory in tests).
//! - `KeySetFetcher` wraps a source with an optional TTL cache. Without a TTL every lookup
//!   fetches the directory. With a TTL, a key-id miss on a cached set forces one re-fetch
//!   so rotated keys are picked up immediately.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::{
    sync::{Mutex, RwLock},
    time::Instant,
};
use url::Url;

#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("key directory request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("key directory request timed out after {0:?}")]
    Timeout(Duration),
    #[error("key directory responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed key directory: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A public signing key published in the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKey {
    pub key_id: String,
    pub key_type: String,
    pub usage: Option<String>,
    /// Base64url-encoded RSA modulus (`n`).
    pub modulus: String,
    /// Base64url-encoded RSA exponent (`e`).
    pub exponent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: Vec<SigningKey>,
}

#[derive(Deserialize)]
struct JwksDocument {
    keys: Vec<RawJwk>,
}

#[derive(Deserialize)]
struct RawJwk {
    kid: Option<String>,
    kty: Option<String>,
    #[serde(rename = "use")]
    usage: Option<String>,
    n: Option<String>,
    e: Option<String>,
}

impl RawJwk {
    // Entries that cannot verify an RS256 signature are skipped.
    fn into_signing_key(self) -> Option<SigningKey> {
        let key_type = self.kty?;
        if key_type != "RSA" {
            return None;
        }

        Some(SigningKey {
            key_id: self.kid?,
            key_type,
            usage: self.usage,
            modulus: self.n?,
            exponent: self.e?,
        })
    }
}

impl KeySet {
    pub fn new(keys: Vec<SigningKey>) -> Self {
        Self { keys }
    }

    /// Parse a `{"keys": [...]}` document.
    pub fn from_slice(body: &[u8]) -> Result<Self, KeySetError> {
        let doc: JwksDocument = serde_json::from_slice(body)?;
        Ok(Self {
            keys: doc
                .keys
                .into_iter()
                .filter_map(RawJwk::into_signing_key)
                .collect(),
        })
    }

    pub fn find(&self, key_id: &str) -> Option<&SigningKey> {
        self.keys.iter().find(|k| k.key_id == key_id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[async_trait]
pub trait KeySetSource: Send + Sync {
    async fn fetch(&self) -> Result<KeySet, KeySetError>;
}

/// Fetches the directory over HTTP with a bounded deadline.
///
/// Dropping the returned future (e.g. client disconnect) aborts the in-flight request.
#[derive(Clone, Debug)]
pub struct HttpKeySetSource {
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl HttpKeySetSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, KeySetError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(KeySetError::Transport)?;

        Ok(Self {
            client,
            url,
            timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> KeySetError {
        if err.is_timeout() {
            KeySetError::Timeout(self.timeout)
        } else {
            KeySetError::Transport(err)
        }
    }
}

#[async_trait]
impl KeySetSource for HttpKeySetSource {
    async fn fetch(&self) -> Result<KeySet, KeySetError> {
        tracing::debug!(url = %self.url, "fetching signing key directory");

        let response = self
            .client
            .get(self.url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            return Err(KeySetError::Status(response.status()));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        let keys = KeySet::from_slice(&body)?;
        if keys.is_empty() {
            tracing::warn!(url = %self.url, "key directory lists no usable RS256 keys");
        }
        Ok(keys)
    }
}

struct CachedKeySet {
    keys: Arc<KeySet>,
    fetched_at: Instant,
    generation: u64,
}

pub struct KeySetFetcher {
    source: Arc<dyn KeySetSource>,
    ttl: Option<Duration>,
    cached: RwLock<Option<CachedKeySet>>,
    // Serializes refreshes: at most one fetch in flight per fetcher.
    refresh: Mutex<()>,
}

impl std::fmt::Debug for KeySetFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySetFetcher")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl KeySetFetcher {
    /// `ttl` of `None` (or zero) disables caching.
    pub fn new(source: Arc<dyn KeySetSource>, ttl: Option<Duration>) -> Self {
        Self {
            source,
            ttl: ttl.filter(|t| !t.is_zero()),
            cached: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// Resolve `key_id` against the current set.
    ///
    /// `Ok(None)` means the directory was reachable but has no such key.
    pub async fn find(&self, key_id: &str) -> Result<Option<SigningKey>, KeySetError> {
        let Some(ttl) = self.ttl else {
            let keys = self.fetch_uncached().await?;
            return Ok(keys.find(key_id).cloned());
        };

        let (keys, seen) = match self.fresh_snapshot(ttl).await {
            Some((keys, generation)) => (keys, Some(generation)),
            None => (self.refresh(ttl, None).await?, None),
        };

        if let Some(key) = keys.find(key_id) {
            return Ok(Some(key.clone()));
        }

        // Only a cached set can be stale with respect to rotation.
        let Some(generation) = seen else {
            return Ok(None);
        };

        tracing::debug!(key_id, "key id not cached; refreshing key directory");
        let keys = self.refresh(ttl, Some(generation)).await?;
        Ok(keys.find(key_id).cloned())
    }

    async fn fetch_uncached(&self) -> Result<Arc<KeySet>, KeySetError> {
        match self.source.fetch().await {
            Ok(keys) => Ok(Arc::new(keys)),
            Err(err) => {
                tracing::warn!(error = %err, "signing key directory unavailable");
                Err(err)
            }
        }
    }

    async fn fresh_snapshot(&self, ttl: Duration) -> Option<(Arc<KeySet>, u64)> {
        let cached = self.cached.read().await;
        cached
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < ttl)
            .map(|c| (c.keys.clone(), c.generation))
    }

    /// Refresh the cache. `stale` names the generation the caller found lacking;
    /// if another caller replaced it while we waited, that result is reused.
    async fn refresh(&self, ttl: Duration, stale: Option<u64>) -> Result<Arc<KeySet>, KeySetError> {
        let _guard = self.refresh.lock().await;

        if let Some((keys, generation)) = self.fresh_snapshot(ttl).await
            && stale.is_none_or(|g| g != generation)
        {
            return Ok(keys);
        }

        let keys = self.fetch_uncached().await?;

        let mut cached = self.cached.write().await;
        let generation = cached.as_ref().map_or(0, |c| c.generation + 1);
        *cached = Some(CachedKeySet {
            keys: keys.clone(),
            fetched_at: Instant::now(),
            generation,
        });
        tracing::debug!(keys = keys.len(), generation, "signing key directory cached");

        Ok(keys)
    }
}
