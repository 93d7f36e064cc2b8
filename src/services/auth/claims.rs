use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded token payload.
///
/// Only produced by `TokenVerifier` after signature, `exp`, `aud` and `iss`
/// validation succeed. Unknown claims are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// Entries of the `permissions` claim, in token order.
    ///
    /// `None` when the claim is absent or not an array; non-string entries are ignored.
    pub fn permissions(&self) -> Option<Vec<&str>> {
        self.get("permissions")?
            .as_array()
            .map(|entries| entries.iter().filter_map(Value::as_str).collect())
    }
}
