//! Language-model API key handling
//!
//! The key is read from `llm.api_key` (or `MEDANON_LLM_API_KEY`) into a
//! [`SecretString`]. It stays wrapped until [`GeminiClient`] builds a request
//! URL, and the backing buffer is zeroed when the last copy is dropped.
//!
//! Serializing a config never writes the key; it comes out as `"[REDACTED]"`.
//!
//! ```rust
//! use medanon::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let api_key = secret_string("AIza-example".to_string());
//! assert_eq!(api_key.expose_secret().as_ref(), "AIza-example");
//! assert!(!format!("{api_key:?}").contains("AIza"));
//! ```
//!
//! [`GeminiClient`]: crate::adapters::llm::GeminiClient

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Serialized stand-in for a secret value
const REDACTED: &str = "[REDACTED]";

/// Key material, zeroed on drop
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Whether the key is empty (e.g. `MEDANON_LLM_API_KEY=""`)
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Secret API key
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[derive(Serialize, Deserialize)]
    struct Llm {
        api_key: SecretString,
    }

    #[test]
    fn test_expose_returns_key() {
        let secret = secret_string("gemini-key".to_string());
        assert_eq!(secret.expose_secret().as_ref(), "gemini-key");
    }

    #[test]
    fn test_debug_redacted() {
        let secret = secret_string("AIza-sensitive".to_string());
        assert!(!format!("{secret:?}").contains("AIza-sensitive"));
    }

    #[test]
    fn test_blank_key_is_empty() {
        assert!(secret_string("  ".to_string()).expose_secret().is_empty());
        assert!(!secret_string("k".to_string()).expose_secret().is_empty());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let llm: Llm = toml::from_str("api_key = \"AIza-123\"").unwrap();
        assert_eq!(llm.api_key.expose_secret().as_ref(), "AIza-123");
    }

    #[test]
    fn test_serialize_never_writes_key() {
        let llm = Llm {
            api_key: secret_string("AIza-123".to_string()),
        };
        let json = serde_json::to_string(&llm).unwrap();
        assert_eq!(json, r#"{"api_key":"[REDACTED]"}"#);
    }
}
