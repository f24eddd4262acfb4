// ============================================
// File: crates/deco-core/src/protocol/messages.rs
// ============================================
//! # Protocol Message Definitions
//!
//! ## Creation Reason
//! JSON shapes exchanged with the device, both the plaintext bodies that
//! get encrypted and the outer/inner response wrappers.
//!
//! ## Message Shapes
//! ```text
//! request (plaintext):  {"operation":"read","params":{...}}
//! outer response:       {"error_code":0,"data":"<base64>"}
//!                   or  {"error_code":0,"result":{...}}        (unencrypted)
//! inner response:       {"error_code":0,"result":{...}}
//! ```
//!
//! ## Last Modified
//! v0.1.0 - Initial message definitions

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::crypto::RsaPublicKey;
use crate::error::{CoreError, Result};

// ============================================
// Operations
// ============================================

/// Operation name for read-only queries.
pub const OP_READ: &str = "read";

/// Operation name for the login call.
pub const OP_LOGIN: &str = "login";

/// Operation name for rebooting nodes.
pub const OP_REBOOT: &str = "reboot";

// ============================================
// EndpointRequest
// ============================================

/// Plaintext request body: an operation plus optional parameters.
///
/// # Example
/// ```
/// use deco_core::EndpointRequest;
///
/// let body = EndpointRequest::read().to_json().unwrap();
/// assert_eq!(body, r#"{"operation":"read"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointRequest {
    /// Operation name (`read`, `login`, `reboot`, ...).
    pub operation: String,
    /// Operation parameters; omitted from the JSON when empty.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
}

impl EndpointRequest {
    /// Creates a request with no parameters.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            params: Map::new(),
        }
    }

    /// Shorthand for `{"operation":"read"}`.
    #[must_use]
    pub fn read() -> Self {
        Self::new(OP_READ)
    }

    /// Adds a parameter, builder-style.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Serializes to compact JSON.
    ///
    /// # Errors
    /// Returns `Common(Encoding)` if a parameter cannot be serialized.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| deco_common::CommonError::encoding("request body", e).into())
    }
}

// ============================================
// EndpointResponse
// ============================================

/// Decoded `{error_code, result}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointResponse {
    /// Device error code; 0 means success.
    pub error_code: i64,
    /// Endpoint-specific payload.
    #[serde(default)]
    pub result: Value,
}

impl EndpointResponse {
    /// Parses a plaintext `{error_code, result}` body.
    ///
    /// # Errors
    /// Returns `MalformedMessage` if the JSON is invalid or has no
    /// `error_code`.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body)
            .map_err(|e| CoreError::malformed(format!("response body: {e}")))
    }

    /// Returns `Ok(self)` for code 0, `Device { code }` otherwise.
    ///
    /// # Errors
    /// Returns `Device` for any non-zero code.
    pub fn into_success(self) -> Result<Self> {
        if self.error_code == 0 {
            Ok(self)
        } else {
            Err(CoreError::Device {
                code: self.error_code,
            })
        }
    }

    /// Deserializes `result` into a concrete type.
    ///
    /// # Errors
    /// Returns `MalformedMessage` if the shape doesn't match.
    pub fn decode_result<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(&self.result)
            .map_err(|e| CoreError::malformed(format!("result payload: {e}")))
    }
}

// ============================================
// WireResponse
// ============================================

/// Outer HTTP response body before decryption.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireResponse {
    /// Transport-level error code, if the device set one.
    #[serde(default)]
    pub error_code: Option<i64>,
    /// Base64 ciphertext for encrypted replies.
    #[serde(default)]
    pub data: Option<String>,
    /// Either a plaintext object or base64 ciphertext.
    #[serde(default)]
    pub result: Option<Value>,
}

impl WireResponse {
    /// Parses the outer JSON.
    ///
    /// # Errors
    /// Returns `MalformedMessage` if the body is not a JSON object.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body)
            .map_err(|e| CoreError::malformed(format!("outer response: {e}")))
    }

    /// Returns the ciphertext carried by this response, preferring
    /// `data` and falling back to a string-valued `result`.
    #[must_use]
    pub fn ciphertext(&self) -> Option<&str> {
        self.data
            .as_deref()
            .or_else(|| self.result.as_ref().and_then(Value::as_str))
    }
}

// ============================================
// Key Negotiation Results
// ============================================

/// `result` of `form=keys`.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordKeyResult {
    /// `[modulus_hex, exponent_hex]`
    pub password: Vec<String>,
}

impl PasswordKeyResult {
    /// Parses the RSA key.
    ///
    /// # Errors
    /// Returns `KeyFormat` for malformed key material.
    pub fn key(&self) -> Result<RsaPublicKey> {
        RsaPublicKey::from_wire(&self.password)
    }
}

/// `result` of `form=auth`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionKeyResult {
    /// `[modulus_hex, exponent_hex]`
    pub key: Vec<String>,
    /// Sequence baseline for the first envelope.
    pub seq: u64,
}

impl SessionKeyResult {
    /// Parses the RSA key.
    ///
    /// # Errors
    /// Returns `KeyFormat` for malformed key material.
    pub fn key(&self) -> Result<RsaPublicKey> {
        RsaPublicKey::from_wire(&self.key)
    }
}

// ============================================
// Login
// ============================================

/// `result` of the login envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResult {
    /// Session token; absent or empty on failure.
    #[serde(default)]
    pub stok: Option<String>,
}

impl LoginResult {
    /// Returns the token if it is present and non-empty.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.stok.as_deref().filter(|s| !s.is_empty())
    }
}

/// Builds the login request body around the RSA-encrypted password.
#[must_use]
pub fn login_request(encrypted_password: &str) -> EndpointRequest {
    EndpointRequest::new(OP_LOGIN).with_param("password", encrypted_password)
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_request_is_compact() {
        assert_eq!(
            EndpointRequest::read().to_json().unwrap(),
            r#"{"operation":"read"}"#
        );
    }

    #[test]
    fn test_request_with_params() {
        let body = EndpointRequest::read()
            .with_param("device_mac", "default")
            .to_json()
            .unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, json!({"operation":"read","params":{"device_mac":"default"}}));
    }

    #[test]
    fn test_response_success_and_error() {
        let ok = EndpointResponse::from_slice(br#"{"error_code":0,"result":{"a":1}}"#).unwrap();
        assert_eq!(ok.into_success().unwrap().result, json!({"a":1}));

        let err = EndpointResponse::from_slice(br#"{"error_code":-5002}"#).unwrap();
        assert_eq!(err.into_success().unwrap_err().device_code(), Some(-5002));
    }

    #[test]
    fn test_response_without_code_is_malformed() {
        let err = EndpointResponse::from_slice(br#"{"result":{}}"#).unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_wire_ciphertext_sources() {
        let with_data = WireResponse::from_slice(br#"{"data":"QUJD"}"#).unwrap();
        assert_eq!(with_data.ciphertext(), Some("QUJD"));

        let with_result = WireResponse::from_slice(br#"{"error_code":0,"result":"QUJD"}"#).unwrap();
        assert_eq!(with_result.ciphertext(), Some("QUJD"));

        let plain = WireResponse::from_slice(br#"{"error_code":0,"result":{"x":1}}"#).unwrap();
        assert_eq!(plain.ciphertext(), None);
    }

    #[test]
    fn test_login_result_token() {
        let ok: LoginResult = serde_json::from_value(json!({"stok":"abc123"})).unwrap();
        assert_eq!(ok.token(), Some("abc123"));

        let empty: LoginResult = serde_json::from_value(json!({"stok":""})).unwrap();
        assert_eq!(empty.token(), None);

        let missing: LoginResult = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.token(), None);
    }

    #[test]
    fn test_session_key_result_parses() {
        let result: SessionKeyResult = serde_json::from_value(json!({
            "key": ["c3", "010001"],
            "seq": 42
        }))
        .unwrap();
        assert_eq!(result.seq, 42);
        assert_eq!(result.key.len(), 2);
    }
}
