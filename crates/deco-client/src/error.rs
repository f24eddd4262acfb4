// ============================================
// File: crates/deco-client/src/error.rs
// ============================================
//! # Client Error Types
//!
//! ## Creation Reason
//! One error type for everything a caller of `DecoClient` can see.
//! Lower-level errors are folded into the categories callers act on.
//!
//! ## Error Categories
//! 1. **Configuration**: bad config file or values
//! 2. **Network**: transport failure or timeout (never retried here)
//! 3. **Key negotiation**: malformed RSA key material
//! 4. **Crypto**: AES/RSA failures
//! 5. **Protocol**: device returned a non-zero `error_code`
//! 6. **Session**: authentication failed, not authenticated, cancelled,
//!    sequence counter exhausted
//! 7. **Decode**: malformed JSON or base64
//!
//! ## ⚠️ Important Note for Next Developer
//! - Never put the password, token or key material in an error message
//! - `Cancelled` means the outcome on the device is unknown
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use deco_common::CommonError;
use deco_core::CoreError;
use deco_transport::TransportError;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client error types.
#[derive(Error, Debug)]
pub enum ClientError {
    // ========================================
    // Configuration Errors
    // ========================================

    /// Config file could not be read or parsed.
    #[error("Failed to load configuration from '{path}': {reason}")]
    ConfigLoad {
        /// Config file path
        path: String,
        /// Why loading failed
        reason: String,
    },

    /// A config value is out of range.
    #[error("Invalid configuration: {field} - {reason}")]
    ConfigInvalid {
        /// Dotted field name
        field: String,
        /// Why the value is invalid
        reason: String,
    },

    /// Caller-supplied argument is invalid (MAC, JSON body, ...).
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput {
        /// Argument name
        field: String,
        /// Why it is invalid
        reason: String,
    },

    // ========================================
    // Wire Errors
    // ========================================

    /// Transport failure or timeout.
    #[error("Network error: {0}")]
    Network(#[from] TransportError),

    /// The device sent RSA key material we could not use.
    #[error("Key negotiation failed: {reason}")]
    KeyFormat {
        /// What was wrong
        reason: String,
    },

    /// AES or RSA failure.
    #[error("Crypto error: {reason}")]
    Crypto {
        /// What failed
        reason: String,
    },

    /// Device reported a non-zero `error_code`.
    #[error("Device returned error code {code}")]
    Protocol {
        /// The device error code
        code: i64,
    },

    /// Malformed JSON, base64 or UTF-8 in a response.
    #[error("Failed to decode response: {reason}")]
    Decode {
        /// What was malformed
        reason: String,
    },

    // ========================================
    // Session Errors
    // ========================================

    /// Login was rejected or returned no session token.
    #[error("Authentication failed: {reason}")]
    Authentication {
        /// Why login failed
        reason: String,
    },

    /// An authenticated call was made before `authenticate`.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The caller cancelled the request; the device may or may not have
    /// processed it.
    #[error("Request cancelled")]
    Cancelled,

    /// The sequence counter cannot advance any further.
    #[error("Sequence counter exhausted at {sequence}")]
    SequenceExhausted {
        /// Counter value at the failed send
        sequence: u64,
    },
}

impl ClientError {
    /// Creates a `ConfigLoad` error.
    pub fn config_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `ConfigInvalid` error.
    pub fn config_invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidInput` error.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `KeyFormat` error.
    pub fn key_format(reason: impl Into<String>) -> Self {
        Self::KeyFormat {
            reason: reason.into(),
        }
    }

    /// Creates an `Authentication` error.
    pub fn authentication(reason: impl Into<String>) -> Self {
        Self::Authentication {
            reason: reason.into(),
        }
    }

    /// Creates a `Decode` error.
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` for configuration errors.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigLoad { .. } | Self::ConfigInvalid { .. })
    }

    /// Returns the device error code, if any.
    #[must_use]
    pub const fn protocol_code(&self) -> Option<i64> {
        match self {
            Self::Protocol { code } => Some(*code),
            _ => None,
        }
    }

    /// Returns `true` if the session must be re-established with
    /// `authenticate` before further calls can succeed.
    ///
    /// A cancelled send has consumed a sequence value the device may
    /// never have seen, so it counts.
    #[must_use]
    pub const fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated
                | Self::Authentication { .. }
                | Self::Cancelled
                | Self::SequenceExhausted { .. }
        )
    }

    /// Returns `true` if a fresh attempt could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::KeyFormat { reason } => Self::KeyFormat { reason },
            CoreError::Encryption { context } | CoreError::Decryption { context } => {
                Self::Crypto { reason: context }
            }
            CoreError::MalformedMessage { reason } => Self::Decode { reason },
            CoreError::Device { code } => Self::Protocol { code },
            CoreError::SequenceOverflow { sequence } => Self::SequenceExhausted { sequence },
            CoreError::Common(common) => common.into(),
        }
    }
}

impl From<CommonError> for ClientError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::InvalidInput { field, reason } => Self::InvalidInput { field, reason },
            CommonError::Encoding { context, details } => Self::InvalidInput {
                field: context,
                reason: details,
            },
            CommonError::Decoding { context, details } => Self::Decode {
                reason: format!("{context}: {details}"),
            },
        }
    }
}
