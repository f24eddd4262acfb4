// ============================================
// File: crates/deco-core/src/error.rs
// ============================================
//! # Core Error Types
//!
//! ## Creation Reason
//! Error types for key parsing, envelope crypto and wire decoding.
//!
//! ## Error Categories
//! 1. **Key Errors**: malformed RSA material from the device
//! 2. **Crypto Errors**: AES/RSA encrypt or decrypt failures, counter overflow
//! 3. **Decode Errors**: malformed JSON or base64
//! 4. **Device Errors**: non-zero `error_code` in a well-formed reply
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER include key material, passwords or plaintext in messages
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use deco_common::error::CommonError;

// ============================================
// Result Type Alias
// ============================================

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

// ============================================
// CoreError
// ============================================

/// Core error types for protocol and cryptographic operations.
#[derive(Error, Debug)]
pub enum CoreError {
    // ========================================
    // Key Errors
    // ========================================

    /// RSA key material from the device could not be parsed.
    #[error("Malformed RSA key: {reason}")]
    KeyFormat {
        /// What's wrong with the key
        reason: String,
    },

    // ========================================
    // Cryptographic Errors
    // ========================================

    /// Encryption operation failed.
    #[error("Encryption failed: {context}")]
    Encryption {
        /// What was being encrypted
        context: String,
    },

    /// Decryption operation failed.
    #[error("Decryption failed: {context}")]
    Decryption {
        /// What was being decrypted
        context: String,
    },

    /// The signed sequence value does not fit in a `u64`.
    #[error("Sequence {sequence} overflows the signed counter")]
    SequenceOverflow {
        /// Sequence value of the envelope being sealed
        sequence: u64,
    },

    // ========================================
    // Decode Errors
    // ========================================

    /// Message is malformed (bad JSON shape, bad base64, bad UTF-8).
    #[error("Malformed message: {reason}")]
    MalformedMessage {
        /// What's wrong with the message
        reason: String,
    },

    /// The device answered with a non-zero error code.
    #[error("Device returned error code {code}")]
    Device {
        /// The `error_code` field
        code: i64,
    },

    // ========================================
    // Wrapped Errors
    // ========================================

    /// Error from common crate.
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl CoreError {
    /// Creates a `KeyFormat` error.
    pub fn key_format(reason: impl Into<String>) -> Self {
        Self::KeyFormat {
            reason: reason.into(),
        }
    }

    /// Creates an `Encryption` error.
    pub fn encryption(context: impl Into<String>) -> Self {
        Self::Encryption {
            context: context.into(),
        }
    }

    /// Creates a `Decryption` error.
    pub fn decryption(context: impl Into<String>) -> Self {
        Self::Decryption {
            context: context.into(),
        }
    }

    /// Creates a `MalformedMessage` error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            reason: reason.into(),
        }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` if this is an AES/RSA failure.
    #[must_use]
    pub const fn is_crypto_error(&self) -> bool {
        matches!(self, Self::Encryption { .. } | Self::Decryption { .. })
    }

    /// Returns `true` if the bytes we received could not be decoded.
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedMessage { .. } | Self::Common(CommonError::Decoding { .. })
        )
    }

    /// Returns the device error code, if this is a device error.
    #[must_use]
    pub const fn device_code(&self) -> Option<i64> {
        match self {
            Self::Device { code } => Some(*code),
            _ => None,
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::Device { code: -5002 };
        assert!(err.to_string().contains("-5002"));

        let err = CoreError::key_format("modulus is not hex");
        assert!(err.to_string().contains("modulus"));
    }

    #[test]
    fn test_error_classification() {
        assert!(CoreError::decryption("aes").is_crypto_error());
        assert!(!CoreError::decryption("aes").is_decode_error());

        assert!(CoreError::malformed("bad json").is_decode_error());
        assert!(CoreError::Common(CommonError::decoding("base64", "x")).is_decode_error());

        assert_eq!(CoreError::Device { code: -1 }.device_code(), Some(-1));
        assert_eq!(CoreError::malformed("x").device_code(), None);
    }

    #[test]
    fn test_common_error_conversion() {
        let common = CommonError::invalid_input("field", "bad value");
        let core: CoreError = common.into();
        assert!(matches!(core, CoreError::Common(_)));
    }
}
