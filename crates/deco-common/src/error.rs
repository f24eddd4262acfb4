// ============================================
// File: crates/deco-common/src/error.rs
// ============================================
//! # Common Error Types
//!
//! ## Creation Reason
//! Base error type for validation and encoding failures that are not
//! specific to crypto, transport or session handling.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Never include passwords or tokens in error messages
//! - Crate-level errors wrap `CommonError` with `#[from]`
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

// ============================================
// Result Type Alias
// ============================================

/// Common result type for operations that may fail.
pub type Result<T> = std::result::Result<T, CommonError>;

// ============================================
// CommonError
// ============================================

/// Common error types shared across Deco crates.
///
/// # Example
/// ```
/// use deco_common::error::{CommonError, Result};
///
/// fn require_host(host: &str) -> Result<()> {
///     if host.is_empty() {
///         return Err(CommonError::invalid_input("host", "cannot be empty"));
///     }
///     Ok(())
/// }
///
/// assert!(require_host("").is_err());
/// ```
#[derive(Error, Debug)]
pub enum CommonError {
    // ========================================
    // Validation Errors
    // ========================================

    /// Invalid input data provided.
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput {
        /// Name of the field or parameter
        field: String,
        /// Description of what's wrong
        reason: String,
    },

    // ========================================
    // Encoding Errors
    // ========================================

    /// Failed to encode/serialize data.
    #[error("Encoding error: {context}: {details}")]
    Encoding {
        /// What was being encoded
        context: String,
        /// Error details
        details: String,
    },

    /// Failed to decode/deserialize data.
    #[error("Decoding error: {context}: {details}")]
    Decoding {
        /// What was being decoded
        context: String,
        /// Error details
        details: String,
    },
}

impl CommonError {
    /// Creates an `InvalidInput` error.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an `Encoding` error.
    pub fn encoding(context: impl Into<String>, details: impl ToString) -> Self {
        Self::Encoding {
            context: context.into(),
            details: details.to_string(),
        }
    }

    /// Creates a `Decoding` error.
    pub fn decoding(context: impl Into<String>, details: impl ToString) -> Self {
        Self::Decoding {
            context: context.into(),
            details: details.to_string(),
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
        let err = CommonError::invalid_input("mac", "expected 6 octets");
        assert!(err.to_string().contains("mac"));
        assert!(err.to_string().contains("6 octets"));
    }

    #[test]
    fn test_constructors() {
        let err = CommonError::decoding("base64", "invalid padding");
        assert!(matches!(err, CommonError::Decoding { .. }));
        assert!(err.to_string().contains("invalid padding"));

        let err = CommonError::encoding("request body", "key must be a string");
        assert!(matches!(err, CommonError::Encoding { .. }));
    }
}
