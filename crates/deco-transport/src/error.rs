// ============================================
// File: crates/deco-transport/src/error.rs
// ============================================
//! # Transport Error Types
//!
//! ## Creation Reason
//! Error types for building the HTTP client and performing round trips.
//!
//! ## Error Categories
//! 1. **Setup Errors**: bad base URL, client construction
//! 2. **Network Errors**: connect failure, timeout, request failure
//! 3. **HTTP Errors**: non-2xx status, unreadable body
//!
//! ## ⚠️ Important Note for Next Developer
//! - URLs of authenticated calls contain the session token; strip the
//!   query/path before putting a URL in an error message
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

// ============================================
// Result Type Alias
// ============================================

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

// ============================================
// TransportError
// ============================================

/// Transport layer error types.
#[derive(Error, Debug)]
pub enum TransportError {
    // ========================================
    // Setup Errors
    // ========================================

    /// Base URL or request URL could not be built.
    #[error("Invalid URL: {reason}")]
    InvalidUrl {
        /// Why the URL is invalid
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {reason}")]
    ClientBuild {
        /// Why construction failed
        reason: String,
    },

    // ========================================
    // Network Errors
    // ========================================

    /// Could not connect to the device.
    #[error("Connection to {host} failed: {reason}")]
    ConnectFailed {
        /// Device host
        host: String,
        /// Why the connection failed
        reason: String,
    },

    /// The round trip did not complete within the timeout.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout
        timeout_ms: u64,
    },

    /// Any other request failure.
    #[error("Request failed: {reason}")]
    RequestFailed {
        /// Why the request failed
        reason: String,
    },

    // ========================================
    // HTTP Errors
    // ========================================

    /// The device answered with a non-success status.
    #[error("HTTP status {status}")]
    HttpStatus {
        /// Status code
        status: u16,
    },

    /// The response body could not be read.
    #[error("Failed to read response body: {reason}")]
    BodyRead {
        /// Why reading failed
        reason: String,
    },

    /// A mock transport ran out of scripted responses.
    #[error("No scripted response for {path}?form={form}")]
    MockExhausted {
        /// Requested path
        path: String,
        /// Requested form
        form: String,
    },
}

impl TransportError {
    /// Creates an `InvalidUrl` error.
    pub fn invalid_url(reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            reason: reason.into(),
        }
    }

    /// Creates a `RequestFailed` error.
    pub fn request_failed(reason: impl Into<String>) -> Self {
        Self::RequestFailed {
            reason: reason.into(),
        }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` if this error is transient.
    ///
    /// Note that retrying an envelope still requires a new sequence
    /// value; the transport never retries on its own.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::ConnectFailed { .. } | Self::RequestFailed { .. }
        )
    }

    /// Returns `true` if this error happened before any bytes were sent.
    #[must_use]
    pub const fn is_setup_error(&self) -> bool {
        matches!(self, Self::InvalidUrl { .. } | Self::ClientBuild { .. })
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
        let err = TransportError::Timeout { timeout_ms: 10_000 };
        assert!(err.to_string().contains("10000"));

        let err = TransportError::HttpStatus { status: 502 };
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_error_classification() {
        assert!(TransportError::Timeout { timeout_ms: 1 }.is_retryable());
        assert!(!TransportError::HttpStatus { status: 500 }.is_retryable());
        assert!(TransportError::invalid_url("no host").is_setup_error());
        assert!(!TransportError::request_failed("reset").is_setup_error());
    }
}
