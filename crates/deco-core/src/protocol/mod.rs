// ============================================
// File: crates/deco-core/src/protocol/mod.rs
// ============================================
//! # Protocol Module
//!
//! ## Creation Reason
//! Defines the JSON messages of the Deco management API and the codec
//! that wraps them in encrypted envelopes.
//!
//! ## Main Functionality
//! - [`messages`]: request/response shapes, key negotiation results
//! - [`codec`]: `EnvelopeCodec` seal/open
//!
//! ## Endpoint Paths
//! ```text
//! <base>/;stok=/login?form=keys      plaintext, password RSA key
//! <base>/;stok=/login?form=auth      plaintext, signature RSA key + seq
//! <base>/;stok=/login?form=login     envelope, k/i embedded
//! <base>/;stok=<token>/admin/<module>?form=<form>   envelope
//! ```
//!
//! ## Last Modified
//! v0.1.0 - Initial protocol definitions

pub mod codec;
pub mod messages;

pub use codec::{EnvelopeCodec, SealParams, SealedEnvelope};
pub use messages::{
    login_request, EndpointRequest, EndpointResponse, LoginResult, PasswordKeyResult,
    SessionKeyResult, WireResponse, OP_LOGIN, OP_READ, OP_REBOOT,
};

// ============================================
// Paths & Forms
// ============================================

/// Path used for all unauthenticated and login calls.
pub const LOGIN_PATH: &str = ";stok=/login";

/// Form selecting the password RSA key.
pub const FORM_KEYS: &str = "keys";

/// Form selecting the signature RSA key and sequence.
pub const FORM_AUTH: &str = "auth";

/// Form of the login envelope.
pub const FORM_LOGIN: &str = "login";

/// Device error code observed on bad credentials.
pub const ERROR_BAD_CREDENTIALS: i64 = -5002;

/// Builds the authenticated path `;stok=<token><suffix>`.
///
/// The token is percent-encoded so that it stays a single path segment.
///
/// # Example
/// ```
/// use deco_core::protocol::authenticated_path;
///
/// assert_eq!(authenticated_path("abc", "/admin/device"), ";stok=abc/admin/device");
/// assert_eq!(authenticated_path("a/b", "/admin/device"), ";stok=a%2Fb/admin/device");
/// ```
#[must_use]
pub fn authenticated_path(token: &str, suffix: &str) -> String {
    let token = urlencoding::encode(token);
    if suffix.starts_with('/') || suffix.is_empty() {
        format!(";stok={token}{suffix}")
    } else {
        format!(";stok={token}/{suffix}")
    }
}
