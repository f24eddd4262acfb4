// ============================================
// File: crates/deco-core/src/crypto/credential.rs
// ============================================
//! # Credential Derivation
//!
//! The device authenticates every envelope signature with
//! `h = md5_hex(account || password)`. This module computes that value.

use std::fmt;

use md5::{Digest, Md5};
use zeroize::Zeroize;

use super::DEFAULT_ACCOUNT;

/// Length of the hex-encoded credential hash.
pub const CREDENTIAL_HASH_LEN: usize = 32;

// ============================================
// CredentialHash
// ============================================

/// Lowercase hex MD5 digest of `account || password`.
#[derive(Clone, PartialEq, Eq, Zeroize)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}

impl Drop for CredentialHash {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

// ============================================
// CredentialDeriver
// ============================================

/// Derives the credential hash for a fixed account.
///
/// # Example
/// ```
/// use deco_core::CredentialDeriver;
///
/// let deriver = CredentialDeriver::default();
/// let hash = deriver.derive("password");
/// assert_eq!(hash.as_str().len(), 32);
/// assert_eq!(hash, deriver.derive("password"));
/// ```
#[derive(Debug, Clone)]
pub struct CredentialDeriver {
    account: String,
}

impl CredentialDeriver {
    /// Creates a deriver for the given account name.
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
        }
    }

    /// Returns the account name mixed into every hash.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Computes `md5_hex(account || password)`.
    #[must_use]
    pub fn derive(&self, password: &str) -> CredentialHash {
        let mut hasher = Md5::new();
        hasher.update(self.account.as_bytes());
        hasher.update(password.as_bytes());
        CredentialHash(hex::encode(hasher.finalize()))
    }
}

impl Default for CredentialDeriver {
    fn default() -> Self {
        Self::new(DEFAULT_ACCOUNT)
    }
}
