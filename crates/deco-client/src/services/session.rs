// ============================================
// File: crates/deco-client/src/services/session.rs
// ============================================
//! # Session State
//!
//! ## Creation Reason
//! Everything one authenticated session owns: the AES key, both RSA
//! keys, the credential hash, the session token and the sequence
//! counter.
//!
//! ## Session Lifecycle
//! ```text
//! ┌──────────┐  keys negotiated  ┌────────────┐  login ok  ┌───────────────┐
//! │  Empty   │ ────────────────► │ Negotiated │ ─────────► │ Authenticated │
//! └──────────┘                   └────────────┘            └───────┬───────┘
//!      ▲                               │ login fails               │
//!      └───────────────────────────────┴───────────────────────────┘
//!                                 authenticate() again
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The `Negotiated` state only ever exists in a local value inside
//!   `authenticate`; the shared state goes straight from empty to
//!   authenticated
//! - The counter is advanced before the network call and never rolled
//!   back. The device rejects reused values.
//!
//! ## Last Modified
//! v0.1.0 - Initial session state

use std::fmt;

use deco_common::SessionToken;
use deco_core::{AesSessionKey, CredentialHash, PasswordKey, SignatureKey};

use crate::error::{ClientError, Result};

// ============================================
// SessionKeys
// ============================================

/// Key material negotiated for one session.
pub struct SessionKeys {
    /// AES key and IV, generated locally.
    pub aes: AesSessionKey,
    /// RSA key from `form=keys`; encrypts the password only.
    pub password_key: PasswordKey,
    /// RSA key from `form=auth`; encrypts envelope signatures only.
    pub signature_key: SignatureKey,
    /// `md5(account || password)`.
    pub hash: CredentialHash,
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("aes", &self.aes)
            .field("password_key", self.password_key.as_rsa())
            .field("signature_key", self.signature_key.as_rsa())
            .finish_non_exhaustive()
    }
}

// ============================================
// SessionState
// ============================================

/// Mutable state of one session.
#[derive(Default)]
pub struct SessionState {
    keys: Option<SessionKeys>,
    token: Option<SessionToken>,
    sequence: u64,
}

impl SessionState {
    /// Creates an empty, unauthenticated state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state with negotiated keys but no token yet.
    #[must_use]
    pub const fn negotiated(keys: SessionKeys, sequence: u64) -> Self {
        Self {
            keys: Some(keys),
            token: None,
            sequence,
        }
    }

    /// Negotiated keys, if any.
    #[must_use]
    pub const fn keys(&self) -> Option<&SessionKeys> {
        self.keys.as_ref()
    }

    /// Session token, if logged in.
    #[must_use]
    pub const fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    /// Stores the token issued by the login call.
    pub fn set_token(&mut self, token: SessionToken) {
        self.token = Some(token);
    }

    /// `true` once keys and token are both present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.keys.is_some() && self.token.is_some()
    }

    /// Value the next envelope will carry.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the current sequence value and advances the counter by one.
    ///
    /// # Errors
    /// Returns `SequenceExhausted` at `u64::MAX`; the counter is left as is.
    pub fn next_sequence(&mut self) -> Result<u64> {
        let current = self.sequence;
        self.sequence = current
            .checked_add(1)
            .ok_or(ClientError::SequenceExhausted { sequence: current })?;
        Ok(current)
    }

    /// Drops keys and token; the state becomes unauthenticated.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("keys", &self.keys)
            .field("token", &self.token)
            .field("sequence", &self.sequence)
            .finish()
    }
}
