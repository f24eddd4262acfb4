// ============================================
// File: crates/deco-client/src/services/negotiator.rs
// ============================================
//! # Key Negotiator
//!
//! ## Creation Reason
//! Fetches the two RSA public keys (and the sequence baseline) that
//! precede every login.
//!
//! ## Exchange
//! ```text
//! POST ;stok=/login?form=keys   {"operation":"read"}
//!   ← {"error_code":0,"result":{"password":[n,e]}}
//!
//! POST ;stok=/login?form=auth   {"operation":"read"}
//!   ← {"error_code":0,"result":{"key":[n,e],"seq":<int>}}
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Both calls are unauthenticated and idempotent; retrying is safe
//! - Any parse failure or non-zero code is reported as `KeyFormat`
//!
//! ## Last Modified
//! v0.1.0 - Initial negotiator

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use deco_core::protocol::{
    PasswordKeyResult, SessionKeyResult, FORM_AUTH, FORM_KEYS, LOGIN_PATH,
};
use deco_core::{EndpointRequest, EnvelopeCodec, PasswordKey, SignatureKey};
use deco_transport::{HttpRequest, HttpTransport};

use super::cancellable;
use crate::error::{ClientError, Result};

/// Performs the unauthenticated key round trips.
#[derive(Clone)]
pub struct KeyNegotiator {
    transport: Arc<dyn HttpTransport>,
}

impl KeyNegotiator {
    /// Creates a negotiator over `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Fetches the key that encrypts the login password.
    ///
    /// # Errors
    /// - `Network`: transport failure
    /// - `KeyFormat`: bad response or unusable key
    /// - `Cancelled`: `cancel` fired first
    pub async fn fetch_password_key(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<PasswordKey> {
        let result: PasswordKeyResult = self.read_keys(FORM_KEYS, cancel).await?;
        let key = result.key().map_err(|e| ClientError::key_format(e.to_string()))?;
        debug!(?key, "Password key received");
        Ok(PasswordKey::new(key))
    }

    /// Fetches the key that encrypts envelope signatures, plus the
    /// sequence baseline.
    ///
    /// # Errors
    /// Same as [`KeyNegotiator::fetch_password_key`].
    pub async fn fetch_session_key(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<(SignatureKey, u64)> {
        let result: SessionKeyResult = self.read_keys(FORM_AUTH, cancel).await?;
        let key = result.key().map_err(|e| ClientError::key_format(e.to_string()))?;
        debug!(?key, seq = result.seq, "Session key received");
        Ok((SignatureKey::new(key), result.seq))
    }

    async fn read_keys<T: DeserializeOwned>(
        &self,
        form: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<T> {
        let body = EndpointRequest::read().to_json()?;
        let request = HttpRequest::json(LOGIN_PATH, form, body);
        let response = cancellable(cancel, self.transport.post(request)).await??;

        EnvelopeCodec::open_plain(&response.body)
            .and_then(|r| r.decode_result::<T>())
            .map_err(|e| ClientError::key_format(format!("form={form}: {e}")))
    }
}

impl std::fmt::Debug for KeyNegotiator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyNegotiator")
            .field("base_url", &self.transport.base_url())
            .finish()
    }
}
