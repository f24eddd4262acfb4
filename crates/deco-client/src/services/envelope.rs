// ============================================
// File: crates/deco-client/src/services/envelope.rs
// ============================================
//! # Session Envelope
//!
//! ## Creation Reason
//! The one path every encrypted request takes: claim a sequence value,
//! seal the body, POST it, open the reply.
//!
//! ## Send Flow
//! ```text
//! ┌───────────────┐
//! │ preconditions │  keys present? token present (non-login)?
//! └───────┬───────┘
//!         ▼
//! ┌───────────────┐
//! │ seq = n; n+=1 │  never rolled back
//! └───────┬───────┘
//!         ▼
//! ┌───────────────┐
//! │ seal          │  data = AES(body), sign = RSA(h=..&s=seq+len(data))
//! └───────┬───────┘
//!         ▼
//! ┌───────────────┐
//! │ POST          │  sign=..&data=..  (cancellable)
//! └───────┬───────┘
//!         ▼
//! ┌───────────────┐
//! │ open          │  outer code → decrypt → inner code
//! └───────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The caller must hold the session lock for the whole call; `&mut
//!   SessionState` enforces that at compile time
//! - A failed or cancelled send still consumes its sequence value
//!
//! ## Last Modified
//! v0.1.0 - Initial envelope service

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use deco_core::protocol::{authenticated_path, LOGIN_PATH};
use deco_core::{EndpointResponse, EnvelopeCodec, SealParams};
use deco_transport::{HttpRequest, HttpTransport};

use super::cancellable;
use super::session::SessionState;
use crate::error::{ClientError, Result};

// ============================================
// EnvelopeCall
// ============================================

/// Where an envelope is posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeTarget<'a> {
    /// The literal `;stok=/login` path.
    Login,
    /// `;stok=<token><suffix>`.
    Authenticated(&'a str),
}

/// One envelope to send.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeCall<'a> {
    /// Target path.
    pub target: EnvelopeTarget<'a>,
    /// `form` query value.
    pub form: &'a str,
    /// Plaintext JSON body.
    pub body: &'a str,
    /// Embed `k=`/`i=` in the signature.
    pub embed_key: bool,
}

impl<'a> EnvelopeCall<'a> {
    /// The login envelope: login path, AES key embedded.
    #[must_use]
    pub const fn login(form: &'a str, body: &'a str) -> Self {
        Self {
            target: EnvelopeTarget::Login,
            form,
            body,
            embed_key: true,
        }
    }

    /// A regular authenticated call.
    #[must_use]
    pub const fn authenticated(path_suffix: &'a str, form: &'a str, body: &'a str) -> Self {
        Self {
            target: EnvelopeTarget::Authenticated(path_suffix),
            form,
            body,
            embed_key: false,
        }
    }
}

// ============================================
// SessionEnvelope
// ============================================

/// Seals, sends and opens encrypted requests.
#[derive(Clone)]
pub struct SessionEnvelope {
    transport: Arc<dyn HttpTransport>,
    codec: EnvelopeCodec,
}

impl SessionEnvelope {
    /// Creates an envelope sender over `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            codec: EnvelopeCodec::new(),
        }
    }

    /// Sends one envelope and returns the decrypted response.
    ///
    /// The sequence counter is advanced exactly once per call that gets
    /// past the precondition checks, whatever the outcome.
    ///
    /// # Errors
    /// - `NotAuthenticated`: no keys, or no token for a non-login call
    /// - `Crypto`: sealing or decryption failed
    /// - `Network`: transport failure (not retried)
    /// - `Protocol`: non-zero outer or inner `error_code`
    /// - `Decode`: malformed reply
    /// - `Cancelled`: `cancel` fired before the reply arrived
    /// - `SequenceExhausted`: the counter cannot advance
    pub async fn send(
        &self,
        state: &mut SessionState,
        call: EnvelopeCall<'_>,
        cancel: Option<&CancellationToken>,
    ) -> Result<EndpointResponse> {
        if state.keys().is_none() {
            return Err(ClientError::NotAuthenticated);
        }
        let path = match call.target {
            EnvelopeTarget::Login => LOGIN_PATH.to_string(),
            EnvelopeTarget::Authenticated(suffix) => {
                let token = state.token().ok_or(ClientError::NotAuthenticated)?;
                authenticated_path(token.as_str(), suffix)
            }
        };

        let sequence = state.next_sequence()?;
        let keys = state.keys().ok_or(ClientError::NotAuthenticated)?;

        let params = SealParams {
            aes: &keys.aes,
            signer: &keys.signature_key,
            hash: &keys.hash,
            sequence,
            embed_key: call.embed_key,
        };
        let sealed = self.codec.seal(&params, call.body.as_bytes())?;

        debug!(form = %call.form, seq = sequence, embed_key = call.embed_key, "Sending envelope");

        let request = HttpRequest::form(path, call.form, sealed.form_fields());
        let response = match cancellable(cancel, self.transport.post(request)).await {
            Ok(result) => result?,
            Err(e) => {
                debug!(form = %call.form, seq = sequence, "Envelope cancelled");
                return Err(e);
            }
        };

        self.codec.open(&keys.aes, &response.body).map_err(|e| {
            let err = ClientError::from(e);
            if let Some(code) = err.protocol_code() {
                warn!(form = %call.form, code, "Device rejected request");
            }
            err
        })
    }
}

impl std::fmt::Debug for SessionEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEnvelope")
            .field("base_url", &self.transport.base_url())
            .finish_non_exhaustive()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDevice, FAKE_STOK};
    use deco_common::SessionToken;
    use deco_transport::{MockTransport, TransportError};
    use std::time::Duration;

    fn authenticated_state(device: &FakeDevice) -> SessionState {
        let mut state = device.negotiated_state();
        state.set_token(SessionToken::new(FAKE_STOK).unwrap());
        state
    }

    #[tokio::test]
    async fn test_send_requires_keys() {
        let envelope = SessionEnvelope::new(Arc::new(MockTransport::new()));
        let mut state = SessionState::new();

        let err = envelope
            .send(&mut state, EnvelopeCall::authenticated("/admin/device", "device_list", "{}"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotAuthenticated));
        assert_eq!(state.sequence(), 0);
    }

    #[tokio::test]
    async fn test_send_requires_token_for_admin_paths() {
        let device = FakeDevice::new();
        let mock = Arc::new(MockTransport::new());
        let envelope = SessionEnvelope::new(mock.clone());
        let mut state = device.negotiated_state();
        let before = state.sequence();

        let err = envelope
            .send(&mut state, EnvelopeCall::authenticated("/admin/device", "device_list", "{}"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotAuthenticated));
        assert_eq!(state.sequence(), before);
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_sequence_advances_once_per_send() {
        let device = Arc::new(FakeDevice::new());
        let envelope = SessionEnvelope::new(device.transport());
        let mut state = authenticated_state(&device);
        let start = state.sequence();

        for _ in 0..3 {
            envelope
                .send(
                    &mut state,
                    EnvelopeCall::authenticated("/admin/network", "performance", r#"{"operation":"read"}"#),
                    None,
                )
                .await
                .unwrap();
        }

        assert_eq!(state.sequence(), start + 3);
        assert_eq!(device.sequences(), vec![start, start + 1, start + 2]);
    }

    #[tokio::test]
    async fn test_sequence_advances_on_failure() {
        let device = FakeDevice::new();
        let mock = Arc::new(MockTransport::new());
        mock.push_error(TransportError::Timeout { timeout_ms: 10_000 });
        mock.push_json(r#"{"error_code":-40401}"#);
        let envelope = SessionEnvelope::new(mock.clone());
        let mut state = authenticated_state(&device);
        let start = state.sequence();

        let call = EnvelopeCall::authenticated("/admin/network", "performance", r#"{"operation":"read"}"#);
        let err = envelope.send(&mut state, call, None).await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
        assert_eq!(state.sequence(), start + 1);

        let err = envelope.send(&mut state, call, None).await.unwrap_err();
        assert_eq!(err.protocol_code(), Some(-40401));
        assert_eq!(state.sequence(), start + 2);
    }

    #[tokio::test]
    async fn test_request_shape() {
        let device = FakeDevice::new();
        let mock = Arc::new(MockTransport::new());
        mock.push_json(r#"{"error_code":-1}"#);
        let envelope = SessionEnvelope::new(mock.clone());
        let mut state = authenticated_state(&device);

        let _ = envelope
            .send(
                &mut state,
                EnvelopeCall::authenticated("admin/client", "client_list", r#"{"operation":"read"}"#),
                None,
            )
            .await;

        let sent = mock.take_requests();
        assert_eq!(sent[0].path, format!(";stok={FAKE_STOK}/admin/client"));
        assert_eq!(sent[0].form, "client_list");
        assert!(sent[0].body.form_value("sign").is_some());
        assert!(sent[0].body.form_value("data").is_some());
    }

    #[tokio::test]
    async fn test_cancel_keeps_sequence_advanced() {
        let device = FakeDevice::new();
        let mock = Arc::new(MockTransport::new());
        mock.set_delay(Duration::from_secs(30));
        let envelope = SessionEnvelope::new(mock.clone());
        let mut state = authenticated_state(&device);
        let start = state.sequence();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let call = EnvelopeCall::authenticated("/admin/device", "device_list", r#"{"operation":"read"}"#);
        let err = envelope.send(&mut state, call, Some(&cancel)).await.unwrap_err();
        assert!(matches!(err, ClientError::Cancelled));
        assert_eq!(state.sequence(), start + 1);
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_undecryptable_reply_is_error() {
        let device = FakeDevice::new();
        let mock = Arc::new(MockTransport::new());
        mock.push_json(r#"{"error_code":0,"data":"not-base64!!"}"#);
        let envelope = SessionEnvelope::new(mock.clone());
        let mut state = authenticated_state(&device);

        let call = EnvelopeCall::authenticated("/admin/device", "device_list", r#"{"operation":"read"}"#);
        let err = envelope.send(&mut state, call, None).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }
}
