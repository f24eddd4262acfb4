// ============================================
// File: crates/deco-client/src/client.rs
// ============================================
//! # Deco Client
//!
//! ## Creation Reason
//! Public entry point: authenticates against the device and exposes the
//! typed endpoints plus a raw escape hatch, all routed through one
//! session envelope.
//!
//! ## Main Functionality
//! - `authenticate`: key negotiation + login
//! - `performance`, `device_list`, `client_list`, `reboot`: typed calls
//! - `custom`: any path/form/body, `EndpointResult::Raw`
//! - `fetch`: any catalog endpoint as an `EndpointResult`
//! - `*_cancellable`: same calls, abortable with a `CancellationToken`
//!
//! ## Authentication Flow
//! ```text
//! generate AES key ─► derive hash ─► form=keys ─► form=auth
//!        │                                           │
//!        ▼                                           ▼
//!  RSA(password, password key)           signature key + seq
//!        │                                           │
//!        └──────────────► login envelope ◄───────────┘
//!                         (k=,i= embedded)
//!                               │
//!                               ▼
//!                        stok ─► session
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The session mutex is held for the whole of `authenticate` and of
//!   every send; at most one envelope is in flight per client
//! - A failed `authenticate` leaves the client unauthenticated, even if
//!   it was authenticated before
//!
//! ## Last Modified
//! v0.1.0 - Initial client facade

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use deco_common::{MacAddress, SessionToken};
use deco_core::protocol::{login_request, LoginResult, ERROR_BAD_CREDENTIALS, FORM_LOGIN, OP_REBOOT};
use deco_core::{AesSessionKey, CredentialDeriver, EndpointRequest, EndpointResponse};
use deco_transport::{HttpTransport, ReqwestTransport, TransportConfig};

use crate::config::ClientConfig;
use crate::endpoints::{KnownEndpoint, DEVICE_PATH, FORM_SYSTEM};
use crate::error::{ClientError, Result};
use crate::models::{ClientList, DeviceList, EndpointResult, Performance};
use crate::services::{
    cancellable, EnvelopeCall, KeyNegotiator, SessionEnvelope, SessionKeys, SessionState,
};

// ============================================
// DecoClient
// ============================================

/// Client for one Deco main node.
///
/// # Example
/// ```no_run
/// use deco_client::{ClientConfig, DecoClient};
///
/// # async fn run() -> deco_client::Result<()> {
/// let client = DecoClient::new(&ClientConfig::for_host("192.168.68.1"))?;
/// client.authenticate("password").await?;
///
/// let perf = client.performance().await?;
/// println!("cpu {:.0}%", perf.cpu_usage * 100.0);
/// # Ok(())
/// # }
/// ```
pub struct DecoClient {
    transport: Arc<dyn HttpTransport>,
    negotiator: KeyNegotiator,
    envelope: SessionEnvelope,
    deriver: CredentialDeriver,
    session: Mutex<SessionState>,
}

impl DecoClient {
    /// Creates a client from configuration, using the reqwest transport.
    ///
    /// # Errors
    /// - `ConfigInvalid`: the configuration fails validation
    /// - `Network`: the HTTP client could not be built
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(
            TransportConfig::new(config.base_url()).with_timeout(config.request_timeout()),
        )?;
        Ok(Self::with_transport(
            Arc::new(transport),
            CredentialDeriver::new(config.device.account.clone()),
        ))
    }

    /// Creates a client over an arbitrary transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn HttpTransport>, deriver: CredentialDeriver) -> Self {
        Self {
            negotiator: KeyNegotiator::new(transport.clone()),
            envelope: SessionEnvelope::new(transport.clone()),
            transport,
            deriver,
            session: Mutex::new(SessionState::new()),
        }
    }

    /// Base URL of the device.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// `true` once `authenticate` has succeeded.
    pub async fn is_authenticated(&self) -> bool {
        self.session.lock().await.is_authenticated()
    }

    /// Sequence value the next envelope will carry.
    pub async fn sequence(&self) -> u64 {
        self.session.lock().await.sequence()
    }

    // ========================================
    // Authentication
    // ========================================

    /// Negotiates keys and logs in.
    ///
    /// # Errors
    /// - `Authentication`: bad credentials or no session token returned
    /// - `KeyFormat`: unusable RSA keys from the device
    /// - `Network` / `Crypto` / `Decode`: as for any send
    pub async fn authenticate(&self, password: &str) -> Result<()> {
        self.authenticate_with(password, None).await
    }

    /// [`DecoClient::authenticate`], abortable with `cancel`.
    ///
    /// # Errors
    /// As [`DecoClient::authenticate`], plus `Cancelled`.
    pub async fn authenticate_cancellable(
        &self,
        password: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.authenticate_with(password, Some(cancel)).await
    }

    async fn authenticate_with(
        &self,
        password: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<()> {
        let mut session = cancellable(cancel, self.session.lock()).await?;
        session.clear();

        info!(account = self.deriver.account(), base = %self.base_url(), "Authenticating");

        let aes = AesSessionKey::generate();
        let hash = self.deriver.derive(password);
        let password_key = self.negotiator.fetch_password_key(cancel).await?;
        let (signature_key, sequence) = self.negotiator.fetch_session_key(cancel).await?;
        debug!(seq = sequence, "Keys negotiated");

        let encrypted_password = password_key.encrypt_password(password)?;
        let body = login_request(&encrypted_password).to_json()?;

        let mut pending = SessionState::negotiated(
            SessionKeys {
                aes,
                password_key,
                signature_key,
                hash,
            },
            sequence,
        );

        let response = match self
            .envelope
            .send(&mut pending, EnvelopeCall::login(FORM_LOGIN, &body), cancel)
            .await
        {
            Ok(response) => response,
            Err(ClientError::Protocol { code }) if code == ERROR_BAD_CREDENTIALS => {
                warn!(code, "Login rejected");
                return Err(ClientError::authentication("invalid credentials"));
            }
            Err(e) => return Err(e),
        };

        let login: LoginResult = response
            .decode_result()
            .map_err(|_| ClientError::authentication("malformed login result"))?;
        let token = login
            .token()
            .ok_or_else(|| ClientError::authentication("no session token in login response"))?;
        let token = SessionToken::new(token)
            .map_err(|e| ClientError::authentication(format!("unusable session token: {e}")))?;

        pending.set_token(token);
        *session = pending;

        info!("Authenticated");
        Ok(())
    }

    // ========================================
    // Typed Endpoints
    // ========================================

    /// CPU and memory usage of the main node.
    ///
    /// # Errors
    /// `NotAuthenticated` before login; otherwise as any send.
    pub async fn performance(&self) -> Result<Performance> {
        self.read_typed(KnownEndpoint::Performance, None).await
    }

    /// [`DecoClient::performance`], abortable with `cancel`.
    ///
    /// # Errors
    /// As [`DecoClient::performance`], plus `Cancelled`.
    pub async fn performance_cancellable(&self, cancel: &CancellationToken) -> Result<Performance> {
        self.read_typed(KnownEndpoint::Performance, Some(cancel)).await
    }

    /// All mesh nodes.
    ///
    /// # Errors
    /// `NotAuthenticated` before login; otherwise as any send.
    pub async fn device_list(&self) -> Result<DeviceList> {
        self.read_typed(KnownEndpoint::DeviceList, None).await
    }

    /// [`DecoClient::device_list`], abortable with `cancel`.
    ///
    /// # Errors
    /// As [`DecoClient::device_list`], plus `Cancelled`.
    pub async fn device_list_cancellable(&self, cancel: &CancellationToken) -> Result<DeviceList> {
        self.read_typed(KnownEndpoint::DeviceList, Some(cancel)).await
    }

    /// All clients, with names base64-decoded where possible.
    ///
    /// # Errors
    /// `NotAuthenticated` before login; otherwise as any send.
    pub async fn client_list(&self) -> Result<ClientList> {
        self.client_list_with(None).await
    }

    /// [`DecoClient::client_list`], abortable with `cancel`.
    ///
    /// # Errors
    /// As [`DecoClient::client_list`], plus `Cancelled`.
    pub async fn client_list_cancellable(&self, cancel: &CancellationToken) -> Result<ClientList> {
        self.client_list_with(Some(cancel)).await
    }

    async fn client_list_with(&self, cancel: Option<&CancellationToken>) -> Result<ClientList> {
        let mut list: ClientList = self.read_typed(KnownEndpoint::ClientList, cancel).await?;
        list.decode_names();
        Ok(list)
    }

    /// Reboots the given nodes.
    ///
    /// # Errors
    /// - `InvalidInput`: `macs` is empty
    /// - otherwise as any send
    pub async fn reboot(&self, macs: &[MacAddress]) -> Result<EndpointResult> {
        self.reboot_with(macs, None).await
    }

    /// [`DecoClient::reboot`], abortable with `cancel`.
    ///
    /// # Errors
    /// As [`DecoClient::reboot`], plus `Cancelled`.
    pub async fn reboot_cancellable(
        &self,
        macs: &[MacAddress],
        cancel: &CancellationToken,
    ) -> Result<EndpointResult> {
        self.reboot_with(macs, Some(cancel)).await
    }

    async fn reboot_with(
        &self,
        macs: &[MacAddress],
        cancel: Option<&CancellationToken>,
    ) -> Result<EndpointResult> {
        if macs.is_empty() {
            return Err(ClientError::invalid_input("macs", "at least one MAC is required"));
        }

        let mac_list: Vec<Value> = macs
            .iter()
            .map(|mac| json!({ "mac": mac.to_string() }))
            .collect();
        let request = EndpointRequest::new(OP_REBOOT).with_param("mac_list", mac_list);

        info!(nodes = macs.len(), "Rebooting");
        let response = self.call(DEVICE_PATH, FORM_SYSTEM, &request, cancel).await?;
        Ok(EndpointResult::Reboot(response.result))
    }

    // ========================================
    // Generic Endpoints
    // ========================================

    /// Sends `body` to `path_suffix?form=<form>` and returns the
    /// `result` untouched as [`EndpointResult::Raw`].
    ///
    /// # Errors
    /// - `InvalidInput`: `body` is not JSON
    /// - otherwise as any send
    pub async fn custom(
        &self,
        path_suffix: &str,
        form: &str,
        body: &str,
    ) -> Result<EndpointResult> {
        self.custom_with(path_suffix, form, body, None).await
    }

    /// [`DecoClient::custom`], abortable with `cancel`.
    ///
    /// # Errors
    /// As [`DecoClient::custom`], plus `Cancelled`.
    pub async fn custom_cancellable(
        &self,
        path_suffix: &str,
        form: &str,
        body: &str,
        cancel: &CancellationToken,
    ) -> Result<EndpointResult> {
        self.custom_with(path_suffix, form, body, Some(cancel)).await
    }

    async fn custom_with(
        &self,
        path_suffix: &str,
        form: &str,
        body: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<EndpointResult> {
        if let Err(e) = serde_json::from_str::<Value>(body) {
            return Err(ClientError::invalid_input("body", e.to_string()));
        }
        let response = self.send(path_suffix, form, body, cancel).await?;
        Ok(EndpointResult::Raw(response.result))
    }

    /// Fetches any catalog endpoint into its own [`EndpointResult`]
    /// variant.
    ///
    /// # Errors
    /// As any send.
    pub async fn fetch(&self, endpoint: KnownEndpoint) -> Result<EndpointResult> {
        Ok(match endpoint {
            KnownEndpoint::Performance => EndpointResult::Performance(self.performance().await?),
            KnownEndpoint::DeviceList => EndpointResult::DeviceList(self.device_list().await?),
            KnownEndpoint::ClientList => EndpointResult::ClientList(self.client_list().await?),
            KnownEndpoint::Wlan => EndpointResult::Wlan(self.read_value(endpoint).await?),
            KnownEndpoint::LanIpv4 => EndpointResult::LanIpv4(self.read_value(endpoint).await?),
            KnownEndpoint::LanIpv6 => EndpointResult::LanIpv6(self.read_value(endpoint).await?),
            KnownEndpoint::Wan => EndpointResult::Wan(self.read_value(endpoint).await?),
            KnownEndpoint::Internet => EndpointResult::Internet(self.read_value(endpoint).await?),
            KnownEndpoint::Mode => EndpointResult::Mode(self.read_value(endpoint).await?),
            KnownEndpoint::Advanced => EndpointResult::Advanced(self.read_value(endpoint).await?),
            KnownEndpoint::DhcpDial => EndpointResult::DhcpDial(self.read_value(endpoint).await?),
        })
    }

    // ========================================
    // Internals
    // ========================================

    async fn read_value(&self, endpoint: KnownEndpoint) -> Result<Value> {
        let response = self
            .call(endpoint.path_suffix(), endpoint.form(), &endpoint.request(), None)
            .await?;
        Ok(response.result)
    }

    async fn read_typed<T: DeserializeOwned>(
        &self,
        endpoint: KnownEndpoint,
        cancel: Option<&CancellationToken>,
    ) -> Result<T> {
        let response = self
            .call(endpoint.path_suffix(), endpoint.form(), &endpoint.request(), cancel)
            .await?;
        Ok(response.decode_result()?)
    }

    async fn call(
        &self,
        path_suffix: &str,
        form: &str,
        request: &EndpointRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<EndpointResponse> {
        let body = request.to_json()?;
        self.send(path_suffix, form, &body, cancel).await
    }

    async fn send(
        &self,
        path_suffix: &str,
        form: &str,
        body: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<EndpointResponse> {
        let mut session = cancellable(cancel, self.session.lock()).await?;
        self.envelope
            .send(
                &mut session,
                EnvelopeCall::authenticated(path_suffix, form, body),
                cancel,
            )
            .await
    }
}

impl std::fmt::Debug for DecoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoClient")
            .field("base_url", &self.base_url())
            .field("account", &self.deriver.account())
            .finish_non_exhaustive()
    }
}

// ============================================
// Tests
// ============================================
