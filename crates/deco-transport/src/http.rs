// ============================================
// File: crates/deco-transport/src/http.rs
// ============================================
//! # reqwest Transport
//!
//! ## Creation Reason
//! Production `HttpTransport` backed by a single reqwest client with a
//! cookie jar and a fixed request timeout.
//!
//! ## Main Functionality
//! - Resolves `HttpRequest.path` against the base URL
//! - Appends `?form=<form>`
//! - Sends JSON or form-encoded bodies
//! - Maps reqwest failures onto `TransportError`
//!
//! ## ⚠️ Important Note for Next Developer
//! - The device sets a session cookie during login; the cookie store
//!   must stay enabled or authenticated calls fail with HTTP 403
//! - reqwest errors embed the URL, which contains the session token.
//!   Always strip it with `without_url()` before formatting.
//!
//! ## Last Modified
//! v0.1.0 - Initial reqwest transport

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::{debug, trace};

use crate::error::{Result, TransportError};
use crate::traits::{HttpRequest, HttpResponse, HttpTransport, RequestBody};

// ============================================
// Constants
// ============================================

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================
// TransportConfig
// ============================================

/// Settings for [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Base URL, e.g. `http://tplinkdeco.net/cgi-bin/luci/`.
    pub base_url: String,
    /// Timeout for one full round trip.
    pub timeout: Duration,
}

impl TransportConfig {
    /// Creates a config with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================
// ReqwestTransport
// ============================================

/// HTTP transport using reqwest.
pub struct ReqwestTransport {
    http: Client,
    base: Url,
    base_text: String,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Builds the transport.
    ///
    /// # Errors
    /// - `InvalidUrl`: the base URL does not parse or has no host
    /// - `ClientBuild`: reqwest could not create the client
    pub fn new(config: TransportConfig) -> Result<Self> {
        let mut base_text = config.base_url;
        if !base_text.ends_with('/') {
            base_text.push('/');
        }

        let base = Url::parse(&base_text)
            .map_err(|e| TransportError::invalid_url(format!("{base_text}: {e}")))?;
        if base.host_str().is_none() {
            return Err(TransportError::invalid_url(format!("{base_text}: no host")));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| TransportError::ClientBuild {
                reason: e.to_string(),
            })?;

        debug!(base = %base_text, timeout = ?config.timeout, "HTTP transport ready");

        Ok(Self {
            http,
            base,
            base_text,
            timeout: config.timeout,
        })
    }

    /// Resolves a request path and form against the base URL.
    ///
    /// # Errors
    /// Returns `InvalidUrl` if the joined URL does not parse.
    pub fn request_url(&self, path: &str, form: &str) -> Result<Url> {
        let joined = format!("{}{}", self.base_text, path.trim_start_matches('/'));
        let mut url = Url::parse(&joined)
            .map_err(|e| TransportError::invalid_url(format!("request path: {e}")))?;
        url.query_pairs_mut().append_pair("form", form);
        Ok(url)
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else if err.is_connect() {
            TransportError::ConnectFailed {
                host: self.base.host_str().unwrap_or_default().to_string(),
                reason: err.without_url().to_string(),
            }
        } else {
            TransportError::request_failed(err.without_url().to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.request_url(&request.path, &request.form)?;
        trace!(form = %request.form, "POST");

        let builder = self.http.post(url);
        let builder = match request.body {
            RequestBody::Json(text) => builder.header(CONTENT_TYPE, "application/json").body(text),
            RequestBody::Form(fields) => builder.form(&fields),
        };

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| TransportError::BodyRead {
            reason: e.without_url().to_string(),
        })?;

        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }

    fn base_url(&self) -> &str {
        &self.base_text
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_text)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(TransportConfig::new("http://tplinkdeco.net/cgi-bin/luci")).unwrap()
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        assert_eq!(transport().base_url(), "http://tplinkdeco.net/cgi-bin/luci/");
    }

    #[test]
    fn test_login_url_shape() {
        let url = transport().request_url(";stok=/login", "keys").unwrap();
        assert_eq!(
            url.as_str(),
            "http://tplinkdeco.net/cgi-bin/luci/;stok=/login?form=keys"
        );
    }

    #[test]
    fn test_authenticated_url_shape() {
        let url = transport()
            .request_url(";stok=abc123/admin/network", "performance")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://tplinkdeco.net/cgi-bin/luci/;stok=abc123/admin/network?form=performance"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ReqwestTransport::new(TransportConfig::new("not a url")).unwrap_err();
        assert!(err.is_setup_error());
    }

    #[test]
    fn test_timeout_override() {
        let config = TransportConfig::new("http://192.168.68.1/cgi-bin/luci/")
            .with_timeout(Duration::from_secs(3));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
