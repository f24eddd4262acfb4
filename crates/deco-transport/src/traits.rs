// ============================================
// File: crates/deco-transport/src/traits.rs
// ============================================
//! # Transport Traits
//!
//! ## Creation Reason
//! Defines the single round-trip interface the session layer depends on,
//! so the envelope engine can run against a real device or an in-memory
//! simulator.
//!
//! ## Main Functionality
//! - `HttpRequest`: path below the base URL, `form` query value, body
//! - `HttpResponse`: status code and raw body
//! - `HttpTransport`: async POST
//!
//! ## ⚠️ Important Note for Next Developer
//! - `path` is relative to the base URL and may contain `;stok=<token>`.
//!   Never log it at info level or above.
//! - Implementations must be Send + Sync; the client shares them via `Arc`
//!
//! ## Last Modified
//! v0.1.0 - Initial trait definitions

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

// ============================================
// RequestBody
// ============================================

/// Body of an outgoing POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Plain JSON text (key negotiation).
    Json(String),
    /// `application/x-www-form-urlencoded` pairs (encrypted envelopes).
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Returns the value of a form field, if this is a form body.
    #[must_use]
    pub fn form_value(&self, name: &str) -> Option<&str> {
        match self {
            Self::Form(fields) => fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            Self::Json(_) => None,
        }
    }
}

// ============================================
// HttpRequest / HttpResponse
// ============================================

/// One POST to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Path below the base URL, e.g. `;stok=/login`.
    pub path: String,
    /// Value of the `form` query parameter.
    pub form: String,
    /// Request body.
    pub body: RequestBody,
}

impl HttpRequest {
    /// Creates a JSON request.
    pub fn json(path: impl Into<String>, form: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            form: form.into(),
            body: RequestBody::Json(body.into()),
        }
    }

    /// Creates a form-encoded request.
    pub fn form(
        path: impl Into<String>,
        form: impl Into<String>,
        fields: Vec<(String, String)>,
    ) -> Self {
        Self {
            path: path.into(),
            form: form.into(),
            body: RequestBody::Form(fields),
        }
    }
}

/// Raw response from the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Bytes,
}

impl HttpResponse {
    /// Creates a 200 response with the given body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

// ============================================
// HttpTransport Trait
// ============================================

/// Abstract interface for one HTTP round trip to the device.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks.
///
/// # Example
/// ```ignore
/// async fn fetch<T: HttpTransport>(transport: &T) -> Result<Bytes> {
///     let request = HttpRequest::json(";stok=/login", "keys", r#"{"operation":"read"}"#);
///     Ok(transport.post(request).await?.body)
/// }
/// ```
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends one POST and returns the response.
    ///
    /// Non-2xx statuses are returned as errors, not as responses.
    ///
    /// # Errors
    /// - `Timeout` / `ConnectFailed` / `RequestFailed`: network failure
    /// - `HttpStatus`: the device answered with a non-2xx status
    /// - `BodyRead`: the body could not be read
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Returns the base URL requests are resolved against.
    fn base_url(&self) -> &str;
}

// ============================================
// Tests
// ============================================
