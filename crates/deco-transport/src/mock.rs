// ============================================
// File: crates/deco-transport/src/mock.rs
// ============================================
//! # Mock HTTP Transport
//!
//! ## Creation Reason
//! Lets the key negotiation, login and envelope code run end to end in
//! tests without a device on the network.
//!
//! ## Main Functionality
//! - Scripted responses, consumed in order
//! - Optional `Responder` that computes a reply from the request
//! - Request capture for verification
//! - Optional delay before replying (cancellation tests)
//!
//! ## Usage in Tests
//! ```ignore
//! let transport = MockTransport::new();
//! transport.push_json(r#"{"error_code":0,"result":{"password":["c3","010001"]}}"#);
//!
//! let response = transport.post(request).await?;
//! assert_eq!(transport.request_count(), 1);
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - This is for testing only - do not use in production
//! - Scripted responses take priority over the responder
//!
//! ## Last Modified
//! v0.1.0 - Initial mock implementation

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Result, TransportError};
use crate::traits::{HttpRequest, HttpResponse, HttpTransport};

/// Base URL reported by the mock.
const MOCK_BASE_URL: &str = "http://mock.deco/cgi-bin/luci/";

// ============================================
// Responder
// ============================================

/// Computes a reply for a request, e.g. a simulated device.
pub trait Responder: Send + Sync {
    /// Produces the reply for `request`.
    ///
    /// # Errors
    /// Any error is returned from `post` unchanged.
    fn respond(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<F> Responder for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync,
{
    fn respond(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self(request)
    }
}

// ============================================
// MockTransport
// ============================================

/// In-memory transport for tests.
#[derive(Default)]
pub struct MockTransport {
    /// Replies handed out in order
    script: Mutex<VecDeque<Result<HttpResponse>>>,
    /// Fallback when the script is empty
    responder: Option<Arc<dyn Responder>>,
    /// Every request seen, in order
    requests: Mutex<Vec<HttpRequest>>,
    /// Wait applied before each reply
    delay: Mutex<Option<Duration>>,
}

impl MockTransport {
    /// Creates an empty scripted mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that answers through `responder`.
    #[must_use]
    pub fn with_responder(responder: Arc<dyn Responder>) -> Self {
        Self {
            responder: Some(responder),
            ..Self::default()
        }
    }

    /// Queues a raw response.
    pub fn push_response(&self, response: HttpResponse) {
        self.script.lock().push_back(Ok(response));
    }

    /// Queues a 200 response with a JSON body.
    pub fn push_json(&self, body: &str) {
        self.push_response(HttpResponse::ok(body.to_string()));
    }

    /// Queues a transport error.
    pub fn push_error(&self, error: TransportError) {
        self.script.lock().push_back(Err(error));
    }

    /// Delays every subsequent reply.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Returns a copy of all captured requests.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Takes and clears all captured requests.
    pub fn take_requests(&self) -> Vec<HttpRequest> {
        std::mem::take(&mut *self.requests.lock())
    }

    /// Number of requests seen so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().push(request.clone());

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.script.lock().pop_front();
        let response = match (scripted, &self.responder) {
            (Some(reply), _) => reply?,
            (None, Some(responder)) => responder.respond(&request)?,
            (None, None) => {
                return Err(TransportError::MockExhausted {
                    path: request.path,
                    form: request.form,
                })
            }
        };

        if response.is_success() {
            Ok(response)
        } else {
            Err(TransportError::HttpStatus {
                status: response.status,
            })
        }
    }

    fn base_url(&self) -> &str {
        MOCK_BASE_URL
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("scripted", &self.script.lock().len())
            .field("has_responder", &self.responder.is_some())
            .field("requests", &self.request_count())
            .finish()
    }
}

// ============================================
// Tests
// ============================================
