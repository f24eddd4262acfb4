// ============================================
// File: crates/deco-transport/src/lib.rs
// ============================================
//! # Deco Transport - HTTP Layer
//!
//! ## Creation Reason
//! Isolates the HTTP round trip behind a trait so the envelope engine
//! can be exercised against an in-memory device in tests.
//!
//! ## Main Functionality
//! - [`traits`]: `HttpTransport`, `HttpRequest`, `HttpResponse`
//! - [`http`]: `ReqwestTransport` (cookie jar, fixed timeout)
//! - [`mock`]: `MockTransport` (feature `mock`)
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 deco-client                         │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                    │
//! │         ▼                     ▼                    │
//! │     deco-core         deco-transport  ◄── You are here
//! │         │                     │                    │
//! │         └──────────┬──────────┘                    │
//! │                    ▼                               │
//! │              deco-common                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The transport knows nothing about encryption or sequence numbers
//! - Transport errors are never retried here; the session layer decides
//!
//! ## Last Modified
//! v0.1.0 - Initial transport layer implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod http;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{Result, TransportError};
pub use http::{ReqwestTransport, TransportConfig};
pub use traits::{HttpRequest, HttpResponse, HttpTransport, RequestBody};

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockTransport, Responder};
