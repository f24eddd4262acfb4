// ============================================
// File: crates/deco-client/src/lib.rs
// ============================================
//! # Deco Client Library
//!
//! ## Creation Reason
//! Client for the Deco mesh router's management API, which wraps every
//! call in an RSA-bootstrapped, AES-encrypted, sequence-numbered
//! envelope.
//!
//! ## Main Functionality
//!
//! ### Modules
//! - [`client`]: `DecoClient` facade
//! - [`services`]: key negotiation, session state, envelope send path
//! - [`endpoints`]: catalog of known read-only endpoints
//! - [`models`]: typed endpoint results
//! - [`config`]: TOML configuration
//! - [`error`]: client error taxonomy
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          deco (CLI)                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                         DecoClient                              │
//! │   authenticate │ performance │ device_list │ client_list │ ...  │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  KeyNegotiator      SessionState (Mutex)      SessionEnvelope   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  deco-core: MD5 hash, AES-CBC, RSA PKCS#1 v1.5, envelope codec  │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  deco-transport: HttpTransport (reqwest / mock)                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - One `DecoClient` is one session; share it behind an `Arc`
//! - Sequence desync is not recovered automatically; call
//!   `authenticate` again
//!
//! ## Last Modified
//! v0.1.0 - Initial client library

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

// Re-export primary types
pub use client::DecoClient;
pub use config::ClientConfig;
pub use endpoints::KnownEndpoint;
pub use error::{ClientError, Result};
pub use models::{ClientList, DeviceList, EndpointResult, Performance};

pub use deco_common::MacAddress;
pub use tokio_util::sync::CancellationToken;
