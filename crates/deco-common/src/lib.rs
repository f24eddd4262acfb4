// ============================================
// File: crates/deco-common/src/lib.rs
// ============================================
//! # Deco Common - Shared Types Library
//!
//! ## Creation Reason
//! Provides the small value types and base error shared by every Deco
//! crate, so that tokens and MAC addresses have one representation
//! across crypto, transport and client code.
//!
//! ## Main Functionality
//! - [`types`]: `SessionToken`, `MacAddress`
//! - [`error`]: `CommonError` and the `Result` alias
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 deco-client                         │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                    │
//! │         ▼                     ▼                    │
//! │     deco-core           deco-transport             │
//! │         │                     │                    │
//! │         └──────────┬──────────┘                    │
//! │                    ▼                               │
//! │              deco-common  ◄── You are here         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Leaf crate: no internal dependencies
//! - `SessionToken` is a credential: never print it in `Debug` output
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;

pub use error::{CommonError, Result};
pub use types::{MacAddress, SessionToken};
