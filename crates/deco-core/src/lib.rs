// ============================================
// File: crates/deco-core/src/lib.rs
// ============================================
//! # Deco Core - Envelope Crypto & Codec Library
//!
//! ## Creation Reason
//! Holds everything about the Deco management protocol that does not
//! touch the network: credential hashing, AES session keys, RSA block
//! encryption with the device keys, and the envelope wire codec.
//!
//! ## Main Functionality
//!
//! ### Crypto Module ([`crypto`])
//! - `CredentialDeriver`: MD5 of `account || password`
//! - `AesSessionKey`: per-login AES-128 key + IV
//! - `PasswordKey` / `SignatureKey`: the two device RSA keys
//! - `EnvelopeCipher`: AES-128-CBC/PKCS#7 + base64
//!
//! ### Protocol Module ([`protocol`])
//! - Request/response message types
//! - `EnvelopeCodec`: seal a request body, open a response body
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 deco-client                         │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                    │
//! │         ▼                     ▼                    │
//! │     deco-core  ◄──      deco-transport             │
//! │   You are here               │                     │
//! │         └──────────┬──────────┘                    │
//! │                    ▼                               │
//! │              deco-common                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The cipher choices are dictated by the device firmware, not by us:
//!   AES-128-CBC/PKCS#7 and RSA PKCS#1 v1.5 with 512-bit keys
//! - ALL primitives come from RustCrypto; do not hand-roll any of them
//! - Key material implements Zeroize and is never printed
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod crypto;
pub mod error;
pub mod protocol;

pub use crypto::{
    AesCbcCipher, AesSessionKey, CredentialDeriver, CredentialHash, EnvelopeCipher,
    PasswordKey, RsaPublicKey, SignatureKey,
};
pub use error::{CoreError, Result};
pub use protocol::{EndpointRequest, EndpointResponse, EnvelopeCodec, SealParams, SealedEnvelope};
