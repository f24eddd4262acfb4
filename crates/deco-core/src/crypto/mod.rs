// ============================================
// File: crates/deco-core/src/crypto/mod.rs
// ============================================
//! # Cryptography Module
//!
//! ## Creation Reason
//! Centralizes the primitives the device firmware expects, using audited
//! RustCrypto implementations.
//!
//! ### Submodules
//! - [`credential`]: Credential hash (MD5 of account || password)
//! - [`keys`]: AES session key and the two device RSA keys
//! - [`cipher`]: Envelope encryption (AES-128-CBC/PKCS#7 + base64)
//!
//! ## Cryptographic Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Key Negotiation                          │
//! │  Client                                        Device       │
//! │    │  form=keys ─────────────────────────────────► │        │
//! │    │ ◄──────────────────────────── password RSA key│        │
//! │    │  form=auth ─────────────────────────────────► │        │
//! │    │ ◄──────────────────── signature RSA key + seq │        │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Login Envelope                           │
//! │   password ──► PasswordKey (RSA) ──► hex ─┐                 │
//! │                                           ▼                 │
//! │   {"operation":"login",...} ──► AES-CBC ──► data            │
//! │   k=<key>&i=<iv>&h=<hash>&s=<seq> ──► SignatureKey ──► sign │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The password key and the signature key must never be swapped;
//!   they are distinct types so the compiler enforces it
//! - MD5 and PKCS#1 v1.5 are weak; they are used only because the
//!   firmware requires them
//!
//! ## Last Modified
//! v0.1.0 - Initial crypto implementation

pub mod cipher;
pub mod credential;
pub mod keys;

pub use cipher::{AesCbcCipher, EnvelopeCipher};
pub use credential::{CredentialDeriver, CredentialHash};
pub use keys::{AesSessionKey, PasswordKey, RsaPublicKey, SignatureKey};

// ============================================
// Constants
// ============================================

/// AES-128 key size in bytes.
pub const AES_KEY_SIZE: usize = 16;

/// AES block size (and CBC IV size) in bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// Bytes of PKCS#1 v1.5 padding overhead per RSA block.
pub const PKCS1_V15_OVERHEAD: usize = 11;

/// Largest modulus the device has been seen to send, in bits.
pub const MAX_RSA_MODULUS_BITS: usize = 4096;

/// Account name the firmware hardcodes for the owner login.
pub const DEFAULT_ACCOUNT: &str = "admin";
