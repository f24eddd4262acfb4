// ============================================
// File: crates/deco-core/src/crypto/cipher.rs
// ============================================
//! # Envelope Encryption
//!
//! ## Creation Reason
//! Encrypts request bodies and decrypts response bodies with the
//! per-session AES key, in the exact form the firmware expects.
//!
//! ## Main Functionality
//! - `EnvelopeCipher`: trait for body encryption/decryption
//! - `AesCbcCipher`: production implementation
//!
//! ## Payload Format
//! ```text
//! data = base64( AES-128-CBC( key, iv, PKCS7(plaintext) ) )
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - CBC gives no integrity: a wrong key usually shows up as a padding
//!   error, but may decrypt to garbage. Callers must still parse the
//!   plaintext defensively.
//! - The IV is fixed for the whole session; this mirrors the firmware
//!
//! ## Last Modified
//! v0.1.0 - Initial envelope cipher

use aes::Aes128;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use deco_common::CommonError;

use super::keys::AesSessionKey;
use crate::error::{CoreError, Result};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

// ============================================
// EnvelopeCipher Trait
// ============================================

/// Trait for envelope body encryption.
///
/// # Purpose
/// Keeps the envelope codec independent of the concrete cipher so tests
/// can observe plaintexts and a firmware variant can swap the mode.
pub trait EnvelopeCipher: Send + Sync {
    /// Encrypts `plaintext` and returns the base64 text sent as `data`.
    ///
    /// # Errors
    /// - `Encryption`: if the cipher cannot be initialized
    fn encrypt(&self, key: &AesSessionKey, plaintext: &[u8]) -> Result<String>;

    /// Decodes base64 `data` and decrypts it.
    ///
    /// # Errors
    /// - `Common(Decoding)`: if `data` is not valid base64
    /// - `Decryption`: if the padding is invalid (usually a wrong key)
    fn decrypt(&self, key: &AesSessionKey, data: &str) -> Result<Vec<u8>>;
}

// ============================================
// AesCbcCipher
// ============================================

/// AES-128-CBC with PKCS#7 padding and standard base64.
#[derive(Debug, Default, Clone, Copy)]
pub struct AesCbcCipher;

impl AesCbcCipher {
    /// Creates a new instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EnvelopeCipher for AesCbcCipher {
    fn encrypt(&self, key: &AesSessionKey, plaintext: &[u8]) -> Result<String> {
        let cipher = Aes128CbcEnc::new_from_slices(key.key_bytes(), key.iv_bytes())
            .map_err(|_| CoreError::encryption("failed to initialize AES-CBC"))?;
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);
        Ok(BASE64.encode(ciphertext))
    }

    fn decrypt(&self, key: &AesSessionKey, data: &str) -> Result<Vec<u8>> {
        let ciphertext = BASE64
            .decode(data.trim())
            .map_err(|e| CommonError::decoding("envelope base64", e))?;

        let cipher = Aes128CbcDec::new_from_slices(key.key_bytes(), key.iv_bytes())
            .map_err(|_| CoreError::decryption("failed to initialize AES-CBC"))?;
        cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CoreError::decryption("invalid padding or block length"))
    }
}

// ============================================
// Tests
// ============================================
