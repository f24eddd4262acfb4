// ============================================
// File: crates/deco-core/src/crypto/keys.rs
// ============================================
//! # Cryptographic Key Types
//!
//! ## Creation Reason
//! Defines the key material of one Deco session with proper security
//! properties (Zeroize on drop, no key bytes in `Debug`).
//!
//! ## Main Functionality
//! - `AesSessionKey`: locally generated AES-128 key + IV
//! - `RsaPublicKey`: device RSA key parsed from `[modulus_hex, exponent_hex]`
//! - `PasswordKey`: RSA key that only encrypts the login password
//! - `SignatureKey`: RSA key that only encrypts envelope signatures
//!
//! ## Key Lifecycle
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  AesSessionKey (Per-login)                                 │
//! │  ├─ Generated fresh for each authenticate()                │
//! │  ├─ Sent to the device once, inside the login signature    │
//! │  └─ Discarded when the session is dropped or replaced      │
//! │                                                            │
//! │  PasswordKey (Per-login)                                   │
//! │  └─ Fetched with form=keys, encrypts the password only     │
//! │                                                            │
//! │  SignatureKey (Per-login)                                  │
//! │  └─ Fetched with form=auth, encrypts every signature       │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The firmware echoes key and IV back as text inside the signature
//!   (`k=...&i=...`), so both are 16 ASCII decimal digits, not random
//!   bytes. Changing this breaks login.
//!
//! ## Last Modified
//! v0.1.0 - Initial key type definitions

use std::fmt;

use rand::rngs::OsRng;
use rand::Rng;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pkcs1v15Encrypt};
use zeroize::Zeroize;

use super::{AES_BLOCK_SIZE, AES_KEY_SIZE, MAX_RSA_MODULUS_BITS, PKCS1_V15_OVERHEAD};
use crate::error::{CoreError, Result};

// ============================================
// AesSessionKey
// ============================================

/// AES-128 key and CBC IV for one authenticated session.
///
/// # Example
/// ```
/// use deco_core::AesSessionKey;
///
/// let key = AesSessionKey::generate();
/// assert_eq!(key.key_text().len(), 16);
/// assert!(key.key_text().chars().all(|c| c.is_ascii_digit()));
/// ```
#[derive(Clone, Zeroize)]
pub struct AesSessionKey {
    key: [u8; AES_KEY_SIZE],
    iv: [u8; AES_BLOCK_SIZE],
}

impl AesSessionKey {
    /// Generates a fresh key and IV using the OS random number generator.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_with(&mut OsRng)
    }

    /// Generates a key and IV from the supplied RNG.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut key = [0u8; AES_KEY_SIZE];
        let mut iv = [0u8; AES_BLOCK_SIZE];
        for byte in key.iter_mut().chain(iv.iter_mut()) {
            *byte = b'0' + rng.gen_range(0..10u8);
        }
        Self { key, iv }
    }

    /// Rebuilds a key from the textual form carried in a login signature.
    ///
    /// # Errors
    /// Returns `KeyFormat` if either part is not exactly 16 ASCII bytes.
    pub fn from_text(key: &str, iv: &str) -> Result<Self> {
        fn take<const N: usize>(field: &str, text: &str) -> Result<[u8; N]> {
            if !text.is_ascii() {
                return Err(CoreError::key_format(format!("AES {field} is not ASCII")));
            }
            text.as_bytes().try_into().map_err(|_| {
                CoreError::key_format(format!(
                    "AES {field} must be {N} bytes, got {}",
                    text.len()
                ))
            })
        }

        Ok(Self {
            key: take::<AES_KEY_SIZE>("key", key)?,
            iv: take::<AES_BLOCK_SIZE>("iv", iv)?,
        })
    }

    /// Raw key bytes.
    #[must_use]
    pub const fn key_bytes(&self) -> &[u8; AES_KEY_SIZE] {
        &self.key
    }

    /// Raw IV bytes.
    #[must_use]
    pub const fn iv_bytes(&self) -> &[u8; AES_BLOCK_SIZE] {
        &self.iv
    }

    /// Key as the text placed in the `k=` signature field.
    #[must_use]
    pub fn key_text(&self) -> String {
        self.key.iter().map(|&b| char::from(b)).collect()
    }

    /// IV as the text placed in the `i=` signature field.
    #[must_use]
    pub fn iv_text(&self) -> String {
        self.iv.iter().map(|&b| char::from(b)).collect()
    }
}

impl fmt::Debug for AesSessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesSessionKey").finish_non_exhaustive()
    }
}

impl Drop for AesSessionKey {
    fn drop(&mut self) {
        self.key.zeroize();
        self.iv.zeroize();
    }
}

// ============================================
// RsaPublicKey
// ============================================

/// RSA public key announced by the device.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPublicKey(rsa::RsaPublicKey);

impl RsaPublicKey {
    /// Parses a key from hex modulus and exponent strings.
    ///
    /// # Errors
    /// Returns `KeyFormat` if either part is empty, not hex, or the
    /// resulting key is rejected by the RSA implementation.
    pub fn from_hex(modulus: &str, exponent: &str) -> Result<Self> {
        let n = parse_hex_uint("modulus", modulus)?;
        let e = parse_hex_uint("exponent", exponent)?;

        if n.bits() > MAX_RSA_MODULUS_BITS {
            return Err(CoreError::key_format(format!(
                "modulus is {} bits, limit is {MAX_RSA_MODULUS_BITS}",
                n.bits()
            )));
        }

        let key = rsa::RsaPublicKey::new(n, e)
            .map_err(|e| CoreError::key_format(format!("rejected key: {e}")))?;
        Ok(Self(key))
    }

    /// Parses the `[modulus_hex, exponent_hex]` pair the device sends.
    ///
    /// # Errors
    /// Returns `KeyFormat` unless the slice has exactly two valid parts.
    pub fn from_wire(parts: &[String]) -> Result<Self> {
        match parts {
            [modulus, exponent] => Self::from_hex(modulus, exponent),
            _ => Err(CoreError::key_format(format!(
                "expected [modulus, exponent], got {} element(s)",
                parts.len()
            ))),
        }
    }

    /// Wraps an existing `rsa` key.
    #[must_use]
    pub const fn from_rsa(key: rsa::RsaPublicKey) -> Self {
        Self(key)
    }

    /// Modulus length in bytes (the size of one ciphertext block).
    #[must_use]
    pub fn modulus_len(&self) -> usize {
        self.0.size()
    }

    /// Largest plaintext that fits in one PKCS#1 v1.5 block.
    #[must_use]
    pub fn block_capacity(&self) -> usize {
        self.modulus_len().saturating_sub(PKCS1_V15_OVERHEAD)
    }

    /// Encrypts `plaintext` block by block and hex-encodes the
    /// concatenated ciphertext.
    fn encrypt_blocks(&self, plaintext: &[u8]) -> Result<String> {
        let capacity = self.block_capacity();
        if capacity == 0 {
            return Err(CoreError::encryption("RSA modulus too small for PKCS#1 v1.5"));
        }

        let mut rng = OsRng;
        let mut encrypt = |chunk: &[u8]| {
            self.0
                .encrypt(&mut rng, Pkcs1v15Encrypt, chunk)
                .map(hex::encode)
                .map_err(|e| CoreError::encryption(format!("RSA block: {e}")))
        };

        if plaintext.is_empty() {
            return encrypt(&[]);
        }

        let mut out = String::with_capacity(
            plaintext.len().div_ceil(capacity) * self.modulus_len() * 2,
        );
        for chunk in plaintext.chunks(capacity) {
            out.push_str(&encrypt(chunk)?);
        }
        Ok(out)
    }
}

impl fmt::Debug for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPublicKey")
            .field("bits", &(self.modulus_len() * 8))
            .finish()
    }
}

fn parse_hex_uint(field: &str, text: &str) -> Result<BigUint> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CoreError::key_format(format!("{field} is empty")));
    }
    BigUint::parse_bytes(text.as_bytes(), 16)
        .ok_or_else(|| CoreError::key_format(format!("{field} is not hex")))
}

// ============================================
// PasswordKey / SignatureKey
// ============================================

/// The RSA key from `form=keys`. Only ever encrypts the login password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordKey(RsaPublicKey);

impl PasswordKey {
    /// Wraps the negotiated key.
    #[must_use]
    pub const fn new(key: RsaPublicKey) -> Self {
        Self(key)
    }

    /// The underlying RSA key.
    #[must_use]
    pub const fn as_rsa(&self) -> &RsaPublicKey {
        &self.0
    }

    /// Encrypts the password into a single hex-encoded RSA block.
    ///
    /// # Errors
    /// Returns `Encryption` if the password does not fit in one block.
    pub fn encrypt_password(&self, password: &str) -> Result<String> {
        if password.len() > self.0.block_capacity() {
            return Err(CoreError::encryption(format!(
                "password longer than {} bytes",
                self.0.block_capacity()
            )));
        }
        self.0.encrypt_blocks(password.as_bytes())
    }
}

/// The RSA key from `form=auth`. Only ever encrypts envelope signatures,
/// which is how the AES key reaches the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureKey(RsaPublicKey);

impl SignatureKey {
    /// Wraps the negotiated key.
    #[must_use]
    pub const fn new(key: RsaPublicKey) -> Self {
        Self(key)
    }

    /// The underlying RSA key.
    #[must_use]
    pub const fn as_rsa(&self) -> &RsaPublicKey {
        &self.0
    }

    /// Encrypts a signature string, splitting it across as many RSA
    /// blocks as needed.
    ///
    /// # Errors
    /// Returns `Encryption` if any block fails to encrypt.
    pub fn encrypt_signature(&self, signature: &str) -> Result<String> {
        self.0.encrypt_blocks(signature.as_bytes())
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rsa::RsaPrivateKey;

    fn test_keypair() -> (RsaPrivateKey, RsaPublicKey) {
        let mut rng = StdRng::seed_from_u64(7);
        let private = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        let public = RsaPublicKey::from_rsa(private.to_public_key());
        (private, public)
    }

    fn decrypt_blocks(private: &RsaPrivateKey, hex_blocks: &str) -> Vec<u8> {
        let raw = hex::decode(hex_blocks).unwrap();
        raw.chunks(private.size())
            .flat_map(|block| private.decrypt(Pkcs1v15Encrypt, block).unwrap())
            .collect()
    }

    #[test]
    fn test_aes_key_is_decimal_text() {
        let key = AesSessionKey::generate();
        assert!(key.key_text().bytes().all(|b| b.is_ascii_digit()));
        assert!(key.iv_text().bytes().all(|b| b.is_ascii_digit()));
        assert_eq!(key.key_text().len(), AES_KEY_SIZE);
    }

    #[test]
    fn test_aes_key_from_text_roundtrip() {
        let key = AesSessionKey::generate();
        let restored = AesSessionKey::from_text(&key.key_text(), &key.iv_text()).unwrap();
        assert_eq!(restored.key_bytes(), key.key_bytes());
        assert_eq!(restored.iv_bytes(), key.iv_bytes());
    }

    #[test]
    fn test_aes_key_from_text_rejects_bad_length() {
        assert!(AesSessionKey::from_text("123", "1234567890123456").is_err());
        assert!(AesSessionKey::from_text("1234567890123456", "").is_err());
    }

    #[test]
    fn test_aes_key_debug_hides_material() {
        let key = AesSessionKey::from_text("1111222233334444", "5555666677778888").unwrap();
        let printed = format!("{key:?}");
        assert!(!printed.contains("1111"));
        assert!(!printed.contains("5555"));
    }

    #[test]
    fn test_rsa_from_hex() {
        let (private, _) = test_keypair();
        let modulus = private.n().to_str_radix(16);
        let key = RsaPublicKey::from_hex(&modulus, "010001").unwrap();
        assert_eq!(key.modulus_len(), 128);
        assert_eq!(key.block_capacity(), 117);
    }

    #[test]
    fn test_rsa_from_wire_rejects_wrong_arity() {
        let err = RsaPublicKey::from_wire(&["abcd".to_string()]).unwrap_err();
        assert!(matches!(err, CoreError::KeyFormat { .. }));
    }

    #[test]
    fn test_rsa_from_hex_rejects_garbage() {
        assert!(matches!(
            RsaPublicKey::from_hex("not-hex", "010001"),
            Err(CoreError::KeyFormat { .. })
        ));
        assert!(matches!(
            RsaPublicKey::from_hex("", "010001"),
            Err(CoreError::KeyFormat { .. })
        ));
    }

    #[test]
    fn test_signature_spans_multiple_blocks() {
        let (private, public) = test_keypair();
        let signer = SignatureKey::new(public);
        let text = "h=".to_string() + &"a".repeat(200);

        let hex_blocks = signer.encrypt_signature(&text).unwrap();
        // 202 bytes at 117 per block -> 2 blocks of 128 bytes
        assert_eq!(hex_blocks.len(), 2 * 128 * 2);
        assert_eq!(decrypt_blocks(&private, &hex_blocks), text.as_bytes());
    }

    #[test]
    fn test_password_single_block() {
        let (private, public) = test_keypair();
        let key = PasswordKey::new(public);

        let hex_block = key.encrypt_password("hunter2").unwrap();
        assert_eq!(hex_block.len(), 128 * 2);
        assert_eq!(decrypt_blocks(&private, &hex_block), b"hunter2");
    }

    #[test]
    fn test_password_too_long_is_rejected() {
        let (_, public) = test_keypair();
        let key = PasswordKey::new(public);
        let err = key.encrypt_password(&"x".repeat(200)).unwrap_err();
        assert!(err.is_crypto_error());
    }
}
