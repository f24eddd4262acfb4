// ============================================
// File: crates/deco-core/src/protocol/codec.rs
// ============================================
//! # Envelope Codec
//!
//! ## Creation Reason
//! Turns a plaintext request body into the `sign`/`data` form fields the
//! device expects, and turns a device reply back into an
//! `EndpointResponse`. Pure functions of their inputs; no I/O and no
//! counter state (the caller owns the sequence).
//!
//! ## Wire Format
//! ```text
//! data = base64(AES-CBC(body))
//! n    = sequence + len(data)
//! sig  = "k=<key>&i=<iv>&h=<hash>&s=<n>"     (login only)
//!      | "h=<hash>&s=<n>"                    (every other call)
//! sign = hex(RSA_block(sig[0..c])) || hex(RSA_block(sig[c..2c])) || ...
//!        where c = modulus_bytes - 11
//!
//! POST body: sign=<urlenc(sign)>&data=<urlenc(data)>
//! ```
//!
//! ## Parsing Strategy
//! 1. Parse the outer JSON
//! 2. Non-zero outer `error_code` → `Device { code }`
//! 3. Take ciphertext from `data` (or a string `result`)
//! 4. Decrypt, parse inner `{error_code, result}`
//! 5. Non-zero inner `error_code` → `Device { code }`
//!
//! ## ⚠️ Important Note for Next Developer
//! - `s=` is not the raw sequence; the firmware checks
//!   `sequence + len(data)`. Observed on real traffic.
//! - Only the signature key may encrypt the signature. The password key
//!   is a different type and cannot be passed here.
//!
//! ## Last Modified
//! v0.1.0 - Initial codec implementation

use tracing::trace;

use crate::crypto::{AesCbcCipher, AesSessionKey, CredentialHash, EnvelopeCipher, SignatureKey};
use crate::error::{CoreError, Result};
use crate::protocol::messages::{EndpointResponse, WireResponse};

// ============================================
// SealParams / SealedEnvelope
// ============================================

/// Everything needed to seal one envelope.
#[derive(Debug, Clone, Copy)]
pub struct SealParams<'a> {
    /// Session AES key (encrypts the body).
    pub aes: &'a AesSessionKey,
    /// Device signature key (encrypts the signature).
    pub signer: &'a SignatureKey,
    /// Credential hash placed in `h=`.
    pub hash: &'a CredentialHash,
    /// Sequence value assigned to this envelope.
    pub sequence: u64,
    /// Whether to embed `k=`/`i=` (login only).
    pub embed_key: bool,
}

/// The two form fields of an encrypted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedEnvelope {
    /// Hex RSA blocks of the signature.
    pub sign: String,
    /// Base64 AES ciphertext of the body.
    pub data: String,
}

impl SealedEnvelope {
    /// Form fields in the order the firmware sends them.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("sign".to_string(), self.sign.clone()),
            ("data".to_string(), self.data.clone()),
        ]
    }
}

// ============================================
// EnvelopeCodec
// ============================================

/// Seals request bodies and opens responses.
///
/// # Type Parameters
/// * `C` - The body cipher (AES-128-CBC in production)
#[derive(Debug, Default, Clone)]
pub struct EnvelopeCodec<C = AesCbcCipher> {
    cipher: C,
}

impl EnvelopeCodec<AesCbcCipher> {
    /// Creates a codec using the firmware's AES-CBC cipher.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cipher: AesCbcCipher::new(),
        }
    }

    /// Opens an unencrypted reply (key negotiation).
    ///
    /// # Errors
    /// - `Device`: non-zero error code
    /// - `MalformedMessage`: bad JSON
    pub fn open_plain(body: &[u8]) -> Result<EndpointResponse> {
        EndpointResponse::from_slice(body)?.into_success()
    }
}

impl<C: EnvelopeCipher> EnvelopeCodec<C> {
    /// Creates a codec with a custom cipher.
    pub fn with_cipher(cipher: C) -> Self {
        Self { cipher }
    }

    /// Builds the signature text for one envelope.
    ///
    /// # Errors
    /// Returns `SequenceOverflow` if `sequence + data_len` exceeds `u64`.
    pub fn signature_text(params: &SealParams<'_>, data_len: usize) -> Result<String> {
        let signed_seq = u64::try_from(data_len)
            .ok()
            .and_then(|len| params.sequence.checked_add(len))
            .ok_or(CoreError::SequenceOverflow {
                sequence: params.sequence,
            })?;
        Ok(if params.embed_key {
            format!(
                "k={}&i={}&h={}&s={}",
                params.aes.key_text(),
                params.aes.iv_text(),
                params.hash.as_str(),
                signed_seq
            )
        } else {
            format!("h={}&s={}", params.hash.as_str(), signed_seq)
        })
    }

    /// Encrypts `body` and signs it.
    ///
    /// # Errors
    /// - `Encryption`: the AES or RSA step failed
    /// - `SequenceOverflow`: the signed sequence does not fit in `u64`
    pub fn seal(&self, params: &SealParams<'_>, body: &[u8]) -> Result<SealedEnvelope> {
        let data = self.cipher.encrypt(params.aes, body)?;
        let signature = Self::signature_text(params, data.len())?;
        let sign = params.signer.encrypt_signature(&signature)?;

        trace!(
            sequence = params.sequence,
            embed_key = params.embed_key,
            data_len = data.len(),
            "Envelope sealed"
        );

        Ok(SealedEnvelope { sign, data })
    }

    /// Opens an encrypted device reply.
    ///
    /// # Errors
    /// - `Device`: non-zero outer or inner error code
    /// - `MalformedMessage`: bad JSON, missing ciphertext, non-UTF-8 plaintext
    /// - `Decryption` / `Common(Decoding)`: bad ciphertext
    pub fn open(&self, aes: &AesSessionKey, body: &[u8]) -> Result<EndpointResponse> {
        let wire = WireResponse::from_slice(body)?;

        if let Some(code) = wire.error_code.filter(|&c| c != 0) {
            return Err(CoreError::Device { code });
        }

        let ciphertext = wire
            .ciphertext()
            .ok_or_else(|| CoreError::malformed("response carries no ciphertext"))?;

        let plaintext = self.cipher.decrypt(aes, ciphertext)?;
        if std::str::from_utf8(&plaintext).is_err() {
            return Err(CoreError::malformed("decrypted payload is not UTF-8"));
        }

        EndpointResponse::from_slice(&plaintext)?.into_success()
    }

    /// Encrypts an already-built reply body, as the device would.
    ///
    /// Used by device simulators; the production client never calls it.
    ///
    /// # Errors
    /// Returns `Encryption` if the cipher fails.
    pub fn seal_reply(&self, aes: &AesSessionKey, reply: &[u8]) -> Result<String> {
        let data = self.cipher.encrypt(aes, reply)?;
        Ok(serde_json::json!({ "data": data }).to_string())
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{CredentialDeriver, RsaPublicKey};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rsa::{Pkcs1v15Encrypt, RsaPrivateKey};

    struct Fixture {
        private: RsaPrivateKey,
        signer: SignatureKey,
        aes: AesSessionKey,
        hash: CredentialHash,
    }

    fn fixture() -> Fixture {
        let mut rng = StdRng::seed_from_u64(11);
        let private = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        let signer = SignatureKey::new(RsaPublicKey::from_rsa(private.to_public_key()));
        Fixture {
            private,
            signer,
            aes: AesSessionKey::from_text("1234567890123456", "1111222233334444").unwrap(),
            hash: CredentialDeriver::default().derive("password"),
        }
    }

    fn decrypt_sign(private: &RsaPrivateKey, sign: &str) -> String {
        let raw = hex::decode(sign).unwrap();
        let bytes: Vec<u8> = raw
            .chunks(128)
            .flat_map(|block| private.decrypt(Pkcs1v15Encrypt, block).unwrap())
            .collect();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_login_signature_embeds_key() {
        let fx = fixture();
        let codec = EnvelopeCodec::new();
        let params = SealParams {
            aes: &fx.aes,
            signer: &fx.signer,
            hash: &fx.hash,
            sequence: 100,
            embed_key: true,
        };

        let sealed = codec.seal(&params, br#"{"operation":"login"}"#).unwrap();
        let signature = decrypt_sign(&fx.private, &sealed.sign);

        let expected = format!(
            "k=1234567890123456&i=1111222233334444&h={}&s={}",
            fx.hash.as_str(),
            100 + sealed.data.len()
        );
        assert_eq!(signature, expected);
    }

    #[test]
    fn test_regular_signature_omits_key() {
        let fx = fixture();
        let codec = EnvelopeCodec::new();
        let params = SealParams {
            aes: &fx.aes,
            signer: &fx.signer,
            hash: &fx.hash,
            sequence: 7,
            embed_key: false,
        };

        let sealed = codec.seal(&params, br#"{"operation":"read"}"#).unwrap();
        let signature = decrypt_sign(&fx.private, &sealed.sign);

        assert!(!signature.contains("k="));
        assert!(signature.starts_with(&format!("h={}", fx.hash.as_str())));
        assert!(signature.ends_with(&format!("s={}", 7 + sealed.data.len())));
    }

    #[test]
    fn test_signed_sequence_overflow_is_error() {
        let fx = fixture();
        let codec = EnvelopeCodec::new();
        let params = SealParams {
            aes: &fx.aes,
            signer: &fx.signer,
            hash: &fx.hash,
            sequence: u64::MAX - 3,
            embed_key: false,
        };

        let err = codec.seal(&params, br#"{"operation":"read"}"#).unwrap_err();
        assert!(matches!(err, CoreError::SequenceOverflow { sequence } if sequence == u64::MAX - 3));
    }

    #[test]
    fn test_open_roundtrip() {
        let fx = fixture();
        let codec = EnvelopeCodec::new();
        let reply = codec
            .seal_reply(&fx.aes, br#"{"error_code":0,"result":{"cpu_usage":0.5}}"#)
            .unwrap();

        let response = codec.open(&fx.aes, reply.as_bytes()).unwrap();
        assert_eq!(response.error_code, 0);
        assert_eq!(response.result["cpu_usage"], 0.5);
    }

    #[test]
    fn test_open_outer_error_code() {
        let fx = fixture();
        let codec = EnvelopeCodec::new();
        let err = codec.open(&fx.aes, br#"{"error_code":-40401}"#).unwrap_err();
        assert_eq!(err.device_code(), Some(-40401));
    }

    #[test]
    fn test_open_inner_error_code() {
        let fx = fixture();
        let codec = EnvelopeCodec::new();
        let reply = codec
            .seal_reply(&fx.aes, br#"{"error_code":-5002,"result":{}}"#)
            .unwrap();
        let err = codec.open(&fx.aes, reply.as_bytes()).unwrap_err();
        assert_eq!(err.device_code(), Some(-5002));
    }

    #[test]
    fn test_open_without_ciphertext() {
        let fx = fixture();
        let codec = EnvelopeCodec::new();
        let err = codec.open(&fx.aes, br#"{"error_code":0}"#).unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_open_garbage_plaintext() {
        let fx = fixture();
        let codec = EnvelopeCodec::new();
        let reply = codec.seal_reply(&fx.aes, b"not json at all").unwrap();
        let err = codec.open(&fx.aes, reply.as_bytes()).unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_open_plain() {
        let response = EnvelopeCodec::open_plain(
            br#"{"error_code":0,"result":{"password":["c3","010001"]}}"#,
        )
        .unwrap();
        assert!(response.result["password"].is_array());

        let err = EnvelopeCodec::open_plain(br#"{"error_code":1}"#).unwrap_err();
        assert_eq!(err.device_code(), Some(1));
    }
}
