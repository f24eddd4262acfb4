// ============================================
// File: crates/deco-client/src/testing.rs
// ============================================
//! # Simulated Deco Device
//!
//! ## Creation Reason
//! A device double that speaks the real protocol: it holds the RSA
//! private keys, learns the AES key from the login signature, checks the
//! credential hash and signed sequence, and encrypts its replies. Lets
//! the whole login and envelope flow run without a network.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Test-only; RSA key generation is done once per test binary
//! - Replies are canned per `form`; override with `set_reply`
//!
//! ## Last Modified
//! v0.1.0 - Initial simulator

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey};
use serde_json::{json, Value};

use deco_core::protocol::ERROR_BAD_CREDENTIALS;
use deco_core::{
    AesCbcCipher, AesSessionKey, CredentialDeriver, EnvelopeCipher, EnvelopeCodec, PasswordKey,
    RsaPublicKey, SignatureKey,
};
use deco_transport::{HttpRequest, HttpResponse, MockTransport, Responder, TransportError};

use crate::services::{SessionKeys, SessionState};

/// Password the fake device accepts.
pub const FAKE_PASSWORD: &str = "hunter2";

/// Token the fake device issues.
pub const FAKE_STOK: &str = "3a5b7c9d1e2f";

/// Sequence baseline announced by `form=auth`.
pub const FAKE_SEQ: u64 = 978_653_421;

fn device_keys() -> &'static (RsaPrivateKey, RsaPrivateKey) {
    static KEYS: OnceLock<(RsaPrivateKey, RsaPrivateKey)> = OnceLock::new();
    KEYS.get_or_init(|| {
        let mut rng = StdRng::seed_from_u64(0xdec0);
        let password = RsaPrivateKey::new(&mut rng, 1024).expect("password key");
        let session = RsaPrivateKey::new(&mut rng, 1024).expect("session key");
        (password, session)
    })
}

fn wire_key(key: &RsaPrivateKey) -> Value {
    json!([key.n().to_str_radix(16), key.e().to_str_radix(16)])
}

fn rsa_decrypt(key: &RsaPrivateKey, hex_blocks: &str) -> Vec<u8> {
    let raw = hex::decode(hex_blocks).expect("sign is hex");
    raw.chunks(key.size())
        .flat_map(|block| key.decrypt(Pkcs1v15Encrypt, block).expect("RSA block"))
        .collect()
}

fn signature_fields(signature: &str) -> HashMap<String, String> {
    signature
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ============================================
// FakeDevice
// ============================================

/// One envelope as the device decoded it.
#[derive(Debug, Clone)]
pub struct SeenEnvelope {
    /// Request path.
    pub path: String,
    /// `form` query value.
    pub form: String,
    /// Decrypted signature text.
    pub signature: String,
    /// Decrypted body.
    pub body: Value,
    /// Sequence value recovered from `s=`.
    pub sequence: u64,
}

#[derive(Default)]
struct DeviceState {
    aes: Option<AesSessionKey>,
    envelopes: Vec<SeenEnvelope>,
    replies: HashMap<String, Value>,
    login_reply: Option<Value>,
}

/// Protocol-level device double.
pub struct FakeDevice {
    codec: EnvelopeCodec,
    hash: String,
    state: Mutex<DeviceState>,
}

impl FakeDevice {
    pub fn new() -> Self {
        let mut replies = HashMap::new();
        replies.insert(
            "performance".to_string(),
            json!({"error_code": 0, "result": {"cpu_usage": 0.12, "mem_usage": 0.34}}),
        );
        replies.insert(
            "device_list".to_string(),
            json!({"error_code": 0, "result": {"device_list": [
                {"device_ip": "192.168.68.1", "mac": "AA-BB-CC-00-00-01", "role": "master",
                 "nickname": "living_room", "software_ver": "1.5.8", "inet_status": "online"},
                {"device_ip": "192.168.68.2", "mac": "AA-BB-CC-00-00-02", "role": "slave",
                 "nickname": "office", "signal_level": {"band2_4": "2", "band5": "3"}}
            ]}}),
        );
        replies.insert(
            "client_list".to_string(),
            json!({"error_code": 0, "result": {"client_list": [
                {"mac": "11-22-33-44-55-66", "ip": "192.168.68.100", "name": "VGVzdA==",
                 "online": true, "wire_type": "wireless", "down_speed": 120, "up_speed": 30},
                {"mac": "11-22-33-44-55-77", "ip": "192.168.68.101", "name": "kitchen tv!",
                 "online": false, "wire_type": "wired"}
            ]}}),
        );
        replies.insert("system".to_string(), json!({"error_code": 0, "result": {}}));

        Self {
            codec: EnvelopeCodec::new(),
            hash: CredentialDeriver::default().derive(FAKE_PASSWORD).as_str().to_string(),
            state: Mutex::new(DeviceState {
                replies,
                ..DeviceState::default()
            }),
        }
    }

    /// Wraps the device in a mock transport.
    pub fn transport(self: &Arc<Self>) -> Arc<MockTransport> {
        Arc::new(MockTransport::with_responder(self.clone()))
    }

    /// Builds a client-side state as if key negotiation had just
    /// completed, and teaches the device its AES key.
    pub fn negotiated_state(&self) -> SessionState {
        let (password, session) = device_keys();
        let aes = AesSessionKey::generate();
        self.state.lock().aes = Some(aes.clone());

        SessionState::negotiated(
            SessionKeys {
                aes,
                password_key: PasswordKey::new(RsaPublicKey::from_rsa(password.to_public_key())),
                signature_key: SignatureKey::new(RsaPublicKey::from_rsa(session.to_public_key())),
                hash: CredentialDeriver::default().derive(FAKE_PASSWORD),
            },
            FAKE_SEQ,
        )
    }

    /// Replaces the canned reply for `form`.
    pub fn set_reply(&self, form: &str, reply: Value) {
        self.state.lock().replies.insert(form.to_string(), reply);
    }

    /// Replaces the login reply.
    pub fn set_login_reply(&self, reply: Value) {
        self.state.lock().login_reply = Some(reply);
    }

    /// All envelopes received, in order.
    pub fn envelopes(&self) -> Vec<SeenEnvelope> {
        self.state.lock().envelopes.clone()
    }

    /// Sequence values of all envelopes received.
    pub fn sequences(&self) -> Vec<u64> {
        self.envelopes().iter().map(|e| e.sequence).collect()
    }

    fn plain(body: &Value) -> HttpResponse {
        HttpResponse::ok(body.to_string())
    }

    fn sealed(&self, aes: &AesSessionKey, reply: &Value) -> HttpResponse {
        let body = self
            .codec
            .seal_reply(aes, reply.to_string().as_bytes())
            .expect("seal reply");
        HttpResponse::ok(body)
    }

    /// Decodes `sign`/`data`; returns the envelope and the AES key used.
    fn open_envelope(
        &self,
        request: &HttpRequest,
        state: &mut DeviceState,
    ) -> Option<(SeenEnvelope, AesSessionKey)> {
        let (_, session) = device_keys();
        let sign = request.body.form_value("sign")?;
        let data = request.body.form_value("data")?;

        let signature = String::from_utf8(rsa_decrypt(session, sign)).ok()?;
        let fields = signature_fields(&signature);

        if let (Some(k), Some(i)) = (fields.get("k"), fields.get("i")) {
            state.aes = Some(AesSessionKey::from_text(k, i).ok()?);
        }
        let aes = state.aes.clone()?;

        let signed: u64 = fields.get("s")?.parse().ok()?;
        let sequence = signed.checked_sub(data.len() as u64)?;

        let plaintext = AesCbcCipher::new().decrypt(&aes, data).ok()?;
        let body: Value = serde_json::from_slice(&plaintext).ok()?;

        Some((
            SeenEnvelope {
                path: request.path.clone(),
                form: request.form.clone(),
                signature,
                body,
                sequence,
            },
            aes,
        ))
    }

    fn hash_matches(&self, envelope: &SeenEnvelope) -> bool {
        signature_fields(&envelope.signature).get("h") == Some(&self.hash)
    }

    fn login_reply(&self, envelope: &SeenEnvelope, state: &DeviceState) -> Value {
        if let Some(reply) = &state.login_reply {
            return reply.clone();
        }
        let (password_key, _) = device_keys();
        let accepted = self.hash_matches(envelope)
            && envelope.body["params"]["password"]
                .as_str()
                .map(|hex_pw| rsa_decrypt(password_key, hex_pw))
                .is_some_and(|pw| pw == FAKE_PASSWORD.as_bytes());

        if accepted {
            json!({"error_code": 0, "result": {"stok": FAKE_STOK}})
        } else {
            json!({"error_code": ERROR_BAD_CREDENTIALS, "result": {}})
        }
    }
}

impl Default for FakeDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Responder for FakeDevice {
    fn respond(&self, request: &HttpRequest) -> deco_transport::Result<HttpResponse> {
        let (password_key, session_key) = device_keys();

        if request.path == ";stok=/login" {
            match request.form.as_str() {
                "keys" => {
                    return Ok(Self::plain(
                        &json!({"error_code": 0, "result": {"password": wire_key(password_key)}}),
                    ))
                }
                "auth" => {
                    return Ok(Self::plain(&json!({"error_code": 0, "result": {
                        "key": wire_key(session_key),
                        "seq": FAKE_SEQ
                    }})))
                }
                _ => {}
            }
        }

        let mut state = self.state.lock();
        let Some((envelope, aes)) = self.open_envelope(request, &mut state) else {
            return Ok(Self::plain(&json!({"error_code": -40401})));
        };

        let reply = if request.path == ";stok=/login" {
            self.login_reply(&envelope, &state)
        } else if request.path.starts_with(&format!(";stok={FAKE_STOK}/")) {
            if !self.hash_matches(&envelope) {
                return Ok(Self::plain(&json!({"error_code": -40401})));
            }
            state
                .replies
                .get(&request.form)
                .cloned()
                .unwrap_or_else(|| json!({"error_code": 0, "result": {"form": request.form}}))
        } else {
            return Err(TransportError::HttpStatus { status: 403 });
        };

        state.envelopes.push(envelope);
        Ok(self.sealed(&aes, &reply))
    }
}
