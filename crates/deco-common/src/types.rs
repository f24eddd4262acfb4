// ============================================
// File: crates/deco-common/src/types.rs
// ============================================
//! # Core Type Definitions
//!
//! ## Creation Reason
//! Strongly typed wrappers for the two identifiers the device hands us
//! as bare strings: the session token ("stok") and node MAC addresses.
//!
//! ## Main Functionality
//! - `SessionToken`: opaque login credential, zeroized on drop
//! - `MacAddress`: six hex octets, always rendered uppercase
//!
//! ## ⚠️ Important Note for Next Developer
//! - MACs keep the layout the caller gave (`:`, `-` or no separator);
//!   only the case is normalized. Mixed separators collapse to the first
//!   one seen.
//! - `SessionToken` implements manual `Drop` + `Zeroize`
//!
//! ## Last Modified
//! v0.1.0 - Initial type definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use crate::error::{CommonError, Result};

// ============================================
// Constants
// ============================================

/// Number of octets in a MAC address.
pub const MAC_OCTETS: usize = 6;

// ============================================
// SessionToken
// ============================================

/// Session token issued by the device after a successful login.
///
/// The token is opaque: any non-empty string is accepted. Callers that
/// place it in a URL path must escape it (see
/// `deco_core::protocol::authenticated_path`).
///
/// # Example
/// ```
/// use deco_common::SessionToken;
///
/// let token = SessionToken::new("abc123").unwrap();
/// assert_eq!(token.as_str(), "abc123");
/// assert!(SessionToken::new("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Zeroize)]
pub struct SessionToken(String);

impl SessionToken {
    /// Creates a token from the raw `stok` string.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the token is empty.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(CommonError::invalid_input("stok", "cannot be empty"));
        }
        Ok(Self(raw))
    }

    /// Returns the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

impl Drop for SessionToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

// ============================================
// MacAddress
// ============================================

/// A node MAC address as submitted to the device.
///
/// Parsing accepts any case, `:` or `-` separators, or twelve bare hex
/// digits. `Display` always renders uppercase hex in the input's layout.
///
/// # Example
/// ```
/// use deco_common::MacAddress;
///
/// let mac: MacAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
/// assert_eq!(mac.to_string(), "AA:BB:CC:DD:EE:FF");
///
/// let bare: MacAddress = "aabbccddeeff".parse().unwrap();
/// assert_eq!(bare.to_string(), "AABBCCDDEEFF");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress {
    octets: [u8; MAC_OCTETS],
    separator: Option<char>,
}

impl MacAddress {
    /// Creates a colon-separated MAC address from raw octets.
    #[must_use]
    pub const fn from_octets(octets: [u8; MAC_OCTETS]) -> Self {
        Self {
            octets,
            separator: Some(':'),
        }
    }

    /// Returns the raw octets.
    #[must_use]
    pub const fn octets(&self) -> [u8; MAC_OCTETS] {
        self.octets
    }
}

fn parse_octet(part: &str) -> Result<u8> {
    if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CommonError::invalid_input(
            "mac",
            format!("octet '{part}' must be two hex digits"),
        ));
    }
    u8::from_str_radix(part, 16)
        .map_err(|_| CommonError::invalid_input("mac", format!("octet '{part}' is not hex")))
}

impl FromStr for MacAddress {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let separator = s.chars().find(|c| matches!(c, ':' | '-'));

        let parts: Vec<&str> = match separator {
            Some(_) => s.split([':', '-']).collect(),
            None if s.len() == MAC_OCTETS * 2 && s.is_ascii() => {
                (0..MAC_OCTETS).map(|i| &s[i * 2..i * 2 + 2]).collect()
            }
            None => vec![s],
        };
        if parts.len() != MAC_OCTETS {
            return Err(CommonError::invalid_input(
                "mac",
                format!("expected {MAC_OCTETS} octets, got {}", parts.len()),
            ));
        }

        let mut octets = [0u8; MAC_OCTETS];
        for (slot, part) in octets.iter_mut().zip(&parts) {
            *slot = parse_octet(part)?;
        }

        Ok(Self { octets, separator })
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, octet) in self.octets.iter().enumerate() {
            if let Some(sep) = self.separator.filter(|_| i > 0) {
                write!(f, "{sep}")?;
            }
            write!(f, "{octet:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddress({self})")
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================
// Tests
// ============================================
