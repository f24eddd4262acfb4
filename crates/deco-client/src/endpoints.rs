// ============================================
// File: crates/deco-client/src/endpoints.rs
// ============================================
//! # Endpoint Catalog
//!
//! ## Creation Reason
//! Path suffix, form and request body of every read-only endpoint the
//! client knows about, in one place.
//!
//! ## Catalog
//! ```text
//! endpoint      path              form          params
//! ────────────  ────────────────  ────────────  ───────────────────────
//! DeviceList    /admin/device     device_list   -
//! Performance   /admin/network    performance   -
//! ClientList    /admin/client     client_list   device_mac=default
//! Wlan          /admin/wireless   wlan          -
//! LanIpv4       /admin/network    lan_ip        device_mac=default
//! LanIpv6       /admin/network    ipv6          device_mac=default
//! Wan           /admin/network    wan_ipv4      -
//! Internet      /admin/network    internet      -
//! Mode          /admin/device     mode          -
//! Advanced      /admin/wireless   power         -
//! DhcpDial      /admin/network    dhcp_dial     -
//! ```
//!
//! ## Last Modified
//! v0.1.0 - Initial catalog

use std::fmt;

use deco_core::EndpointRequest;

/// Path suffix of the device administration endpoints.
pub const DEVICE_PATH: &str = "/admin/device";

/// Path suffix of the network endpoints.
pub const NETWORK_PATH: &str = "/admin/network";

/// Path suffix of the client endpoints.
pub const CLIENT_PATH: &str = "/admin/client";

/// Path suffix of the wireless endpoints.
pub const WIRELESS_PATH: &str = "/admin/wireless";

/// Form used for reboot requests.
pub const FORM_SYSTEM: &str = "system";

/// `device_mac` value meaning "the main node".
pub const DEFAULT_DEVICE_MAC: &str = "default";

/// Read-only endpoints known to work on current firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownEndpoint {
    /// Mesh nodes.
    DeviceList,
    /// CPU and memory usage.
    Performance,
    /// Connected clients.
    ClientList,
    /// Wireless network settings.
    Wlan,
    /// LAN IPv4 settings.
    LanIpv4,
    /// LAN IPv6 settings.
    LanIpv6,
    /// WAN IPv4 settings.
    Wan,
    /// Internet connection status.
    Internet,
    /// Router or access-point mode.
    Mode,
    /// Wireless transmit power.
    Advanced,
    /// DHCP client settings of the WAN port.
    DhcpDial,
}

impl KnownEndpoint {
    /// Every endpoint, in the order `dump` prints them.
    pub const ALL: [Self; 11] = [
        Self::DeviceList,
        Self::Performance,
        Self::ClientList,
        Self::Wlan,
        Self::LanIpv4,
        Self::LanIpv6,
        Self::Wan,
        Self::Internet,
        Self::Mode,
        Self::Advanced,
        Self::DhcpDial,
    ];

    /// Human-readable name.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::DeviceList => "Device list",
            Self::Performance => "Performance",
            Self::ClientList => "Client list",
            Self::Wlan => "WLAN",
            Self::LanIpv4 => "LAN ipv4",
            Self::LanIpv6 => "LAN ipv6",
            Self::Wan => "WAN",
            Self::Internet => "Internet",
            Self::Mode => "Mode",
            Self::Advanced => "Advanced",
            Self::DhcpDial => "DHCP Dial",
        }
    }

    /// Path suffix below `;stok=<token>`.
    #[must_use]
    pub const fn path_suffix(self) -> &'static str {
        match self {
            Self::DeviceList | Self::Mode => DEVICE_PATH,
            Self::ClientList => CLIENT_PATH,
            Self::Wlan | Self::Advanced => WIRELESS_PATH,
            Self::Performance
            | Self::LanIpv4
            | Self::LanIpv6
            | Self::Wan
            | Self::Internet
            | Self::DhcpDial => NETWORK_PATH,
        }
    }

    /// Value of the `form` query parameter.
    #[must_use]
    pub const fn form(self) -> &'static str {
        match self {
            Self::DeviceList => "device_list",
            Self::Performance => "performance",
            Self::ClientList => "client_list",
            Self::Wlan => "wlan",
            Self::LanIpv4 => "lan_ip",
            Self::LanIpv6 => "ipv6",
            Self::Wan => "wan_ipv4",
            Self::Internet => "internet",
            Self::Mode => "mode",
            Self::Advanced => "power",
            Self::DhcpDial => "dhcp_dial",
        }
    }

    /// Plaintext request body.
    #[must_use]
    pub fn request(self) -> EndpointRequest {
        match self {
            Self::ClientList | Self::LanIpv4 | Self::LanIpv6 => {
                EndpointRequest::read().with_param("device_mac", DEFAULT_DEVICE_MAC)
            }
            _ => EndpointRequest::read(),
        }
    }
}

impl fmt::Display for KnownEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_is_unique() {
        let pairs: HashSet<_> = KnownEndpoint::ALL
            .iter()
            .map(|e| (e.path_suffix(), e.form()))
            .collect();
        assert_eq!(pairs.len(), KnownEndpoint::ALL.len());
    }

    #[test]
    fn test_client_list_request_carries_device_mac() {
        let body = KnownEndpoint::ClientList.request().to_json().unwrap();
        assert_eq!(
            body,
            r#"{"operation":"read","params":{"device_mac":"default"}}"#
        );
        assert_eq!(
            KnownEndpoint::Performance.request().to_json().unwrap(),
            r#"{"operation":"read"}"#
        );
    }

    #[test]
    fn test_catalog_entries() {
        assert_eq!(KnownEndpoint::Advanced.path_suffix(), "/admin/wireless");
        assert_eq!(KnownEndpoint::Advanced.form(), "power");
        assert_eq!(KnownEndpoint::Performance.path_suffix(), "/admin/network");
        assert_eq!(KnownEndpoint::DhcpDial.to_string(), "DHCP Dial");
    }
}
