// ============================================
// File: crates/deco-client/src/models.rs
// ============================================
//! # Endpoint Models
//!
//! ## Creation Reason
//! Typed views of the `result` payloads returned by the endpoints the
//! client exposes directly.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Firmware versions differ in which fields they send; every field
//!   defaults so a missing key never fails the whole call
//! - Client names arrive base64 encoded; see [`decode_client_name`]
//!
//! ## Last Modified
//! v0.1.0 - Initial models

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================
// Performance
// ============================================

/// `result` of `/admin/network?form=performance`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    /// CPU usage, 0.0 to 1.0.
    #[serde(default)]
    pub cpu_usage: f64,
    /// Memory usage, 0.0 to 1.0.
    #[serde(default)]
    pub mem_usage: f64,
}

// ============================================
// Device List
// ============================================

/// Signal strength per band, as reported by satellite nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalLevel {
    /// 2.4 GHz level.
    #[serde(default, rename = "band2_4")]
    pub band_2_4: String,
    /// 5 GHz level.
    #[serde(default)]
    pub band5: String,
}

/// One Deco node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct DeviceInfo {
    /// IP address of the node.
    pub device_ip: String,
    /// Device identifier.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub device_id: String,
    /// Product family, e.g. `HOMEWIFISYSTEM`.
    pub device_type: String,
    /// Model name, e.g. `M4`.
    pub device_model: String,
    /// Node MAC address.
    pub mac: String,
    /// `master` or `slave`.
    pub role: String,
    /// Location name chosen in the app.
    pub nickname: String,
    /// Free-text name, if one was set.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub custom_nickname: String,
    /// Firmware version.
    pub software_ver: String,
    /// Hardware revision.
    pub hardware_ver: String,
    /// Hardware id.
    pub hw_id: String,
    /// OEM id.
    pub oem_id: String,
    /// Product tier.
    pub product_level: i64,
    /// MAC of the upstream node.
    pub previous: String,
    /// Id of the upstream node.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent_device_id: String,
    /// 2.4 GHz BSSID.
    pub bssid_2g: String,
    /// 5 GHz BSSID.
    pub bssid_5g: String,
    /// 2.4 GHz backhaul station BSSID.
    pub bssid_sta_2g: String,
    /// 5 GHz backhaul station BSSID.
    pub bssid_sta_5g: String,
    /// Internet status, e.g. `online`.
    pub inet_status: String,
    /// Internet error text.
    pub inet_error_msg: String,
    /// Mesh group status.
    pub group_status: String,
    /// Backhaul bands in use.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub connection_type: Vec<String>,
    /// Backhaul signal per band.
    pub signal_level: SignalLevel,
    /// Node has NAND flash.
    pub nand_flash: bool,
    /// Ownership transfer supported.
    pub owner_transfer: bool,
    /// Powerline backhaul supported.
    pub support_plc: bool,
    /// Node can become the gateway.
    pub set_gateway_support: bool,
    /// Firmware image exceeds the usual size.
    pub oversized_firmware: bool,
    /// Speed test supported.
    pub speed_get_support: bool,
}

/// `result` of `/admin/device?form=device_list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceList {
    /// All mesh nodes.
    #[serde(default)]
    pub device_list: Vec<DeviceInfo>,
}

// ============================================
// Client List
// ============================================

/// One client connected to the mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientInfo {
    /// Client MAC address.
    pub mac: String,
    /// Client IP address.
    pub ip: String,
    /// Display name, already base64-decoded where possible.
    pub name: String,
    /// Device category, e.g. `pc`.
    pub client_type: String,
    /// Node the client is attached to.
    pub access_host: String,
    /// `main` or `guest` network.
    pub interface: String,
    /// Wi-Fi band the client is on.
    #[serde(rename = "band5")]
    pub connection_type: String,
    /// `wired` or `wireless`.
    pub wire_type: String,
    /// Client is connected right now.
    pub online: bool,
    /// Client supports mesh roaming.
    pub client_mesh: bool,
    /// QoS priority enabled.
    pub enable_priority: bool,
    /// Remaining priority time.
    pub remain_time: i64,
    /// Parental-control owner.
    pub owner_id: String,
    /// Room id.
    pub space_id: String,
    /// Current download rate reported by the device.
    pub down_speed: u64,
    /// Current upload rate reported by the device.
    pub up_speed: u64,
}

/// `result` of `/admin/client?form=client_list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientList {
    /// All known clients.
    #[serde(default)]
    pub client_list: Vec<ClientInfo>,
}

impl ClientList {
    /// Replaces every base64 client name with its decoded text.
    pub fn decode_names(&mut self) {
        for client in &mut self.client_list {
            client.name = decode_client_name(&client.name);
        }
    }
}

/// Decodes a base64 client name; anything that is not valid base64 of
/// UTF-8 text is returned unchanged.
///
/// # Example
/// ```
/// use deco_client::models::decode_client_name;
///
/// assert_eq!(decode_client_name("VGVzdA=="), "Test");
/// assert_eq!(decode_client_name("not base64!"), "not base64!");
/// ```
#[must_use]
pub fn decode_client_name(raw: &str) -> String {
    BASE64
        .decode(raw)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| raw.to_string())
}

// ============================================
// EndpointResult
// ============================================

/// Tagged result of any endpoint call.
///
/// Every catalog endpoint has its own variant. Settings endpoints whose
/// layout differs between firmware versions carry the `result` object
/// as-is. `Raw` is reserved for `custom` calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum EndpointResult {
    /// CPU and memory usage.
    Performance(Performance),
    /// Mesh nodes.
    DeviceList(DeviceList),
    /// Connected clients.
    ClientList(ClientList),
    /// Wireless network settings.
    Wlan(Value),
    /// LAN IPv4 settings.
    LanIpv4(Value),
    /// LAN IPv6 settings.
    LanIpv6(Value),
    /// WAN IPv4 settings.
    Wan(Value),
    /// Internet connection status.
    Internet(Value),
    /// Router or access-point mode.
    Mode(Value),
    /// Wireless transmit power.
    Advanced(Value),
    /// DHCP client settings of the WAN port.
    DhcpDial(Value),
    /// Reboot acknowledgement (shape varies by firmware).
    Reboot(Value),
    /// Untyped result of a custom call.
    Raw(Value),
}

impl EndpointResult {
    /// Converts to a JSON value for printing.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Performance(p) => serde_json::to_value(p).unwrap_or(Value::Null),
            Self::DeviceList(d) => serde_json::to_value(d).unwrap_or(Value::Null),
            Self::ClientList(c) => serde_json::to_value(c).unwrap_or(Value::Null),
            Self::Wlan(v)
            | Self::LanIpv4(v)
            | Self::LanIpv6(v)
            | Self::Wan(v)
            | Self::Internet(v)
            | Self::Mode(v)
            | Self::Advanced(v)
            | Self::DhcpDial(v)
            | Self::Reboot(v)
            | Self::Raw(v) => v.clone(),
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_client_name() {
        assert_eq!(decode_client_name("VGVzdA=="), "Test");
        assert_eq!(decode_client_name("***"), "***");
        // valid base64, but the bytes are not UTF-8
        assert_eq!(decode_client_name("//79"), "//79");
    }

    #[test]
    fn test_client_list_decodes_names() {
        let mut list: ClientList = serde_json::from_value(json!({
            "client_list": [
                {"mac": "AA-BB-CC-DD-EE-01", "name": "TGFwdG9w", "online": true, "band5": "band5"},
                {"mac": "AA-BB-CC-DD-EE-02", "name": "plain name", "online": false}
            ]
        }))
        .unwrap();

        list.decode_names();
        assert_eq!(list.client_list[0].name, "Laptop");
        assert_eq!(list.client_list[0].connection_type, "band5");
        assert_eq!(list.client_list[1].name, "plain name");
        assert!(list.client_list[0].online);
    }

    #[test]
    fn test_device_list_tolerates_missing_fields() {
        let list: DeviceList = serde_json::from_value(json!({
            "device_list": [{
                "device_ip": "192.168.68.1",
                "role": "master",
                "signal_level": {"band2_4": "3", "band5": "2"},
                "connection_type": ["band2_4", "band5"]
            }]
        }))
        .unwrap();

        let node = &list.device_list[0];
        assert_eq!(node.role, "master");
        assert_eq!(node.signal_level.band_2_4, "3");
        assert_eq!(node.connection_type.len(), 2);
        assert!(node.nickname.is_empty());
    }

    #[test]
    fn test_performance_parse() {
        let perf: Performance =
            serde_json::from_value(json!({"cpu_usage": 0.25, "mem_usage": 0.5})).unwrap();
        assert!((perf.cpu_usage - 0.25).abs() < f64::EPSILON);
        assert_eq!(
            EndpointResult::Performance(perf).to_json(),
            json!({"cpu_usage": 0.25, "mem_usage": 0.5})
        );
    }

    #[test]
    fn test_endpoint_result_kind_tags() {
        let mode = EndpointResult::Mode(json!({"sys_mode": "router"}));
        assert_eq!(
            serde_json::to_value(&mode).unwrap(),
            json!({"kind": "mode", "result": {"sys_mode": "router"}})
        );
        assert_eq!(mode.to_json(), json!({"sys_mode": "router"}));

        let lan = EndpointResult::LanIpv4(json!({}));
        assert_eq!(serde_json::to_value(&lan).unwrap()["kind"], "lan_ipv4");

        let reboot = EndpointResult::Reboot(json!({"reboot_time": 80}));
        assert_eq!(serde_json::to_value(&reboot).unwrap()["kind"], "reboot");
    }
}
