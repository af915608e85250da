// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire payloads for the `MimoMesh` device API.
//!
//! Field names follow the device's camelCase JSON. Every field carries a
//! default so a device running older firmware (or reporting an empty body)
//! still decodes; unknown fields from newer firmware are ignored.

use serde::{Deserialize, Serialize};

/// Live device telemetry from `GET /status`.
///
/// Produced fresh on every read; never edited directly. The
/// `operating_freq` field is an *index* into the configuration's
/// frequency list, not a frequency value.
///
/// # Examples
///
/// ```
/// use mimomesh_lib::DeviceStatus;
///
/// let json = r#"{
///     "name": "relay-7",
///     "ip": "192.168.1.87",
///     "selfId": 7,
///     "nodeNumber": 3,
///     "batteryLevel": 82.5,
///     "operatingFreq": 2,
///     "noiseRssi": [{"freq": 1452.0, "rssi": -97.0}]
/// }"#;
/// let status: DeviceStatus = serde_json::from_str(json).unwrap();
/// assert_eq!(status.self_id, 7);
/// assert_eq!(status.noise_rssi.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceStatus {
    /// Node name.
    pub name: String,

    /// Device IP address.
    pub ip: String,

    /// Device's own node identifier.
    pub self_id: u32,

    /// Number of nodes currently visible in the mesh.
    pub node_number: u32,

    /// Battery level in percent.
    pub battery_level: f64,

    /// Device temperature in degrees Celsius.
    pub temp: f64,

    /// Whether the radio is silenced.
    pub silenced: bool,

    /// Index of the currently selected operating frequency, pointing
    /// into the configuration's `freq_list`.
    pub operating_freq: usize,

    /// Noise-RSSI samples, each tagged with its frequency.
    pub noise_rssi: Vec<NoiseRssiEntry>,

    /// Descriptors of the peer nodes this device can see.
    pub node_infos: Vec<NodeInfo>,
}

/// One noise-RSSI sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoiseRssiEntry {
    /// Frequency of the sample in MHz.
    pub freq: f64,

    /// Measured noise floor in dBm.
    pub rssi: f64,
}

/// Descriptor of a peer node in the mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeInfo {
    /// Peer node identifier.
    pub node_id: u32,

    /// Peer node name.
    pub name: String,

    /// Peer IP address.
    pub ip: String,

    /// Link RSSI to the peer in dBm.
    pub rssi: f64,
}

/// Device configuration from `GET /config`.
///
/// `freq_list` enumerates the frequencies the device considers valid;
/// the status payload's `operating_freq` indexes into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceConfig {
    /// Network mask.
    pub nw_mask: String,

    /// DNS server address.
    pub dns_server: String,

    /// Gateway address.
    pub gateway: String,

    /// Operating frequency selector.
    pub operating_freq: usize,

    /// Operating-control-frequency mask (opaque device bitmask).
    pub operating_ctrl_freq: u32,

    /// Valid operating frequencies in MHz.
    pub freq_list: Vec<f64>,

    /// Channel-span code; see [`crate::record::span_label`].
    pub span: u32,
}
