// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The editable device record and its display resolution rules.
//!
//! This module turns the two raw payloads into the flat record an edit
//! form renders, and fixes the write-back allow-list. Field copying is
//! fully enumerated here; nothing is merged by name probing, so a device
//! field that is not part of the record simply never reaches a form.

use serde::Serialize;

use crate::error::Error;
use crate::model::{DeviceConfig, DeviceStatus, NoiseRssiEntry};

/// Channel-span codes and their display labels.
///
/// Unknown codes resolve to the first entry; span is advisory display
/// data, so an unrecognized code is not an error.
const SPAN_LABELS: &[(u32, &str)] = &[
    (0, "2.5MHz"),
    (1, "5MHz"),
    (2, "10MHz"),
    (3, "20MHz"),
    (4, "10/20/40MHz"),
    (5, "40MHz"),
    (6, "300KHz"),
    (7, "30MHz"),
    (8, "1.25MHz"),
    (9, "250KHz"),
    (10, "500KHz"),
    (11, "1MHz"),
];

/// Fields a submit may write back to the device, by wire name.
///
/// Everything else in the record is telemetry or derived display data and
/// never enters an outbound payload.
pub const EDITABLE_FIELDS: &[&str] = &["silenced", "nwMask", "dnsServer", "gateway", "operatingFreq"];

/// Resolves a span code to its display label.
///
/// # Examples
///
/// ```
/// use mimomesh_lib::record::span_label;
///
/// assert_eq!(span_label(3), "20MHz");
/// assert_eq!(span_label(99), "2.5MHz"); // unknown codes fall back to code 0
/// ```
#[must_use]
pub fn span_label(code: u32) -> &'static str {
    SPAN_LABELS
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(SPAN_LABELS[0].1, |(_, label)| *label)
}

/// The reconciled, user-facing device record.
///
/// Assembled by overlaying configuration fields onto status fields;
/// configuration wins on name collisions. `freq` and `span` are derived
/// display values and are never written back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableDeviceRecord {
    /// Node name (read-only).
    pub name: String,
    /// Device IP (read-only).
    pub ip: String,
    /// Device's own node identifier (read-only).
    pub self_id: u32,
    /// Visible node count (read-only).
    pub node_number: u32,
    /// Battery level in percent (read-only).
    pub battery_level: f64,
    /// Device temperature in degrees Celsius (read-only).
    pub temp: f64,
    /// Whether the radio is silenced (editable).
    pub silenced: bool,
    /// Network mask (editable).
    pub nw_mask: String,
    /// DNS server (editable).
    pub dns_server: String,
    /// Gateway (editable).
    pub gateway: String,
    /// Operating frequency selector (editable); config value wins over
    /// the status value.
    pub operating_freq: usize,
    /// Operating-control-frequency mask (read-only).
    pub operating_ctrl_freq: u32,
    /// Resolved operating frequency in MHz (derived, read-only).
    pub freq: f64,
    /// Resolved channel-span label (derived, read-only).
    pub span: String,
}

impl EditableDeviceRecord {
    /// Builds the record from one status/config snapshot pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InconsistentState`] when the status's operating
    /// frequency index falls outside the configuration's frequency list:
    /// the device reported an operating frequency it did not also list as
    /// valid, and silently clamping would hide the fault.
    pub fn reconcile(status: &DeviceStatus, config: &DeviceConfig) -> Result<Self, Error> {
        let freq = config
            .freq_list
            .get(status.operating_freq)
            .copied()
            .ok_or(Error::InconsistentState {
                index: status.operating_freq,
                len: config.freq_list.len(),
            })?;

        Ok(Self {
            name: status.name.clone(),
            ip: status.ip.clone(),
            self_id: status.self_id,
            node_number: status.node_number,
            battery_level: status.battery_level,
            temp: status.temp,
            silenced: status.silenced,
            nw_mask: config.nw_mask.clone(),
            dns_server: config.dns_server.clone(),
            gateway: config.gateway.clone(),
            operating_freq: config.operating_freq,
            operating_ctrl_freq: config.operating_ctrl_freq,
            freq,
            span: span_label(config.span).to_string(),
        })
    }
}

/// One entry of the noise-RSSI selection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoiseChoice {
    /// Index into the snapshot's `noise_rssi` list.
    pub index: usize,
    /// Display label embedding the sample's frequency.
    pub label: String,
}

/// Builds the noise-RSSI selection list for a status payload.
///
/// An empty sample list yields a single "no data" placeholder so a
/// selection control is never left without a valid choice.
#[must_use]
pub fn noise_choices(samples: &[NoiseRssiEntry]) -> Vec<NoiseChoice> {
    if samples.is_empty() {
        return vec![NoiseChoice {
            index: 0,
            label: "no noise RSSI data".to_string(),
        }];
    }

    samples
        .iter()
        .enumerate()
        .map(|(index, entry)| NoiseChoice {
            index,
            label: format!("freq: {} MHz", entry.freq),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_status() -> DeviceStatus {
        DeviceStatus {
            name: "node-a".to_string(),
            ip: "10.0.0.12".to_string(),
            self_id: 12,
            node_number: 5,
            battery_level: 64.0,
            temp: 41.5,
            silenced: false,
            operating_freq: 2,
            noise_rssi: vec![
                NoiseRssiEntry {
                    freq: 1430.0,
                    rssi: -101.0,
                },
                NoiseRssiEntry {
                    freq: 1452.0,
                    rssi: -95.5,
                },
            ],
            node_infos: Vec::new(),
        }
    }

    fn sample_config() -> DeviceConfig {
        DeviceConfig {
            nw_mask: "255.255.255.0".to_string(),
            dns_server: "10.0.0.1".to_string(),
            gateway: "10.0.0.1".to_string(),
            operating_freq: 3,
            operating_ctrl_freq: 240,
            freq_list: vec![1410.0, 1430.0, 1452.0, 1470.0],
            span: 3,
        }
    }

    #[test]
    fn reconcile_resolves_freq_from_status_index() {
        let record = EditableDeviceRecord::reconcile(&sample_status(), &sample_config()).unwrap();
        assert_eq!(record.freq, 1452.0);
    }

    #[test]
    fn reconcile_config_wins_on_operating_freq() {
        let record = EditableDeviceRecord::reconcile(&sample_status(), &sample_config()).unwrap();
        assert_eq!(record.operating_freq, 3);
    }

    #[test]
    fn reconcile_resolves_span_label() {
        let record = EditableDeviceRecord::reconcile(&sample_status(), &sample_config()).unwrap();
        assert_eq!(record.span, "20MHz");
    }

    #[test]
    fn reconcile_out_of_bounds_index_is_inconsistent_state() {
        let mut status = sample_status();
        status.operating_freq = 9;
        let err = EditableDeviceRecord::reconcile(&status, &sample_config()).unwrap_err();
        assert!(matches!(err, Error::InconsistentState { index: 9, len: 4 }));
    }

    #[test]
    fn unknown_span_code_falls_back_to_code_zero() {
        let mut config = sample_config();
        config.span = 99;
        let record = EditableDeviceRecord::reconcile(&sample_status(), &config).unwrap();
        assert_eq!(record.span, "2.5MHz");
    }

    #[test]
    fn span_table_matches_device_codes() {
        assert_eq!(span_label(0), "2.5MHz");
        assert_eq!(span_label(4), "10/20/40MHz");
        assert_eq!(span_label(6), "300KHz");
        assert_eq!(span_label(11), "1MHz");
    }

    #[test]
    fn noise_choices_embed_frequency() {
        let choices = noise_choices(&sample_status().noise_rssi);
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].index, 0);
        assert!(choices[0].label.contains("1430"));
        assert!(choices[1].label.contains("1452"));
    }

    #[test]
    fn empty_noise_list_yields_placeholder() {
        let choices = noise_choices(&[]);
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].index, 0);
        assert_eq!(choices[0].label, "no noise RSSI data");
    }

    #[test]
    fn editable_fields_exclude_derived_and_telemetry() {
        assert!(EDITABLE_FIELDS.contains(&"nwMask"));
        assert!(EDITABLE_FIELDS.contains(&"silenced"));
        assert!(!EDITABLE_FIELDS.contains(&"freq"));
        assert!(!EDITABLE_FIELDS.contains(&"span"));
        assert!(!EDITABLE_FIELDS.contains(&"batteryLevel"));
    }
}
