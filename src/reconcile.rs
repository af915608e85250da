// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The state reconciler: read/modify/write cycle over the device API.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::client::MeshClient;
use crate::error::{Error, Result};
use crate::record::{EDITABLE_FIELDS, EditableDeviceRecord, NoiseChoice, noise_choices};
use crate::snapshot::{SessionId, Snapshot, SnapshotCache};

/// Key under which the selected noise frequency travels in the outbound
/// payload.
const SELECTED_NOISE_FREQ_FIELD: &str = "selectedNoiseRssiFreq";

/// Reconciles device status and configuration into one editable record,
/// and user edits back into a device-accepted update payload.
///
/// The cache is injected so several reconcilers (or request handlers) can
/// share one session-keyed store.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use mimomesh_lib::{MeshClient, Reconciler, SessionId, SnapshotCache};
///
/// # async fn example() -> mimomesh_lib::Result<()> {
/// let client = MeshClient::new("192.168.1.87")?;
/// let reconciler = Reconciler::new(client, Arc::new(SnapshotCache::new()));
/// let session = SessionId::new();
///
/// // Read: render this record, let the user edit it
/// let (record, noise_choices) = reconciler.reconcile_for_display(&session).await?;
/// println!("operating at {} MHz ({})", record.freq, record.span);
/// # let _ = noise_choices;
///
/// // Write: interpreted against the snapshot from the read above
/// let mut edits = serde_json::Map::new();
/// edits.insert("gateway".into(), "10.0.0.1".into());
/// reconciler.submit(&session, &edits, 0).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Reconciler {
    client: MeshClient,
    cache: Arc<SnapshotCache>,
}

impl Reconciler {
    /// Creates a reconciler over a client and a shared snapshot cache.
    #[must_use]
    pub fn new(client: MeshClient, cache: Arc<SnapshotCache>) -> Self {
        Self { client, cache }
    }

    /// Returns the underlying device client, for callers that need
    /// unmerged data (e.g. a node list view reading only `node_infos`).
    #[must_use]
    pub fn client(&self) -> &MeshClient {
        &self.client
    }

    /// Read path: fetches status and configuration, merges them into the
    /// editable record, and caches the snapshot for the session.
    ///
    /// The two fetches run concurrently; if either fails the whole read
    /// fails and nothing is cached. A half-populated configuration view
    /// is worse than an explicit failure.
    ///
    /// # Errors
    ///
    /// Propagates any [`crate::ApiError`] from the fetches unchanged, and
    /// returns [`Error::InconsistentState`] when the device's operating
    /// frequency index is not covered by its frequency list.
    pub async fn reconcile_for_display(
        &self,
        session: &SessionId,
    ) -> Result<(EditableDeviceRecord, Vec<NoiseChoice>)> {
        let (status, config) =
            tokio::try_join!(self.client.fetch_status(), self.client.fetch_config())?;

        let record = EditableDeviceRecord::reconcile(&status, &config)?;
        let choices = noise_choices(&status.noise_rssi);

        tracing::debug!(
            session = %session,
            freq = record.freq,
            span = %record.span,
            noise_samples = status.noise_rssi.len(),
            "Cached device snapshot for session"
        );
        self.cache.insert(*session, Snapshot::new(status, config));

        Ok((record, choices))
    }

    /// Write path: assembles the update payload from user edits against
    /// the snapshot cached by the preceding read.
    ///
    /// Only fields in the write-back allow-list are copied from `edits`;
    /// telemetry and derived fields are dropped even if present. The
    /// noise index is resolved against the *cached* sample list: in
    /// bounds it contributes that sample's frequency, out of bounds it
    /// contributes `null` (no noise data at read time is a legitimate
    /// submitted state).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingContext`] when the session has no cached
    /// snapshot. A fresh fetch is never attempted here.
    pub fn reconcile_for_submit(
        &self,
        session: &SessionId,
        edits: &Map<String, Value>,
        selected_noise_index: usize,
    ) -> Result<Map<String, Value>> {
        let snapshot = self.cache.get(session).ok_or(Error::MissingContext)?;

        let mut payload = Map::new();
        for field in EDITABLE_FIELDS {
            if let Some(value) = edits.get(*field) {
                payload.insert((*field).to_string(), value.clone());
            }
        }

        let selected_freq = snapshot
            .status
            .noise_rssi
            .get(selected_noise_index)
            .map(|entry| entry.freq);
        if selected_freq.is_none() {
            tracing::debug!(
                session = %session,
                index = selected_noise_index,
                samples = snapshot.status.noise_rssi.len(),
                "Noise selection out of bounds; submitting null frequency"
            );
        }
        payload.insert(
            SELECTED_NOISE_FREQ_FIELD.to_string(),
            selected_freq.map_or(Value::Null, Into::into),
        );

        Ok(payload)
    }

    /// Builds the update payload and applies it to the device.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingContext`] without touching the device when
    /// the session has no cached snapshot, or any [`crate::ApiError`]
    /// from the apply call. The cached snapshot stays intact either way,
    /// so a failed submit can be retried.
    pub async fn submit(
        &self,
        session: &SessionId,
        edits: &Map<String, Value>,
        selected_noise_index: usize,
    ) -> Result<Value> {
        let payload = self.reconcile_for_submit(session, edits, selected_noise_index)?;
        Ok(self.client.apply_config(&payload).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeviceConfig, DeviceStatus, NoiseRssiEntry};
    use serde_json::json;

    fn reconciler_with_snapshot(status: DeviceStatus, config: DeviceConfig) -> (Reconciler, SessionId) {
        let client = MeshClient::new("127.0.0.1:1").unwrap();
        let cache = Arc::new(SnapshotCache::new());
        let session = SessionId::new();
        cache.insert(session, Snapshot::new(status, config));
        (Reconciler::new(client, cache), session)
    }

    fn status_with_noise() -> DeviceStatus {
        DeviceStatus {
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
            ..DeviceStatus::default()
        }
    }

    #[test]
    fn submit_without_prior_read_is_missing_context() {
        let client = MeshClient::new("127.0.0.1:1").unwrap();
        let reconciler = Reconciler::new(client, Arc::new(SnapshotCache::new()));

        let err = reconciler
            .reconcile_for_submit(&SessionId::new(), &Map::new(), 0)
            .unwrap_err();
        assert!(matches!(err, Error::MissingContext));
    }

    #[test]
    fn submit_copies_only_allow_listed_fields() {
        let (reconciler, session) =
            reconciler_with_snapshot(status_with_noise(), DeviceConfig::default());

        let mut edits = Map::new();
        edits.insert("nwMask".to_string(), json!("255.255.255.0"));
        edits.insert("freq".to_string(), json!(999.0));
        edits.insert("batteryLevel".to_string(), json!(12.0));
        edits.insert("span".to_string(), json!("40MHz"));

        let payload = reconciler
            .reconcile_for_submit(&session, &edits, 0)
            .unwrap();

        assert_eq!(payload.get("nwMask"), Some(&json!("255.255.255.0")));
        assert!(!payload.contains_key("freq"));
        assert!(!payload.contains_key("batteryLevel"));
        assert!(!payload.contains_key("span"));
    }

    #[test]
    fn submit_resolves_noise_index_against_cached_snapshot() {
        let (reconciler, session) =
            reconciler_with_snapshot(status_with_noise(), DeviceConfig::default());

        let payload = reconciler
            .reconcile_for_submit(&session, &Map::new(), 1)
            .unwrap();
        assert_eq!(payload.get("selectedNoiseRssiFreq"), Some(&json!(1452.0)));
    }

    #[test]
    fn out_of_bounds_noise_index_yields_null() {
        let (reconciler, session) =
            reconciler_with_snapshot(status_with_noise(), DeviceConfig::default());

        let payload = reconciler
            .reconcile_for_submit(&session, &Map::new(), 7)
            .unwrap();
        assert_eq!(payload.get("selectedNoiseRssiFreq"), Some(&Value::Null));
    }

    #[test]
    fn empty_noise_list_yields_null_selection() {
        let (reconciler, session) =
            reconciler_with_snapshot(DeviceStatus::default(), DeviceConfig::default());

        let payload = reconciler
            .reconcile_for_submit(&session, &Map::new(), 0)
            .unwrap();
        assert_eq!(payload.get("selectedNoiseRssiFreq"), Some(&Value::Null));
    }

    #[test]
    fn failed_submit_leaves_snapshot_for_retry() {
        let (reconciler, session) =
            reconciler_with_snapshot(status_with_noise(), DeviceConfig::default());

        // Another session has no snapshot and must fail...
        let other = SessionId::new();
        assert!(matches!(
            reconciler.reconcile_for_submit(&other, &Map::new(), 0),
            Err(Error::MissingContext)
        ));

        // ...while the original session's snapshot is still usable.
        assert!(
            reconciler
                .reconcile_for_submit(&session, &Map::new(), 0)
                .is_ok()
        );
    }
}
