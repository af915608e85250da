// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `MimoMesh` Lib - A Rust library to monitor and configure MimoMesh
//! mesh-network radio devices over their HTTP API.
//!
//! The device exposes two independently-shaped JSON payloads, `status`
//! (live telemetry) and `config` (settings). This library fetches both,
//! merges them into one editable record with human-readable frequency and
//! channel-span values, caches the snapshot per session across the
//! read/modify/write cycle of a form, and assembles the allow-listed
//! update payload to post back.
//!
//! # Supported Features
//!
//! - **Device client**: typed `/status` and `/config` reads, `/config`
//!   writes, opaque `/version` and `/spectrum` reads, one normalized
//!   error taxonomy
//! - **State reconciliation**: status/config merge, frequency-index and
//!   span-code resolution, noise-RSSI choice lists
//! - **Snapshot caching**: session-keyed read-time state so a submit is
//!   always interpreted against what the user saw
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use mimomesh_lib::{MeshClient, Reconciler, SessionId, SnapshotCache};
//!
//! #[tokio::main]
//! async fn main() -> mimomesh_lib::Result<()> {
//!     let client = MeshClient::new("192.168.1.87")?;
//!     let reconciler = Reconciler::new(client, Arc::new(SnapshotCache::new()));
//!     let session = SessionId::new();
//!
//!     // Read: one record merging status and config
//!     let (record, choices) = reconciler.reconcile_for_display(&session).await?;
//!     println!("{} @ {} MHz, span {}", record.name, record.freq, record.span);
//!     println!("{} noise samples to pick from", choices.len());
//!
//!     // Write: edits are filtered through the allow-list and resolved
//!     // against the snapshot cached by the read above
//!     let mut edits = serde_json::Map::new();
//!     edits.insert("silenced".into(), true.into());
//!     reconciler.submit(&session, &edits, 0).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Raw Client Access
//!
//! Callers that need unmerged data can use the client directly:
//!
//! ```no_run
//! use mimomesh_lib::MeshClient;
//!
//! # async fn example() -> mimomesh_lib::Result<()> {
//! let client = MeshClient::new("192.168.1.87")?;
//! for node in client.fetch_status().await?.node_infos {
//!     println!("{} ({}) rssi {}", node.name, node.ip, node.rssi);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
pub mod error;
pub mod model;
pub mod record;
mod reconcile;
pub mod snapshot;

pub use client::{MeshClient, MeshClientBuilder};
pub use error::{ApiError, Error, Result};
pub use model::{DeviceConfig, DeviceStatus, NodeInfo, NoiseRssiEntry};
pub use reconcile::Reconciler;
pub use record::{EDITABLE_FIELDS, EditableDeviceRecord, NoiseChoice};
pub use snapshot::{SessionId, Snapshot, SnapshotCache};
