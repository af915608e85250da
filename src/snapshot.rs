// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-session snapshot caching.
//!
//! A submit must be interpreted against the exact device state the user
//! saw at read time; a fresh fetch could shift list indices under the
//! submitted selection. The cache holds the last fetched snapshot per
//! session, nothing more: each read overwrites the entry, and a failed
//! submit leaves it intact for a retry.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::model::{DeviceConfig, DeviceStatus};

/// Identifier of one user session.
///
/// A wrapper around UUID v4 that provides a distinct type for session
/// identification, preventing accidental confusion with other UUID-based
/// identifiers.
///
/// # Examples
///
/// ```
/// use mimomesh_lib::SessionId;
///
/// let session = SessionId::new();
/// println!("session: {session}");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new unique session identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a session identifier from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Show only first 8 characters for readability
        let short = &self.0.to_string()[..8];
        write!(f, "SessionId({short}...)")
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for SessionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<SessionId> for Uuid {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// The paired result of one device read.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    /// Status payload as fetched.
    pub status: DeviceStatus,
    /// Config payload as fetched.
    pub config: DeviceConfig,
    /// When the read completed.
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Creates a snapshot timestamped now.
    #[must_use]
    pub fn new(status: DeviceStatus, config: DeviceConfig) -> Self {
        Self {
            status,
            config,
            fetched_at: Utc::now(),
        }
    }
}

/// Session-keyed store of the most recent snapshot per session.
///
/// No cross-session visibility: a snapshot written under one session is
/// never observable under another.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    inner: RwLock<HashMap<SessionId, Snapshot>>,
}

impl SnapshotCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the snapshot for a session, replacing any previous one.
    pub fn insert(&self, session: SessionId, snapshot: Snapshot) {
        self.inner.write().insert(session, snapshot);
    }

    /// Returns a clone of the session's snapshot, if one exists.
    ///
    /// The entry stays in the cache so a failed submit can be retried
    /// against the same state.
    #[must_use]
    pub fn get(&self, session: &SessionId) -> Option<Snapshot> {
        self.inner.read().get(session).cloned()
    }

    /// Removes the session's snapshot, returning it if present.
    pub fn remove(&self, session: &SessionId) -> Option<Snapshot> {
        self.inner.write().remove(session)
    }

    /// Returns the number of cached sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if no session has a cached snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
