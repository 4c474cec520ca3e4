// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory device record.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::DeviceError;
use crate::types::{Capability, CapabilityValue, Credentials, DeviceIdentity};

use super::{DeviceId, DeviceRecord};

/// A [`DeviceRecord`] that keeps everything in memory.
///
/// New records start unavailable and expose only `measure_power`; add more
/// capabilities with [`with_capability`](Self::with_capability). After
/// [`mark_removed`](Self::mark_removed) every write fails with
/// [`DeviceError::Removed`].
pub struct MemoryDevice {
    id: DeviceId,
    identity: DeviceIdentity,
    inner: RwLock<MemoryState>,
}

#[derive(Debug)]
struct MemoryState {
    credentials: Credentials,
    capabilities: HashMap<Capability, Option<CapabilityValue>>,
    store: HashMap<String, serde_json::Value>,
    available: bool,
    removed: bool,
    last_updated: Option<DateTime<Utc>>,
}

impl MemoryDevice {
    /// Creates a record with a fresh id.
    #[must_use]
    pub fn new(identity: DeviceIdentity, credentials: Credentials) -> Self {
        Self::with_id(DeviceId::new(), identity, credentials)
    }

    /// Creates a record with a hub-assigned id.
    #[must_use]
    pub fn with_id(id: DeviceId, identity: DeviceIdentity, credentials: Credentials) -> Self {
        let mut capabilities = HashMap::new();
        capabilities.insert(Capability::MeasurePower, None);

        Self {
            id,
            identity,
            inner: RwLock::new(MemoryState {
                credentials,
                capabilities,
                store: HashMap::new(),
                available: false,
                removed: false,
                last_updated: None,
            }),
        }
    }

    /// Adds a capability at construction time.
    #[must_use]
    pub fn with_capability(self, capability: Capability) -> Self {
        self.inner.write().capabilities.entry(capability).or_insert(None);
        self
    }

    /// Removes a capability at construction time.
    ///
    /// Models hosts whose records start without the power capabilities.
    #[must_use]
    pub fn without_capability(self, capability: Capability) -> Self {
        self.inner.write().capabilities.remove(&capability);
        self
    }

    /// Returns the last value published for `capability`.
    #[must_use]
    pub fn capability_value(&self, capability: Capability) -> Option<CapabilityValue> {
        self.inner
            .read()
            .capabilities
            .get(&capability)
            .copied()
            .flatten()
    }

    /// Returns true once a driver has marked the device available.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.inner.read().available
    }

    /// Returns when a capability was last published.
    ///
    /// Stays `None` until a poll first reports data for the device and stops
    /// advancing while the service leaves the device out. Hosts use it to
    /// show the time of the last reading and to flag stale devices.
    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.inner.read().last_updated
    }

    /// Flags the record as removed from the hub.
    pub fn mark_removed(&self) {
        self.inner.write().removed = true;
    }

    fn write(&self) -> Result<parking_lot::RwLockWriteGuard<'_, MemoryState>, DeviceError> {
        let guard = self.inner.write();
        if guard.removed {
            return Err(DeviceError::Removed);
        }
        Ok(guard)
    }
}

impl DeviceRecord for MemoryDevice {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn identity(&self) -> DeviceIdentity {
        self.identity.clone()
    }

    fn credentials(&self) -> Credentials {
        self.inner.read().credentials.clone()
    }

    fn set_credentials(&self, credentials: &Credentials) -> Result<(), DeviceError> {
        self.write()?.credentials = credentials.clone();
        Ok(())
    }

    fn has_capability(&self, capability: Capability) -> bool {
        self.inner.read().capabilities.contains_key(&capability)
    }

    fn add_capability(&self, capability: Capability) -> Result<(), DeviceError> {
        self.write()?.capabilities.entry(capability).or_insert(None);
        Ok(())
    }

    fn set_capability_value(
        &self,
        capability: Capability,
        value: CapabilityValue,
    ) -> Result<(), DeviceError> {
        let mut state = self.write()?;
        let slot = state
            .capabilities
            .get_mut(&capability)
            .ok_or_else(|| DeviceError::MissingCapability {
                capability: capability.to_string(),
            })?;
        *slot = Some(value);
        state.last_updated = Some(Utc::now());
        Ok(())
    }

    fn store_value(&self, key: &str) -> Option<serde_json::Value> {
        self.inner.read().store.get(key).cloned()
    }

    fn set_store_value(&self, key: &str, value: serde_json::Value) -> Result<(), DeviceError> {
        self.write()?.store.insert(key.to_string(), value);
        Ok(())
    }

    fn set_available(&self) -> Result<(), DeviceError> {
        self.write()?.available = true;
        Ok(())
    }
}

impl std::fmt::Debug for MemoryDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDevice")
            .field("id", &self.id)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}
