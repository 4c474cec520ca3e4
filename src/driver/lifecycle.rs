// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hub device event handlers.
//!
//! The hub calls these when a paired device is initialised, has its settings
//! edited, is deleted, or has its relay toggled by the user.

use std::sync::Arc;

use crate::api::Connector;
use crate::record::{DeviceId, DeviceRecord};
use crate::types::Capability;

use super::Driver;
use super::accumulator::ensure_counter;

impl<C: Connector> Driver<C> {
    /// Prepares a device record and activates it.
    ///
    /// Adds the `measure_power` and `meter_power` capabilities (and `onoff`
    /// for outlet drivers) when missing and initialises the energy counter to zero, then calls
    /// [`device_started`](Self::device_started).
    pub async fn on_device_init(&self, device: Arc<dyn DeviceRecord>) -> bool {
        let device_id = device.id();

        let mut required = vec![Capability::MeasurePower, Capability::MeterPower];
        if self.kind().switchable() {
            required.push(Capability::OnOff);
        }
        for capability in required {
            if !device.has_capability(capability)
                && let Err(e) = device.add_capability(capability)
            {
                tracing::warn!(%device_id, %capability, error = %e, "Failed to add capability");
            }
        }

        if let Err(e) = ensure_counter(&*device) {
            tracing::warn!(%device_id, error = %e, "Failed to initialise energy counter");
        }

        self.device_started(device).await
    }

    /// Re-activates a device after its settings changed.
    ///
    /// Edited credentials rebuild the client and are copied to the other
    /// devices of this driver.
    pub async fn on_device_settings(&self, device: Arc<dyn DeviceRecord>) -> bool {
        tracing::debug!(device_id = %device.id(), "Device settings changed");
        self.device_started(device).await
    }

    /// Deactivates a deleted device.
    pub async fn on_device_deleted(&self, device_id: DeviceId) {
        self.device_stopped(device_id).await;
    }

    /// Forwards a user toggle of the `onoff` capability to the service.
    ///
    /// Failures are logged; the next poll reports the actual relay state.
    pub async fn on_onoff_changed(&self, device: &dyn DeviceRecord, on: bool) {
        if let Err(e) = self.set_outlet(device, on).await {
            tracing::warn!(device_id = %device.id(), on, error = %e, "Failed to switch outlet");
        }
    }
}
