// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scriptable in-process stand-in for the cloud energy service.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use emvue_drivers::api::{Connector, EnergyApi, OutletCommand, RemoteDevice, RemoteDeviceKind};
use emvue_drivers::error::{ApiError, AuthError};
use emvue_drivers::record::MemoryDevice;
use emvue_drivers::types::{
    Capability, Credentials, DeviceIdentity, OutletState, UsageReading, UsageScale,
};
use parking_lot::Mutex;

/// Password the fake service always rejects.
pub const WRONG_PASSWORD: &str = "wrong";

/// Scripted service state. Usage and relay state are keyed by group id.
#[derive(Debug, Default)]
pub struct CloudState {
    pub devices: Vec<RemoteDevice>,
    pub usage: HashMap<u64, UsageReading>,
    pub outlets: HashMap<u64, bool>,
    pub fail_listing: bool,
    pub fail_usage: bool,
    pub fail_outlet_state: bool,
    pub fail_switch: bool,
    pub unreachable: bool,
    /// How long each usage query takes to answer.
    pub usage_delay: Option<Duration>,
    pub logins: Vec<Credentials>,
    pub usage_requests: Vec<Vec<DeviceIdentity>>,
    pub commands: Vec<OutletCommand>,
}

/// Fake service and connector. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakeCloud {
    state: Arc<Mutex<CloudState>>,
    connects: Arc<AtomicUsize>,
    usage_started: Arc<AtomicUsize>,
    polls: Arc<AtomicUsize>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with exclusive access to the scripted state.
    pub fn with<R>(&self, f: impl FnOnce(&mut CloudState) -> R) -> R {
        f(&mut self.state.lock())
    }

    pub fn add_device(&self, name: &str, group_id: u64, kind: RemoteDeviceKind) {
        self.with(|s| {
            s.devices.push(RemoteDevice {
                name: name.to_string(),
                group_id,
                channel: "1,2,3".to_string(),
                kind,
            });
        });
    }

    pub fn set_usage(&self, group_id: u64, kwh: f64) {
        self.with(|s| s.usage.insert(group_id, UsageReading::new(kwh)));
    }

    pub fn set_missing_usage(&self, group_id: u64) {
        self.with(|s| s.usage.insert(group_id, UsageReading::missing()));
    }

    pub fn set_outlet(&self, group_id: u64, on: bool) {
        self.with(|s| s.outlets.insert(group_id, on));
    }

    /// Number of successful and failed connection attempts.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Number of usage queries received, answered or not.
    pub fn usage_started(&self) -> usize {
        self.usage_started.load(Ordering::SeqCst)
    }

    /// Number of usage queries answered.
    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn last_login(&self) -> Option<Credentials> {
        self.with(|s| s.logins.last().cloned())
    }

    pub fn commands(&self) -> Vec<OutletCommand> {
        self.with(|s| s.commands.clone())
    }
}

impl Connector for FakeCloud {
    type Api = FakeApi;

    async fn connect(&self, credentials: &Credentials) -> Result<FakeApi, AuthError> {
        self.connects.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock();
        if state.unreachable {
            return Err(AuthError::Unreachable("connection refused".to_string()));
        }
        if credentials.password() == WRONG_PASSWORD {
            return Err(AuthError::InvalidCredentials);
        }
        state.logins.push(credentials.clone());
        drop(state);

        Ok(FakeApi {
            cloud: self.clone(),
        })
    }
}

/// Client handed out by [`FakeCloud`].
#[derive(Debug)]
pub struct FakeApi {
    cloud: FakeCloud,
}

impl EnergyApi for FakeApi {
    async fn get_devices(&self) -> Result<Vec<RemoteDevice>, ApiError> {
        let state = self.cloud.state.lock();
        if state.fail_listing {
            return Err(ApiError::Request("listing unavailable".to_string()));
        }
        Ok(state.devices.clone())
    }

    async fn get_device_timed_usage(
        &self,
        _scale: UsageScale,
        devices: &[DeviceIdentity],
    ) -> Result<Vec<UsageReading>, ApiError> {
        self.cloud.usage_started.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.cloud.with(|s| s.usage_delay) {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.cloud.state.lock();
        state.usage_requests.push(devices.to_vec());
        if state.fail_usage {
            return Err(ApiError::Request("usage unavailable".to_string()));
        }
        self.cloud.polls.fetch_add(1, Ordering::SeqCst);

        Ok(devices
            .iter()
            .map(|d| {
                state
                    .usage
                    .get(&d.group_id())
                    .copied()
                    .unwrap_or_else(UsageReading::missing)
            })
            .collect())
    }

    async fn get_outlet_state(
        &self,
        devices: &[DeviceIdentity],
    ) -> Result<Vec<OutletState>, ApiError> {
        let state = self.cloud.state.lock();
        if state.fail_outlet_state {
            return Err(ApiError::Request("outlet state unavailable".to_string()));
        }
        Ok(devices
            .iter()
            .map(|d| OutletState::from(state.outlets.get(&d.group_id()).copied().unwrap_or(false)))
            .collect())
    }

    async fn update_outlet_state(&self, command: OutletCommand) -> Result<(), ApiError> {
        let mut state = self.cloud.state.lock();
        if state.fail_switch {
            return Err(ApiError::Request("switch rejected".to_string()));
        }
        state.commands.push(command);
        state.outlets.insert(command.group_id, command.on);
        Ok(())
    }
}

pub fn credentials(password: &str) -> Credentials {
    Credentials::new("me@example.com", password)
}

/// A metered record as the hub would create it after pairing.
pub fn metered_device(name: &str, group_id: u64, password: &str) -> Arc<MemoryDevice> {
    Arc::new(
        MemoryDevice::new(DeviceIdentity::new(name, group_id, "1,2,3"), credentials(password))
            .with_capability(Capability::MeterPower),
    )
}

/// Reads a numeric capability value, panicking if absent.
pub fn number(device: &MemoryDevice, capability: Capability) -> f64 {
    device
        .capability_value(capability)
        .and_then(|v| v.as_f64())
        .unwrap_or_else(|| panic!("{capability} has no numeric value"))
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
