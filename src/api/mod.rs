// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Contract with the cloud energy-monitoring service.
//!
//! The drivers never talk to the network themselves. An adapter crate
//! implements [`Connector`] (credentials to a live client) and [`EnergyApi`]
//! (the calls made on that client), and the drivers own the resulting client.
//!
//! # Index alignment
//!
//! [`EnergyApi::get_device_timed_usage`] and [`EnergyApi::get_outlet_state`]
//! take a slice of [`DeviceIdentity`] and must answer with one entry per
//! identity, in the same order. The drivers correlate results by index.
//!
//! All returned futures are `Send` so polling can run on a spawned task.

use std::future::Future;

use crate::error::{ApiError, AuthError};
use crate::types::{Credentials, DeviceIdentity, OutletState, UsageReading, UsageScale};

/// Kind of device reported by the service listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteDeviceKind {
    /// A switchable smart plug.
    Outlet,
    /// A passive monitor (panel monitor circuit, mains).
    Monitor,
    /// Anything else the service lists (chargers, batteries, ...).
    #[serde(other)]
    Other,
}

/// One entry of the service's device listing.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RemoteDevice {
    /// Display name.
    pub name: String,
    /// Device group id.
    #[serde(rename = "groupId")]
    pub group_id: u64,
    /// Channel string.
    pub channel: String,
    /// Device kind.
    #[serde(rename = "type")]
    pub kind: RemoteDeviceKind,
}

impl RemoteDevice {
    /// Returns the identity used to address this device in later calls.
    #[must_use]
    pub fn identity(&self) -> DeviceIdentity {
        DeviceIdentity::new(self.name.clone(), self.group_id, self.channel.clone())
    }
}

/// Request to switch an outlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OutletCommand {
    /// Group id of the outlet.
    #[serde(rename = "groupId")]
    pub group_id: u64,
    /// Desired relay state.
    pub on: bool,
}

/// Calls available on an authenticated client.
pub trait EnergyApi: Send + Sync + 'static {
    /// Lists every device of the account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    fn get_devices(&self) -> impl Future<Output = Result<Vec<RemoteDevice>, ApiError>> + Send;

    /// Returns usage over the last `scale` window for each identity, index-aligned.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    fn get_device_timed_usage(
        &self,
        scale: UsageScale,
        devices: &[DeviceIdentity],
    ) -> impl Future<Output = Result<Vec<UsageReading>, ApiError>> + Send;

    /// Returns the relay state of each outlet, index-aligned.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    fn get_outlet_state(
        &self,
        devices: &[DeviceIdentity],
    ) -> impl Future<Output = Result<Vec<OutletState>, ApiError>> + Send;

    /// Switches an outlet on or off.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    fn update_outlet_state(
        &self,
        command: OutletCommand,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Builds authenticated clients.
pub trait Connector: Send + Sync + 'static {
    /// The client type produced on success.
    type Api: EnergyApi;

    /// Authenticates and returns a live client.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the credentials are rejected or the service
    /// cannot be reached.
    fn connect(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Self::Api, AuthError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_device_parses_listing_entry() {
        let device: RemoteDevice = serde_json::from_str(
            r#"{"name":"Desk Plug","groupId":991,"channel":"1,2,3","type":"outlet"}"#,
        )
        .unwrap();

        assert_eq!(device.kind, RemoteDeviceKind::Outlet);
        assert_eq!(device.identity(), DeviceIdentity::new("Desk Plug", 991, "1,2,3"));
    }

    #[test]
    fn unknown_kind_maps_to_other() {
        let device: RemoteDevice = serde_json::from_str(
            r#"{"name":"EV","groupId":5,"channel":"1","type":"charger"}"#,
        )
        .unwrap();

        assert_eq!(device.kind, RemoteDeviceKind::Other);
    }

    #[test]
    fn outlet_command_serializes_group_id() {
        let json = serde_json::to_value(OutletCommand {
            group_id: 3,
            on: true,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "groupId": 3, "on": true }));
    }
}
